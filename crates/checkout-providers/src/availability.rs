//! # Hotel Availability Client
//!
//! Read-only availability quotes from the inventory API. Unlike the
//! checkout chain, these calls are idempotent, so transient failures are
//! retried with bounded backoff.

use crate::config::ProviderConfig;
use crate::http::{build_client, read_body};
use checkout_core::{retry, CheckoutError, CheckoutResult, Currency, RetryConfig};
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// One quoted room rate
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateQuote {
    pub rate_key: String,
    pub room_name: String,
    pub board: String,
    pub price: f64,
    pub currency: Currency,
}

/// Availability search parameters
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub destination_code: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u32,
    pub children: u32,
    pub rooms: u32,
}

/// Inventory-API availability client
pub struct HttpAvailabilityClient {
    config: ProviderConfig,
    client: Client,
    retry: RetryConfig,
}

impl HttpAvailabilityClient {
    pub fn new(config: ProviderConfig) -> Self {
        let client = build_client(&config);
        Self {
            config,
            client,
            retry: RetryConfig::default(),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> CheckoutResult<Self> {
        Ok(Self::new(ProviderConfig::from_env()?))
    }

    /// Builder: override the retry policy
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Quote available rates for a stay, retrying transient failures.
    #[instrument(skip(self, query), fields(destination = %query.destination_code))]
    pub async fn search(&self, query: &AvailabilityQuery) -> CheckoutResult<Vec<RateQuote>> {
        retry::with_backoff(&self.retry, || self.search_once(query)).await
    }

    async fn search_once(&self, query: &AvailabilityQuery) -> CheckoutResult<Vec<RateQuote>> {
        let url = format!("{}/hotels/availability", self.config.inventory_base_url);
        debug!(%url, "querying availability");

        let response = self
            .client
            .post(&url)
            .header("X-Api-Key", &self.config.api_key)
            .json(query)
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        let body = read_body("inventory", response).await?;

        let parsed: AvailabilityResponse = serde_json::from_str(&body).map_err(|e| {
            CheckoutError::Serialization(format!("Failed to parse availability response: {}", e))
        })?;

        Ok(parsed.rates)
    }
}

#[derive(Debug, Deserialize)]
struct AvailabilityResponse {
    #[serde(default)]
    rates: Vec<RateQuote>,
}
