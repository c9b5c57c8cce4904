//! # Rate Revalidation Client
//!
//! Checks a stored hotel rate key against the inventory API immediately
//! before booking. The freshened key returned here is the one the booking
//! payload must carry.

use crate::config::ProviderConfig;
use crate::http::{build_client, read_body};
use checkout_core::{CheckoutError, CheckoutResult, RateChecker};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Inventory-API implementation of the rate revalidation seam
pub struct HttpRateChecker {
    config: ProviderConfig,
    client: Client,
}

impl HttpRateChecker {
    pub fn new(config: ProviderConfig) -> Self {
        let client = build_client(&config);
        Self { config, client }
    }

    /// Create from environment variables
    pub fn from_env() -> CheckoutResult<Self> {
        Ok(Self::new(ProviderConfig::from_env()?))
    }
}

#[async_trait]
impl RateChecker for HttpRateChecker {
    #[instrument(skip(self))]
    async fn check_rate(&self, rate_key: &str) -> CheckoutResult<String> {
        let url = format!("{}/hotels/checkrates", self.config.inventory_base_url);
        let request = CheckRateRequest {
            rooms: vec![RateKeyEntry {
                rate_key: rate_key.to_string(),
            }],
        };

        debug!("revalidating rate key");

        let response = self
            .client
            .post(&url)
            .header("X-Api-Key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        let body = read_body("inventory", response).await?;

        let parsed: CheckRateResponse = serde_json::from_str(&body).map_err(|e| {
            CheckoutError::Serialization(format!("Failed to parse checkrates response: {}", e))
        })?;

        if !parsed.success {
            return Err(CheckoutError::RateUnavailable(
                parsed
                    .message
                    .unwrap_or_else(|| "rate no longer available".to_string()),
            ));
        }

        let fresh = parsed
            .hotel
            .and_then(|h| h.rooms.into_iter().next())
            .and_then(|r| r.rates.into_iter().next())
            .map(|rate| rate.rate_key)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                CheckoutError::RateUnavailable("checkrates response carried no rate key".to_string())
            })?;

        info!(superseded = fresh != rate_key, "rate revalidated");
        Ok(fresh)
    }
}

// =============================================================================
// Inventory API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct CheckRateRequest {
    rooms: Vec<RateKeyEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RateKeyEntry {
    rate_key: String,
}

#[derive(Debug, Deserialize)]
struct CheckRateResponse {
    #[serde(default = "default_true")]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    hotel: Option<CheckedHotel>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct CheckedHotel {
    #[serde(default)]
    rooms: Vec<CheckedRoom>,
}

#[derive(Debug, Deserialize)]
struct CheckedRoom {
    #[serde(default)]
    rates: Vec<CheckedRate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckedRate {
    rate_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn checker(server: &MockServer) -> HttpRateChecker {
        HttpRateChecker::new(
            ProviderConfig::new("https://unused.test", "https://unused.test", "key-123")
                .with_inventory_base_url(server.uri()),
        )
    }

    #[tokio::test]
    async fn test_returns_fresh_rate_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hotels/checkrates"))
            .and(header("X-Api-Key", "key-123"))
            .and(body_partial_json(json!({"rooms": [{"rateKey": "RK1"}]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "hotel": { "rooms": [ { "rates": [ { "rateKey": "RK2" } ] } ] }
            })))
            .mount(&server)
            .await;

        let fresh = checker(&server).check_rate("RK1").await.unwrap();
        assert_eq!(fresh, "RK2");
    }

    #[tokio::test]
    async fn test_explicit_failure_is_rate_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hotels/checkrates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "rate expired"
            })))
            .mount(&server)
            .await;

        let err = checker(&server).check_rate("RK1").await.unwrap_err();
        assert!(matches!(err, CheckoutError::RateUnavailable(_)));
        assert!(err.to_string().contains("rate expired"));
    }

    #[tokio::test]
    async fn test_missing_rate_key_is_rate_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hotels/checkrates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "hotel": { "rooms": [] }
            })))
            .mount(&server)
            .await;

        let err = checker(&server).check_rate("RK1").await.unwrap_err();
        assert!(matches!(err, CheckoutError::RateUnavailable(_)));
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_authentication_required() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hotels/checkrates"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = checker(&server).check_rate("RK1").await.unwrap_err();
        assert!(matches!(err, CheckoutError::AuthenticationRequired));
    }
}
