//! # Payment Gateway Client
//!
//! Drives the payment API's two fulfillment paths: online initiation
//! (yielding the redirect URL) and pay-on-site confirmation (fully
//! synchronous, no gateway interaction).

use crate::config::ProviderConfig;
use crate::http::{build_client, read_body};
use checkout_core::{
    CheckoutError, CheckoutResult, InitiatedPayment, PaymentGateway, PaymentRequest,
    SiteConfirmation,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};

/// Payment-API implementation of the gateway seam
pub struct HttpPaymentGateway {
    config: ProviderConfig,
    client: Client,
}

impl HttpPaymentGateway {
    pub fn new(config: ProviderConfig) -> Self {
        let client = build_client(&config);
        Self { config, client }
    }

    /// Create from environment variables
    pub fn from_env() -> CheckoutResult<Self> {
        Ok(Self::new(ProviderConfig::from_env()?))
    }

    async fn post(&self, path: &str, request: &PaymentRequest) -> CheckoutResult<String> {
        let url = format!("{}{}", self.config.payment_base_url, path);
        debug!(%url, "calling payment API");

        let response = self
            .client
            .post(&url)
            .header("X-Api-Key", &self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        read_body("payment", response).await
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    #[instrument(skip(self, request), fields(order_id = %request.order_id, booking_id = %request.booking_id))]
    async fn initiate_payment(&self, request: &PaymentRequest) -> CheckoutResult<InitiatedPayment> {
        let body = self.post("/payments/initiate", request).await?;

        let parsed: InitiateResponse = serde_json::from_str(&body).map_err(|e| {
            CheckoutError::PaymentInitiationFailed(format!("unparsable gateway response: {}", e))
        })?;

        if !parsed.success {
            return Err(CheckoutError::PaymentInitiationFailed(
                parsed
                    .message
                    .unwrap_or_else(|| "gateway rejected the payment".to_string()),
            ));
        }

        let data = parsed.data.ok_or_else(|| {
            CheckoutError::PaymentInitiationFailed(
                "gateway response carried no payment data".to_string(),
            )
        })?;

        if data.payment_url.trim().is_empty() {
            return Err(CheckoutError::PaymentInitiationFailed(
                "gateway returned no payment URL".to_string(),
            ));
        }

        info!(payment_id = %data.payment_id, "payment initiated");

        Ok(InitiatedPayment {
            payment_url: data.payment_url,
            payment_id: data.payment_id,
            session_id: data.session_id,
        })
    }

    #[instrument(skip(self, request), fields(order_id = %request.order_id, booking_id = %request.booking_id))]
    async fn confirm_pay_on_site(
        &self,
        request: &PaymentRequest,
    ) -> CheckoutResult<SiteConfirmation> {
        let body = self.post("/payments/pay-on-site", request).await?;

        let parsed: PayOnSiteResponse = serde_json::from_str(&body).map_err(|e| {
            CheckoutError::PaymentInitiationFailed(format!("unparsable gateway response: {}", e))
        })?;

        if !parsed.success {
            return Err(CheckoutError::PaymentInitiationFailed(
                parsed
                    .message
                    .unwrap_or_else(|| "pay-on-site confirmation rejected".to_string()),
            ));
        }

        let confirmation = parsed.data.ok_or_else(|| {
            CheckoutError::PaymentInitiationFailed(
                "confirmation response carried no data".to_string(),
            )
        })?;

        info!(reference = %confirmation.booking_reference, "pay-on-site confirmed");
        Ok(confirmation)
    }
}

// =============================================================================
// Payment API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct InitiateResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<InitiateData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitiateData {
    #[serde(default)]
    payment_url: String,
    payment_id: String,
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct PayOnSiteResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<SiteConfirmation>,
}
