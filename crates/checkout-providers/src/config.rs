//! # Provider Configuration
//!
//! Configuration for the inventory and payment API clients.
//! All secrets are loaded from environment variables.

use checkout_core::CheckoutError;
use std::env;

/// HTTP provider configuration
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base URL of the inventory API (rates, bookings)
    pub inventory_base_url: String,

    /// Base URL of the payment API (gateway initiation, pay-on-site)
    pub payment_base_url: String,

    /// API key sent on every provider call
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ProviderConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `VOYAGE_INVENTORY_URL`
    /// - `VOYAGE_PAYMENT_URL`
    /// - `VOYAGE_API_KEY`
    ///
    /// Optional:
    /// - `VOYAGE_HTTP_TIMEOUT_SECS` (default 30)
    pub fn from_env() -> Result<Self, CheckoutError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let inventory_base_url = env::var("VOYAGE_INVENTORY_URL").map_err(|_| {
            CheckoutError::Configuration("VOYAGE_INVENTORY_URL not set".to_string())
        })?;

        let payment_base_url = env::var("VOYAGE_PAYMENT_URL")
            .map_err(|_| CheckoutError::Configuration("VOYAGE_PAYMENT_URL not set".to_string()))?;

        let api_key = env::var("VOYAGE_API_KEY")
            .map_err(|_| CheckoutError::Configuration("VOYAGE_API_KEY not set".to_string()))?;

        let timeout_secs = match env::var("VOYAGE_HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| {
                CheckoutError::Configuration(
                    "VOYAGE_HTTP_TIMEOUT_SECS must be an integer".to_string(),
                )
            })?,
            Err(_) => 30,
        };

        let config = Self {
            inventory_base_url,
            payment_base_url,
            api_key,
            timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Create config with explicit values (for testing)
    pub fn new(
        inventory_base_url: impl Into<String>,
        payment_base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            inventory_base_url: inventory_base_url.into(),
            payment_base_url: payment_base_url.into(),
            api_key: api_key.into(),
            timeout_secs: 30,
        }
    }

    fn validate(&self) -> Result<(), CheckoutError> {
        for (name, url) in [
            ("VOYAGE_INVENTORY_URL", &self.inventory_base_url),
            ("VOYAGE_PAYMENT_URL", &self.payment_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(CheckoutError::Configuration(format!(
                    "{name} must start with http:// or https://"
                )));
            }
        }
        if self.api_key.trim().is_empty() {
            return Err(CheckoutError::Configuration(
                "VOYAGE_API_KEY must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Builder: set custom inventory base URL (for testing)
    pub fn with_inventory_base_url(mut self, url: impl Into<String>) -> Self {
        self.inventory_base_url = url.into();
        self
    }

    /// Builder: set custom payment base URL (for testing)
    pub fn with_payment_base_url(mut self, url: impl Into<String>) -> Self {
        self.payment_base_url = url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_config_passes_validation() {
        let config = ProviderConfig::new(
            "https://inventory.test",
            "https://payments.test",
            "key-123",
        );
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_rejects_non_http_url() {
        let config = ProviderConfig::new("ftp://inventory.test", "https://payments.test", "k");
        assert!(matches!(
            config.validate(),
            Err(CheckoutError::Configuration(_))
        ));
    }

    #[test]
    fn test_rejects_empty_api_key() {
        let config = ProviderConfig::new("https://a.test", "https://b.test", "  ");
        assert!(matches!(
            config.validate(),
            Err(CheckoutError::Configuration(_))
        ));
    }

    #[test]
    fn test_base_url_builders() {
        let config = ProviderConfig::new("https://a.test", "https://b.test", "k")
            .with_inventory_base_url("http://127.0.0.1:9000")
            .with_payment_base_url("http://127.0.0.1:9001");
        assert_eq!(config.inventory_base_url, "http://127.0.0.1:9000");
        assert_eq!(config.payment_base_url, "http://127.0.0.1:9001");
    }
}
