//! Shared HTTP plumbing for the provider clients.

use crate::config::ProviderConfig;
use checkout_core::{CheckoutError, CheckoutResult};
use reqwest::{Client, Response, StatusCode};
use tracing::error;

/// Build the reqwest client every provider shares the settings of
pub(crate) fn build_client(config: &ProviderConfig) -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_secs))
        .build()
        .expect("Failed to create HTTP client")
}

/// Read the response body, mapping non-success statuses to checkout errors.
///
/// 401 surfaces as `AuthenticationRequired` so the workflow can clear the
/// stored credential; 429 carries the Retry-After hint for the backoff
/// decorator; everything else is a provider error.
pub(crate) async fn read_body(provider: &'static str, response: Response) -> CheckoutResult<String> {
    let status = response.status();
    let retry_after = response
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok());

    let body = response
        .text()
        .await
        .map_err(|e| CheckoutError::Network(e.to_string()))?;

    if status.is_success() {
        return Ok(body);
    }

    error!("{} API error: status={}, body={}", provider, status, body);

    match status {
        StatusCode::UNAUTHORIZED => Err(CheckoutError::AuthenticationRequired),
        StatusCode::TOO_MANY_REQUESTS => Err(CheckoutError::RateLimited {
            provider: provider.to_string(),
            retry_after_secs: retry_after.unwrap_or(1),
        }),
        _ => Err(CheckoutError::Provider {
            provider: provider.to_string(),
            message: format!("HTTP {}: {}", status, body),
        }),
    }
}
