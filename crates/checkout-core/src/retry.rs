//! # Bounded Retry
//!
//! Exponential backoff with jitter for external calls that report transient
//! failures (rate limiting, transport errors). The checkout chain itself is
//! deliberately retry-free: every step feeds the next, so a stale
//! intermediate result must fail the attempt rather than be retried. This
//! decorator exists for sibling collaborators such as availability checks.

use crate::error::{CheckoutError, CheckoutResult};
use std::future::Future;
use std::time::Duration;

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    /// Fraction of the computed delay added as random jitter
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}

impl RetryConfig {
    /// Delay before the given retry attempt (0-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let base = (self.base_delay.as_millis() as f64 * self.multiplier.powi(attempt as i32))
            .min(self.max_delay.as_millis() as f64);
        let jitter = rand::random::<f64>() * self.jitter_factor * base;
        Duration::from_millis((base + jitter) as u64)
    }
}

/// Run `op`, retrying while it fails with a retryable error.
///
/// Non-retryable errors and exhausted attempts propagate the last error.
pub async fn with_backoff<T, F, Fut>(config: &RetryConfig, mut op: F) -> CheckoutResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = CheckoutResult<T>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt + 1 < config.max_attempts => {
                let delay = config.backoff(attempt);
                tracing::debug!(attempt, ?delay, error = %err, "retrying after transient failure");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Convenience wrapper surfacing the error when all attempts fail
pub async fn with_default_backoff<T, F, Fut>(op: F) -> CheckoutResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = CheckoutResult<T>>,
{
    with_backoff(&RetryConfig::default(), op).await
}
