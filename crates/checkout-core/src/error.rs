//! # Checkout Error Types
//!
//! Typed error handling for the checkout workflow.
//! All workflow operations return `Result<T, CheckoutError>`.

use thiserror::Error;

/// Core error type for all checkout operations
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Configuration errors (missing env vars, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Billing form validation failed; blocks submission, no network call made
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No valid credential present, or a mid-flow call returned an
    /// authorization failure. The attempt is abandoned; the user must
    /// re-authenticate and re-submit.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Checkout attempted with an empty cart
    #[error("Cart is empty")]
    EmptyCart,

    /// Cart mixes item kinds; a checkout covers exactly one kind
    #[error("Cart mixes item types: {0}")]
    MixedCart(String),

    /// Item dates are unusable (e.g. checkout not after checkin)
    #[error("Invalid travel dates: {0}")]
    InvalidDates(String),

    /// Rate revalidation failed; the quoted rate is no longer available.
    /// Booking creation is never invoked after this.
    #[error("Rate no longer available: {0}")]
    RateUnavailable(String),

    /// Booking provider returned no usable booking identifier.
    /// Payment is never invoked after this.
    #[error("Booking creation failed: {0}")]
    BookingCreationFailed(String),

    /// Gateway rejected the payment or returned no usable payment URL.
    /// The cart is retained for retry.
    #[error("Payment processing failed: {0}")]
    PaymentInitiationFailed(String),

    /// Gateway return carried no recognizable response code.
    /// Classified as pending: neither success nor failure.
    #[error("Payment outcome is pending: {0}")]
    GatewayOutcomeAmbiguous(String),

    /// A checkout attempt is already running for this session
    #[error("A checkout is already being processed")]
    AlreadyProcessing,

    /// Network/HTTP error communicating with a collaborator
    #[error("Network error: {0}")]
    Network(String),

    /// Collaborator API error
    #[error("Provider error [{provider}]: {message}")]
    Provider { provider: String, message: String },

    /// Rate limited by a collaborator
    #[error("Rate limited by {provider}, retry after {retry_after_secs} seconds")]
    RateLimited {
        provider: String,
        retry_after_secs: u64,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CheckoutError {
    /// Returns true if this error is safe to retry against the same
    /// collaborator. Only transient transport failures qualify; every
    /// workflow-level failure is final for the attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CheckoutError::Network(_) | CheckoutError::RateLimited { .. }
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::Configuration(_) => 500,
            CheckoutError::Validation(_) => 400,
            CheckoutError::AuthenticationRequired => 401,
            CheckoutError::EmptyCart => 400,
            CheckoutError::MixedCart(_) => 400,
            CheckoutError::InvalidDates(_) => 400,
            CheckoutError::RateUnavailable(_) => 409,
            CheckoutError::BookingCreationFailed(_) => 502,
            CheckoutError::PaymentInitiationFailed(_) => 502,
            CheckoutError::GatewayOutcomeAmbiguous(_) => 202,
            CheckoutError::AlreadyProcessing => 409,
            CheckoutError::Network(_) => 503,
            CheckoutError::Provider { .. } => 502,
            CheckoutError::RateLimited { .. } => 429,
            CheckoutError::Serialization(_) => 500,
            CheckoutError::Internal(_) => 500,
        }
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(CheckoutError::Network("timeout".into()).is_retryable());
        assert!(CheckoutError::RateLimited {
            provider: "inventory".into(),
            retry_after_secs: 30
        }
        .is_retryable());
        assert!(!CheckoutError::RateUnavailable("stale key".into()).is_retryable());
        assert!(!CheckoutError::AuthenticationRequired.is_retryable());
        assert!(!CheckoutError::BookingCreationFailed("no id".into()).is_retryable());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(CheckoutError::Validation("x".into()).status_code(), 400);
        assert_eq!(CheckoutError::AuthenticationRequired.status_code(), 401);
        assert_eq!(
            CheckoutError::RateLimited {
                provider: "inventory".into(),
                retry_after_secs: 30
            }
            .status_code(),
            429
        );
        assert_eq!(
            CheckoutError::GatewayOutcomeAmbiguous("no code".into()).status_code(),
            202
        );
    }
}
