//! # checkout-providers
//!
//! HTTP implementations of the checkout collaborator seams, backed by the
//! inventory API and the payment API:
//!
//! 1. **HttpRateChecker** - hotel rate revalidation before commit
//! 2. **HttpBookingProvider** - booking creation, one endpoint per item kind
//! 3. **HttpPaymentGateway** - online initiation and pay-on-site confirmation
//! 4. **HttpAvailabilityClient** - read-only availability quotes (retried)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use checkout_providers::{HttpBookingProvider, HttpPaymentGateway, HttpRateChecker};
//!
//! // Create clients from environment
//! let rates = HttpRateChecker::from_env()?;
//! let bookings = HttpBookingProvider::from_env()?;
//! let gateway = HttpPaymentGateway::from_env()?;
//!
//! // Hand them to CheckoutWorkflow as trait objects
//! ```
//!
//! Authentication failures (HTTP 401) from any provider surface as
//! `CheckoutError::AuthenticationRequired`, which makes the workflow clear
//! the stored credential and abandon the attempt.

pub mod availability;
pub mod booking;
pub mod config;
pub mod gateway;
mod http;
pub mod rates;

// Re-exports
pub use availability::{AvailabilityQuery, HttpAvailabilityClient, RateQuote};
pub use booking::HttpBookingProvider;
pub use config::ProviderConfig;
pub use gateway::HttpPaymentGateway;
pub use rates::HttpRateChecker;
