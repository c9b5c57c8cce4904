//! # checkout-core
//!
//! Core types and the orchestration workflow for the voyage checkout
//! engine.
//!
//! This crate provides:
//! - `CartItem`, `CartSnapshot`, and the `CartStore` seam
//! - `BillingInfo` with pure form validation
//! - The authentication gate (`SessionStore`)
//! - `BookingRequest` payload shaping and `BookingRecord`
//! - `PaymentIntent`, gateway return parsing, and outcome classification
//! - The `CheckoutState` machine and the `CheckoutWorkflow` driver
//! - A bounded exponential-backoff decorator for transient failures
//!
//! ## Example
//!
//! ```rust,ignore
//! use checkout_core::{CheckoutWorkflow, SubmitCheckout, PaymentMethod};
//!
//! let workflow = CheckoutWorkflow::new(sessions, carts, intents, rates, bookings, gateway);
//!
//! let success = workflow.submit(SubmitCheckout {
//!     session: token,
//!     cart_id: cart,
//!     billing,
//!     method: PaymentMethod::Online,
//!     items: None,
//! }).await?;
//!
//! // Online path: redirect the user to success.payment_url
//! ```

pub mod billing;
pub mod booking;
pub mod cart;
pub mod collaborators;
pub mod error;
pub mod money;
pub mod payment;
pub mod retry;
pub mod session;
pub mod state;
pub mod workflow;

// Re-exports for convenience
pub use billing::BillingInfo;
pub use booking::{
    BookingRecord, BookingRequest, BookingStatus, HotelBookingRequest, Pax, PaxType,
};
pub use cart::{CartItem, CartSnapshot, CartStore, InMemoryCartStore, ItemDetails, ItemKind};
pub use collaborators::{
    BookingProvider, PaymentGateway, RateChecker, SharedBookingProvider, SharedPaymentGateway,
    SharedRateChecker,
};
pub use error::{CheckoutError, CheckoutResult};
pub use money::{Currency, Price};
pub use payment::{
    BookingData, GatewayReturn, InitiatedPayment, OutcomeClass, PaymentIntent, PaymentMethod,
    PaymentOutcome, PaymentRequest, SiteConfirmation, GATEWAY_SUCCESS_CODES,
};
pub use retry::{with_backoff, with_default_backoff, RetryConfig};
pub use session::{Credential, InMemorySessionStore, SessionStore};
pub use state::{CheckoutEvent, CheckoutState, FailedStage};
pub use workflow::{
    CheckoutSuccess, CheckoutWorkflow, InMemoryIntentStore, PaymentIntentStore, SubmitCheckout,
};
