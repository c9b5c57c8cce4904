//! # Collaborator Traits
//!
//! Seams for the external services the workflow drives. Each provider
//! (inventory API, payment gateway) implements these, allowing the workflow
//! to run against HTTP clients in production and in-memory fakes in tests.

use crate::booking::{BookingRecord, BookingRequest};
use crate::error::CheckoutResult;
use crate::payment::{InitiatedPayment, PaymentRequest, SiteConfirmation};
use async_trait::async_trait;
use std::sync::Arc;

/// Revalidates a previously quoted rate immediately before commit.
#[async_trait]
pub trait RateChecker: Send + Sync {
    /// Check a stored rate key and return the fresh key that supersedes it.
    ///
    /// A provider error or an explicit failure indicator must surface as
    /// `CheckoutError::RateUnavailable`; stale inventory never reaches
    /// booking creation.
    async fn check_rate(&self, rate_key: &str) -> CheckoutResult<String>;
}

/// Creates bookings at the type-appropriate provider endpoint.
#[async_trait]
pub trait BookingProvider: Send + Sync {
    /// Submit the payload and return the provider's booking record.
    ///
    /// A response with no extractable booking identifier must surface as
    /// `CheckoutError::BookingCreationFailed`; no payment step may follow.
    async fn create_booking(&self, request: &BookingRequest) -> CheckoutResult<BookingRecord>;
}

/// Drives the two mutually exclusive fulfillment paths.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Online path: initiate an external payment and return the redirect
    /// target plus gateway identifiers.
    async fn initiate_payment(&self, request: &PaymentRequest) -> CheckoutResult<InitiatedPayment>;

    /// Pay-on-site path: confirm the booking without gateway interaction.
    async fn confirm_pay_on_site(
        &self,
        request: &PaymentRequest,
    ) -> CheckoutResult<SiteConfirmation>;
}

/// Type aliases for shared trait objects
pub type SharedRateChecker = Arc<dyn RateChecker>;
pub type SharedBookingProvider = Arc<dyn BookingProvider>;
pub type SharedPaymentGateway = Arc<dyn PaymentGateway>;
