//! Checkout state machine.
//!
//! The workflow driver never mutates state directly; every advance goes
//! through the pure [`CheckoutState::apply`] transition, which makes the
//! step ordering testable without any collaborator in play.

use crate::error::{CheckoutError, CheckoutResult};
use serde::{Deserialize, Serialize};

/// The state of one checkout attempt.
///
/// State transitions:
/// ```text
/// Idle ──► AuthChecked ──► Validated ──► RateChecked ──► BookingCreated
///                                                            │
///                              ┌─────────────────────────────┤
///                              ▼                             ▼
///                       PaymentInitiated ──► RedirectedToGateway
///                                                        SiteConfirmed
/// ```
/// Any step may fail into `Failed`, which is recoverable: the user may
/// restart the workflow from scratch. `RedirectedToGateway` and
/// `SiteConfirmed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutState {
    #[default]
    Idle,
    AuthChecked,
    Validated,
    /// Rate revalidated for hotel carts, or explicitly skipped otherwise
    RateChecked,
    BookingCreated,
    PaymentInitiated,
    /// Control has left the system for the external payment page
    RedirectedToGateway,
    /// Pay-on-site path confirmed synchronously
    SiteConfirmed,
    Failed(FailedStage),
}

/// The stage a failed attempt reached, kept for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailedStage {
    Authentication,
    Validation,
    RateCheck,
    BookingCreation,
    PaymentInitiation,
    SiteConfirmation,
}

/// Events that advance a checkout attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutEvent {
    AuthConfirmed,
    BillingValidated,
    /// Hotel carts carry the freshened rate key; other kinds skip the check
    RateRevalidated,
    RateCheckSkipped,
    BookingConfirmed,
    PaymentAccepted,
    SiteConfirmed,
    StepFailed(FailedStage),
}

impl CheckoutState {
    /// Apply an event, returning the next state.
    ///
    /// An event arriving in a state that does not expect it is an internal
    /// error: the driver is sequential, so it indicates a programming bug,
    /// not a user-recoverable condition.
    pub fn apply(self, event: CheckoutEvent) -> CheckoutResult<CheckoutState> {
        use CheckoutEvent as E;
        use CheckoutState as S;

        let next = match (self, &event) {
            // Terminal states are final; a late failure report is a bug
            (state, E::StepFailed(stage)) if !state.is_terminal() => S::Failed(*stage),
            (S::Idle, E::AuthConfirmed) => S::AuthChecked,
            (S::AuthChecked, E::BillingValidated) => S::Validated,
            (S::Validated, E::RateRevalidated) => S::RateChecked,
            (S::Validated, E::RateCheckSkipped) => S::RateChecked,
            (S::RateChecked, E::BookingConfirmed) => S::BookingCreated,
            (S::BookingCreated, E::PaymentAccepted) => S::PaymentInitiated,
            (S::BookingCreated, E::SiteConfirmed) => S::SiteConfirmed,
            (state, event) => return Err(invalid(state, event)),
        };
        Ok(next)
    }

    /// The redirect hand-off: once the payment URL is accepted the attempt
    /// ends locally.
    pub fn redirected(self) -> CheckoutResult<CheckoutState> {
        match self {
            CheckoutState::PaymentInitiated => Ok(CheckoutState::RedirectedToGateway),
            state => Err(CheckoutError::Internal(format!(
                "cannot redirect from state {state}"
            ))),
        }
    }

    /// Returns true if the attempt has ended, successfully or not
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CheckoutState::RedirectedToGateway
                | CheckoutState::SiteConfirmed
                | CheckoutState::Failed(_)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutState::Idle => "idle",
            CheckoutState::AuthChecked => "auth_checked",
            CheckoutState::Validated => "validated",
            CheckoutState::RateChecked => "rate_checked",
            CheckoutState::BookingCreated => "booking_created",
            CheckoutState::PaymentInitiated => "payment_initiated",
            CheckoutState::RedirectedToGateway => "redirected_to_gateway",
            CheckoutState::SiteConfirmed => "site_confirmed",
            CheckoutState::Failed(_) => "failed",
        }
    }
}

fn invalid(state: CheckoutState, event: &CheckoutEvent) -> CheckoutError {
    CheckoutError::Internal(format!("invalid transition: {state} on {event:?}"))
}

impl std::fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_online_path_ordering() {
        let state = CheckoutState::Idle
            .apply(CheckoutEvent::AuthConfirmed)
            .and_then(|s| s.apply(CheckoutEvent::BillingValidated))
            .and_then(|s| s.apply(CheckoutEvent::RateRevalidated))
            .and_then(|s| s.apply(CheckoutEvent::BookingConfirmed))
            .and_then(|s| s.apply(CheckoutEvent::PaymentAccepted))
            .and_then(|s| s.redirected())
            .unwrap();

        assert_eq!(state, CheckoutState::RedirectedToGateway);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_pay_on_site_path_ordering() {
        let state = CheckoutState::Idle
            .apply(CheckoutEvent::AuthConfirmed)
            .and_then(|s| s.apply(CheckoutEvent::BillingValidated))
            .and_then(|s| s.apply(CheckoutEvent::RateCheckSkipped))
            .and_then(|s| s.apply(CheckoutEvent::BookingConfirmed))
            .and_then(|s| s.apply(CheckoutEvent::SiteConfirmed))
            .unwrap();

        assert_eq!(state, CheckoutState::SiteConfirmed);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_payment_before_booking_rejected() {
        let state = CheckoutState::Idle
            .apply(CheckoutEvent::AuthConfirmed)
            .and_then(|s| s.apply(CheckoutEvent::BillingValidated))
            .unwrap();

        assert!(state.apply(CheckoutEvent::PaymentAccepted).is_err());
    }

    #[test]
    fn test_booking_requires_rate_check() {
        let state = CheckoutState::Idle
            .apply(CheckoutEvent::AuthConfirmed)
            .and_then(|s| s.apply(CheckoutEvent::BillingValidated))
            .unwrap();

        assert!(state.apply(CheckoutEvent::BookingConfirmed).is_err());
    }

    #[test]
    fn test_failure_is_reachable_from_any_stage() {
        let failed = CheckoutState::Validated
            .apply(CheckoutEvent::StepFailed(FailedStage::RateCheck))
            .unwrap();
        assert_eq!(failed, CheckoutState::Failed(FailedStage::RateCheck));
        assert!(failed.is_terminal());
    }

    #[test]
    fn test_terminal_states_reject_failure_events() {
        for state in [
            CheckoutState::RedirectedToGateway,
            CheckoutState::SiteConfirmed,
            CheckoutState::Failed(FailedStage::BookingCreation),
        ] {
            assert!(
                state
                    .apply(CheckoutEvent::StepFailed(FailedStage::PaymentInitiation))
                    .is_err(),
                "{state} must stay terminal"
            );
        }
    }

    #[test]
    fn test_redirect_only_after_payment_initiated() {
        assert!(CheckoutState::BookingCreated.redirected().is_err());
        assert!(CheckoutState::PaymentInitiated.redirected().is_ok());
    }

    #[test]
    fn test_display() {
        assert_eq!(CheckoutState::Idle.to_string(), "idle");
        assert_eq!(
            CheckoutState::RedirectedToGateway.to_string(),
            "redirected_to_gateway"
        );
    }
}
