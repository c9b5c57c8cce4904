//! # Checkout Workflow
//!
//! Drives one checkout attempt through the state machine: authentication
//! gate, billing validation, cart freeze, rate revalidation (hotel only),
//! booking creation, and one of the two fulfillment paths. All collaborator
//! calls are sequential and awaited; each step's output feeds the next, and
//! no step is ever retried automatically.

use crate::billing::BillingInfo;
use crate::booking::{BookingRecord, BookingRequest};
use crate::cart::{CartItem, CartSnapshot, CartStore, ItemKind};
use crate::collaborators::{SharedBookingProvider, SharedPaymentGateway, SharedRateChecker};
use crate::error::{CheckoutError, CheckoutResult};
use crate::payment::{
    BookingData, GatewayReturn, PaymentIntent, PaymentMethod, PaymentOutcome, PaymentRequest,
    SiteConfirmation,
};
use crate::session::SessionStore;
use crate::state::{CheckoutEvent, CheckoutState, FailedStage};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{info, instrument, warn};

/// One checkout submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitCheckout {
    /// Session token the credential is stored under
    pub session: String,
    /// Cart to check out
    pub cart_id: String,
    pub billing: BillingInfo,
    pub method: PaymentMethod,
    /// Explicit items from the calling page; falls back to cart contents
    #[serde(default)]
    pub items: Option<Vec<CartItem>>,
}

/// Successful completion of a checkout attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckoutSuccess {
    /// Online path: the caller performs a full-page redirect to
    /// `payment_url` after rendering its success message
    Redirect {
        payment_url: String,
        payment_id: String,
        session_id: String,
        order_id: String,
        booking: BookingRecord,
    },
    /// Pay-on-site path: fully synchronous, no redirect
    OnSite(SiteConfirmation),
}

/// Local record of initiated payments, kept for reconciliation after the
/// gateway redirect hands control back.
pub trait PaymentIntentStore: Send + Sync {
    fn record(&self, intent: PaymentIntent);
    fn find_by_order(&self, order_id: &str) -> Option<PaymentIntent>;
}

#[derive(Debug, Default)]
pub struct InMemoryIntentStore {
    intents: RwLock<HashMap<String, PaymentIntent>>,
}

impl InMemoryIntentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PaymentIntentStore for InMemoryIntentStore {
    fn record(&self, intent: PaymentIntent) {
        self.intents
            .write()
            .expect("intent store lock poisoned")
            .insert(intent.order_id.clone(), intent);
    }

    fn find_by_order(&self, order_id: &str) -> Option<PaymentIntent> {
        self.intents
            .read()
            .expect("intent store lock poisoned")
            .get(order_id)
            .cloned()
    }
}

/// Orchestrates checkout attempts against the collaborator seams.
pub struct CheckoutWorkflow {
    sessions: Arc<dyn SessionStore>,
    carts: Arc<dyn CartStore>,
    intents: Arc<dyn PaymentIntentStore>,
    rates: SharedRateChecker,
    bookings: SharedBookingProvider,
    gateway: SharedPaymentGateway,
    /// Sessions with an attempt currently running; resubmission is refused
    /// while one is in flight
    in_flight: Mutex<HashSet<String>>,
}

/// Releases the in-flight slot when the attempt ends, on every exit path
struct InFlightGuard<'a> {
    slots: &'a Mutex<HashSet<String>>,
    session: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.slots
            .lock()
            .expect("in-flight lock poisoned")
            .remove(&self.session);
    }
}

impl CheckoutWorkflow {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        carts: Arc<dyn CartStore>,
        intents: Arc<dyn PaymentIntentStore>,
        rates: SharedRateChecker,
        bookings: SharedBookingProvider,
        gateway: SharedPaymentGateway,
    ) -> Self {
        Self {
            sessions,
            carts,
            intents,
            rates,
            bookings,
            gateway,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Run one checkout attempt end to end.
    ///
    /// On failure the cart is left untouched: the only clear happens after a
    /// step has confirmed success. An orphaned pending booking (created but
    /// never paid) is acceptable and carries no payment obligation.
    #[instrument(skip(self, request), fields(cart_id = %request.cart_id, method = ?request.method))]
    pub async fn submit(&self, request: SubmitCheckout) -> CheckoutResult<CheckoutSuccess> {
        let _guard = self.acquire_slot(&request.session)?;

        let mut state = CheckoutState::Idle;

        // Authentication gate: no side effect may start without a credential.
        // The submission is not auto-resumed after login; the user
        // re-triggers submit so the form state cannot go stale.
        let credential = self
            .sessions
            .credential(&request.session)
            .ok_or(CheckoutError::AuthenticationRequired)?;
        state = state.apply(CheckoutEvent::AuthConfirmed)?;
        info!(user_id = %credential.user_id, "checkout attempt started");

        request.billing.validate()?;
        let items = match request.items.clone() {
            Some(items) => items,
            None => self.carts.load(&request.cart_id),
        };
        let snapshot = CartSnapshot::build(items)?;
        state = state.apply(CheckoutEvent::BillingValidated)?;

        // Rate freshness: hotel rates are revalidated immediately before
        // commit, and the fresh key supersedes the cached one.
        let fresh_rate_key = match snapshot.kind() {
            ItemKind::Hotel => {
                let stored = snapshot.first_rate_key().ok_or_else(|| {
                    CheckoutError::Internal("hotel item without rate key".to_string())
                })?;
                let fresh = self
                    .gate(&request.session, self.rates.check_rate(stored).await)
                    .map_err(|e| fail(&mut state, FailedStage::RateCheck, e))?;
                state = state.apply(CheckoutEvent::RateRevalidated)?;
                Some(fresh)
            }
            _ => {
                state = state.apply(CheckoutEvent::RateCheckSkipped)?;
                None
            }
        };

        let booking_request =
            BookingRequest::from_snapshot(&snapshot, &request.billing, fresh_rate_key.as_deref());
        let booking = self
            .gate(
                &request.session,
                self.bookings.create_booking(&booking_request).await,
            )
            .map_err(|e| fail(&mut state, FailedStage::BookingCreation, e))?;
        state = state.apply(CheckoutEvent::BookingConfirmed)?;
        info!(booking_id = %booking.booking_id, reference = %booking.reference, "booking created");

        let mut intent = PaymentIntent::new(&booking, snapshot.total(), request.method);
        let hotel_payload = match &booking_request {
            BookingRequest::Hotel(h) => Some(h.clone()),
            _ => None,
        };
        let booking_data = BookingData::from_snapshot(&snapshot, hotel_payload);
        let payment_request = PaymentRequest::new(&intent, &request.billing, booking_data);

        match request.method {
            PaymentMethod::Online => {
                let initiated = self
                    .gate(
                        &request.session,
                        self.gateway.initiate_payment(&payment_request).await,
                    )
                    .map_err(|e| fail(&mut state, FailedStage::PaymentInitiation, e))?;

                if initiated.payment_url.trim().is_empty() {
                    let err = CheckoutError::PaymentInitiationFailed(
                        "gateway returned no payment URL".to_string(),
                    );
                    return Err(fail(&mut state, FailedStage::PaymentInitiation, err));
                }

                intent.payment_id = Some(initiated.payment_id.clone());
                intent.session_id = Some(initiated.session_id.clone());
                intent.payment_url = Some(initiated.payment_url.clone());
                let order_id = intent.order_id.clone();
                self.intents.record(intent);

                state = state.apply(CheckoutEvent::PaymentAccepted)?;
                // Single clear point for the online path: a usable payment
                // URL is the success confirmation.
                self.carts.clear(&request.cart_id);
                state = state.redirected()?;
                info!(%state, %order_id, "handing off to payment gateway");

                Ok(CheckoutSuccess::Redirect {
                    payment_url: initiated.payment_url,
                    payment_id: initiated.payment_id,
                    session_id: initiated.session_id,
                    order_id,
                    booking,
                })
            }
            PaymentMethod::PayOnSite => {
                let confirmation = self
                    .gate(
                        &request.session,
                        self.gateway.confirm_pay_on_site(&payment_request).await,
                    )
                    .map_err(|e| fail(&mut state, FailedStage::SiteConfirmation, e))?;

                self.intents.record(intent);
                state = state.apply(CheckoutEvent::SiteConfirmed)?;
                self.carts.clear(&request.cart_id);
                info!(%state, reference = %confirmation.booking_reference, "pay-on-site booking confirmed");

                Ok(CheckoutSuccess::OnSite(confirmation))
            }
        }
    }

    /// Interpret the gateway's return parameters and finalize local state.
    ///
    /// On classified success the cart is cleared; the clear is idempotent,
    /// so re-renders of the same return page are harmless. A pending
    /// classification surfaces as `GatewayOutcomeAmbiguous`.
    #[instrument(skip(self, params), fields(cart_id = %cart_id))]
    pub fn resolve_return(
        &self,
        cart_id: &str,
        params: &HashMap<String, String>,
    ) -> CheckoutResult<PaymentOutcome> {
        let gateway_return = GatewayReturn::from_query(params);
        let outcome = gateway_return.resolve()?;

        // Reconcile against the locally recorded intent for this order
        let intent = outcome
            .order_reference
            .as_deref()
            .and_then(|order| self.intents.find_by_order(order));

        if outcome.success {
            self.carts.clear(cart_id);
            match &intent {
                Some(intent) => info!(
                    code = %outcome.response_code,
                    booking_id = %intent.booking_id,
                    "payment confirmed by gateway return"
                ),
                None => warn!(
                    code = %outcome.response_code,
                    order = outcome.order_reference.as_deref().unwrap_or("-"),
                    "payment confirmed but no recorded intent matches the order"
                ),
            }
        } else {
            warn!(
                code = %outcome.response_code,
                message = outcome.message.as_deref().unwrap_or("-"),
                "payment declined by gateway"
            );
        }

        Ok(outcome)
    }

    fn acquire_slot(&self, session: &str) -> CheckoutResult<InFlightGuard<'_>> {
        let mut slots = self.in_flight.lock().expect("in-flight lock poisoned");
        if !slots.insert(session.to_string()) {
            return Err(CheckoutError::AlreadyProcessing);
        }
        Ok(InFlightGuard {
            slots: &self.in_flight,
            session: session.to_string(),
        })
    }

    /// Mid-flow authorization failures clear the stored credential so the
    /// next attempt forces re-authentication. The in-flight attempt is
    /// abandoned, never silently retried.
    fn gate<T>(&self, session: &str, result: CheckoutResult<T>) -> CheckoutResult<T> {
        if let Err(CheckoutError::AuthenticationRequired) = &result {
            warn!("credential rejected mid-flow, clearing session");
            self.sessions.clear(session);
        }
        result
    }
}

/// Record the failed stage on the state machine before surfacing the error
fn fail(state: &mut CheckoutState, stage: FailedStage, err: CheckoutError) -> CheckoutError {
    if let Ok(next) = state.apply(CheckoutEvent::StepFailed(stage)) {
        *state = next;
    }
    warn!(stage = ?stage, error = %err, "checkout step failed");
    err
}
