//! # Payment Types
//!
//! The payment intent for one collection attempt, the gateway payloads, and
//! the defensive parsing + classification of the gateway's return
//! parameters.

use crate::billing::BillingInfo;
use crate::booking::{BookingRecord, HotelBookingRequest};
use crate::cart::{CartSnapshot, ItemKind};
use crate::error::{CheckoutError, CheckoutResult};
use crate::money::{Currency, Price};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Response codes the gateway documents as successful.
/// Kept as a single slice so extending the whitelist is one edit.
pub const GATEWAY_SUCCESS_CODES: &[&str] = &["0", "100"];

/// Fulfillment path chosen by the user before submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// External gateway payment with a redirect
    Online,
    /// Confirm now, collect in person later
    PayOnSite,
}

/// One attempt to collect payment for an existing booking.
///
/// The constructor takes the `BookingRecord` by reference, so an intent
/// cannot exist without a resolvable booking identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    /// Amount in smallest currency unit
    pub amount: i64,
    pub currency: Currency,
    /// Freshly generated per attempt
    pub order_id: String,
    pub booking_id: String,
    pub method: PaymentMethod,
    /// Gateway-assigned identifiers, present once initiated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
}

impl PaymentIntent {
    pub fn new(booking: &BookingRecord, total: Price, method: PaymentMethod) -> Self {
        Self {
            amount: total.amount,
            currency: total.currency,
            order_id: Uuid::new_v4().to_string(),
            booking_id: booking.booking_id.clone(),
            method,
            payment_id: None,
            session_id: None,
            payment_url: None,
        }
    }
}

/// Per-item line in the gateway's booking-data block
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub kind: ItemKind,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub adults: u32,
    pub price: f64,
}

/// Booking-data block embedded in gateway payloads: an item summary, a
/// human-readable itinerary, and for hotel bookings the fully-formed
/// downstream booking request the provider confirms asynchronously.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingData {
    pub items: Vec<ItemSummary>,
    pub itinerary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_booking: Option<HotelBookingRequest>,
}

impl BookingData {
    pub fn from_snapshot(
        snapshot: &CartSnapshot,
        hotel_booking: Option<HotelBookingRequest>,
    ) -> Self {
        let items = snapshot
            .items()
            .iter()
            .map(|i| ItemSummary {
                kind: i.kind(),
                name: i.name.clone(),
                start_date: i.start_date,
                end_date: i.end_date,
                adults: i.adults,
                price: i.unit_price.as_decimal(),
            })
            .collect();

        Self {
            items,
            itinerary: snapshot.itinerary(),
            hotel_booking,
        }
    }
}

/// Payment-initiation request body (§6: payment initiation)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub user_data: BillingInfo,
    pub booking_data: BookingData,
    pub amount: f64,
    pub currency: Currency,
    pub booking_id: String,
    pub order_id: String,
}

impl PaymentRequest {
    pub fn new(intent: &PaymentIntent, billing: &BillingInfo, booking_data: BookingData) -> Self {
        Self {
            user_data: billing.clone(),
            booking_data,
            amount: Price::from_minor(intent.amount, intent.currency).as_decimal(),
            currency: intent.currency,
            booking_id: intent.booking_id.clone(),
            order_id: intent.order_id.clone(),
        }
    }
}

/// Gateway response to a successful payment initiation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiatedPayment {
    pub payment_url: String,
    pub payment_id: String,
    pub session_id: String,
}

/// Provider response to a successful pay-on-site confirmation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfirmation {
    pub booking_id: String,
    pub booking_reference: String,
    pub payment_id: String,
    pub order_id: String,
    pub amount: f64,
    pub currency: Currency,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub instructions: Vec<String>,
}

/// Classification of a gateway return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeClass {
    Success,
    Failed,
    /// No recognizable response code: neither success nor failure
    Pending,
}

/// Query parameters the gateway appends when returning control.
/// Field names and presence are gateway-defined and vary, so extraction
/// probes a fixed list of fallback keys per field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayReturn {
    pub response_code: Option<String>,
    pub message: Option<String>,
    pub order_reference: Option<String>,
    pub masked_card: Option<String>,
    pub transaction_id: Option<String>,
    pub discount_amount: Option<String>,
    pub campaign: Option<String>,
}

fn first_present(params: &HashMap<String, String>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| params.get(*k))
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

impl GatewayReturn {
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        Self {
            response_code: first_present(params, &["responseCode", "response_code", "code"]),
            message: first_present(params, &["responseMessage", "message", "msg"]),
            order_reference: first_present(params, &["orderId", "order_id", "merchantOrderId"]),
            masked_card: first_present(params, &["maskedCreditCard", "maskedPan", "cardNo"]),
            transaction_id: first_present(params, &["transactionId", "transaction_id", "txnId"]),
            discount_amount: first_present(params, &["discountAmount", "discount"]),
            campaign: first_present(params, &["campaignId", "campaign"]),
        }
    }

    /// `"0"` or `"100"` means success; any other non-empty code is a
    /// failure; an absent code is pending.
    pub fn classify(&self) -> OutcomeClass {
        match self.response_code.as_deref() {
            Some(code) if GATEWAY_SUCCESS_CODES.contains(&code) => OutcomeClass::Success,
            Some(_) => OutcomeClass::Failed,
            None => OutcomeClass::Pending,
        }
    }

    /// Finalize into an outcome record. Pending returns are surfaced as a
    /// `GatewayOutcomeAmbiguous` error so callers cannot mistake them for
    /// either result.
    pub fn resolve(&self) -> CheckoutResult<PaymentOutcome> {
        match self.classify() {
            OutcomeClass::Pending => Err(CheckoutError::GatewayOutcomeAmbiguous(
                "gateway returned no response code".to_string(),
            )),
            class => Ok(PaymentOutcome {
                success: class == OutcomeClass::Success,
                response_code: self.response_code.clone().unwrap_or_default(),
                message: self.message.clone(),
                order_reference: self.order_reference.clone(),
                transaction_id: self.transaction_id.clone(),
                masked_card: self.masked_card.clone(),
                resolved_at: Utc::now(),
            }),
        }
    }
}

/// Final, classified result of an online payment attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOutcome {
    pub success: bool,
    pub response_code: String,
    pub message: Option<String>,
    pub order_reference: Option<String>,
    pub transaction_id: Option<String>,
    pub masked_card: Option<String>,
    pub resolved_at: DateTime<Utc>,
}
