//! # Request Handlers
//!
//! Axum request handlers for the checkout API: session lifecycle, cart
//! manipulation, checkout submission, and the gateway return page.

use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use checkout_core::{
    BillingInfo, CartItem, CartStore, CheckoutError, CheckoutSuccess, Credential, PaymentMethod,
    SessionStore, SubmitCheckout,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Start-session request
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub session_id: String,
    pub token: String,
    pub user_id: String,
}

/// Checkout submission body; the cart id comes from the URL path
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// Session the credential is stored under
    pub session: String,
    pub billing: BillingInfo,
    pub method: PaymentMethod,
    /// Explicit items from the calling page; falls back to cart contents
    #[serde(default)]
    pub items: Option<Vec<CartItem>>,
}

/// Online checkout response; the UI performs a full-page redirect to
/// `redirect_url` after rendering its success message
#[derive(Debug, Serialize)]
pub struct OnlineCheckoutResponse {
    pub redirect_url: String,
    pub payment_id: String,
    pub session_id: String,
    pub order_id: String,
    pub booking_reference: String,
}

/// Pay-on-site checkout response
#[derive(Debug, Serialize)]
pub struct PayOnSiteResponse {
    pub booking_reference: String,
    pub instructions: Vec<String>,
    pub amount: f64,
    pub currency: checkout_core::Currency,
    pub message: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }
}

fn checkout_error_to_response(err: CheckoutError) -> (StatusCode, Json<ErrorResponse>) {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "voyage-checkout",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Store a session credential
#[instrument(skip(state, request), fields(session_id = %request.session_id))]
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> impl IntoResponse {
    state.sessions.store(
        &request.session_id,
        Credential {
            token: request.token,
            user_id: request.user_id,
        },
    );
    StatusCode::NO_CONTENT
}

/// Drop a session credential
#[instrument(skip(state))]
pub async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    state.sessions.clear(&session_id);
    StatusCode::NO_CONTENT
}

/// Add an item to a cart
#[instrument(skip(state, item), fields(cart_id = %cart_id, item = %item.name))]
pub async fn add_cart_item(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
    Json(item): Json<CartItem>,
) -> impl IntoResponse {
    state.carts.add_item(&cart_id, item);
    let count = state.carts.load(&cart_id).len();
    Json(serde_json::json!({ "cart_id": cart_id, "count": count }))
}

/// View cart contents
pub async fn get_cart(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
) -> impl IntoResponse {
    let items = state.carts.load(&cart_id);
    Json(serde_json::json!({
        "cart_id": cart_id,
        "count": items.len(),
        "items": items
    }))
}

/// Empty a cart
pub async fn clear_cart(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
) -> impl IntoResponse {
    state.carts.clear(&cart_id);
    StatusCode::NO_CONTENT
}

/// Submit a checkout attempt for a cart
#[instrument(skip(state, request), fields(cart_id = %cart_id, method = ?request.method))]
pub async fn submit_checkout(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
    Json(request): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let submission = SubmitCheckout {
        session: request.session,
        cart_id,
        billing: request.billing,
        method: request.method,
        items: request.items,
    };

    let success = state.workflow.submit(submission).await.map_err(|e| {
        error!("Checkout failed: {}", e);
        checkout_error_to_response(e)
    })?;

    match success {
        CheckoutSuccess::Redirect {
            payment_url,
            payment_id,
            session_id,
            order_id,
            booking,
        } => {
            info!("Checkout initiated, handing off to gateway");
            Ok(Json(serde_json::json!(OnlineCheckoutResponse {
                redirect_url: payment_url,
                payment_id,
                session_id,
                order_id,
                booking_reference: booking.reference,
            })))
        }
        CheckoutSuccess::OnSite(confirmation) => {
            info!("Pay-on-site checkout confirmed");
            Ok(Json(serde_json::json!(PayOnSiteResponse {
                booking_reference: confirmation.booking_reference,
                instructions: confirmation.instructions,
                amount: confirmation.amount,
                currency: confirmation.currency,
                message: confirmation.message,
            })))
        }
    }
}

/// Gateway return page: the gateway redirects the user back here with the
/// outcome encoded in query parameters
#[instrument(skip(state, params), fields(cart_id = %cart_id))]
pub async fn gateway_return(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let outcome = state
        .workflow
        .resolve_return(&cart_id, &params)
        .map_err(checkout_error_to_response)?;

    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error", 400);
        assert_eq!(err.error, "Test error");
        assert_eq!(err.code, 400);
    }

    #[test]
    fn test_checkout_error_conversion() {
        let (status, json) = checkout_error_to_response(CheckoutError::AuthenticationRequired);
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json.code, 401);

        let (status, _) =
            checkout_error_to_response(CheckoutError::GatewayOutcomeAmbiguous("no code".into()));
        assert_eq!(status, StatusCode::ACCEPTED);
    }
}
