//! # Routes
//!
//! Axum router configuration for the checkout API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Sessions:
///   - POST   /api/v1/sessions - Store a credential
///   - DELETE /api/v1/sessions/{session_id} - Drop a credential
///
/// - Carts:
///   - POST   /api/v1/carts/{cart_id}/items - Add an item
///   - GET    /api/v1/carts/{cart_id} - View cart
///   - DELETE /api/v1/carts/{cart_id} - Empty cart
///
/// - Checkout:
///   - POST /api/v1/carts/{cart_id}/checkout - Submit a checkout attempt
///   - GET  /api/v1/payments/return/{cart_id} - Gateway return page
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let session_routes = Router::new()
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/{session_id}", delete(handlers::end_session));

    let cart_routes = Router::new()
        .route("/carts/{cart_id}/items", post(handlers::add_cart_item))
        .route(
            "/carts/{cart_id}",
            get(handlers::get_cart).delete(handlers::clear_cart),
        )
        .route("/carts/{cart_id}/checkout", post(handlers::submit_checkout));

    let payment_routes = Router::new().route(
        "/payments/return/{cart_id}",
        get(handlers::gateway_return),
    );

    let api_routes = Router::new()
        .merge(session_routes)
        .merge(cart_routes)
        .merge(payment_routes);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
