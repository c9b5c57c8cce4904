//! # checkout-api
//!
//! HTTP API layer for voyage-checkout-rs: session lifecycle, cart
//! manipulation, checkout submission, and the gateway return page, built on
//! `axum` over the `checkout-core` workflow.

pub mod handlers;
pub mod routes;
pub mod state;
