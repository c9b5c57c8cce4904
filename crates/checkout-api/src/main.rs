//! # Voyage Checkout
//!
//! Booking and payment checkout service.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export VOYAGE_INVENTORY_URL=https://inventory.example.com
//! export VOYAGE_PAYMENT_URL=https://payments.example.com
//! export VOYAGE_API_KEY=...
//!
//! # Run the server
//! voyage-checkout
//! ```

use checkout_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr();
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("Voyage Checkout starting on http://{}", addr);

    if !is_prod {
        info!("Health: GET http://{}/health", addr);
        info!("Checkout: POST http://{}/api/v1/carts/{{cart_id}}/checkout", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
