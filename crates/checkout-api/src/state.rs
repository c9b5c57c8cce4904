//! # Application State
//!
//! Shared state for the Axum application: the session and cart stores, the
//! checkout workflow, and server configuration.

use checkout_core::{
    CheckoutWorkflow, InMemoryCartStore, InMemoryIntentStore, InMemorySessionStore,
    SharedBookingProvider, SharedPaymentGateway, SharedRateChecker,
};
use checkout_providers::{HttpBookingProvider, HttpPaymentGateway, HttpRateChecker, ProviderConfig};
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Session credentials
    pub sessions: Arc<InMemorySessionStore>,
    /// Per-user carts
    pub carts: Arc<InMemoryCartStore>,
    /// The checkout workflow driver
    pub workflow: Arc<CheckoutWorkflow>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState with HTTP collaborators from the environment
    pub fn new() -> anyhow::Result<Self> {
        let provider_config = ProviderConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load provider config: {}", e))?;

        let rates: SharedRateChecker = Arc::new(HttpRateChecker::new(provider_config.clone()));
        let bookings: SharedBookingProvider =
            Arc::new(HttpBookingProvider::new(provider_config.clone()));
        let gateway: SharedPaymentGateway = Arc::new(HttpPaymentGateway::new(provider_config));

        Ok(Self::with_collaborators(
            AppConfig::from_env(),
            rates,
            bookings,
            gateway,
        ))
    }

    /// Create state with explicit collaborators (used by tests)
    pub fn with_collaborators(
        config: AppConfig,
        rates: SharedRateChecker,
        bookings: SharedBookingProvider,
        gateway: SharedPaymentGateway,
    ) -> Self {
        let sessions = Arc::new(InMemorySessionStore::new());
        let carts = Arc::new(InMemoryCartStore::new());
        let intents = Arc::new(InMemoryIntentStore::new());

        let workflow = Arc::new(CheckoutWorkflow::new(
            sessions.clone(),
            carts.clone(),
            intents,
            rates,
            bookings,
            gateway,
        ));

        Self {
            sessions,
            carts,
            workflow,
            config,
        }
    }
}
