//! # Booking Provider Client
//!
//! Submits the kind-specific booking payload to the inventory API. The
//! endpoint is chosen by pattern match on the payload variant. A response
//! with no extractable booking identifier fails the attempt; payment never
//! follows a failed booking.

use crate::config::ProviderConfig;
use crate::http::{build_client, read_body};
use checkout_core::{
    BookingProvider, BookingRecord, BookingRequest, BookingStatus, CheckoutError, CheckoutResult,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};

/// Inventory-API implementation of the booking seam
pub struct HttpBookingProvider {
    config: ProviderConfig,
    client: Client,
}

impl HttpBookingProvider {
    pub fn new(config: ProviderConfig) -> Self {
        let client = build_client(&config);
        Self { config, client }
    }

    /// Create from environment variables
    pub fn from_env() -> CheckoutResult<Self> {
        Ok(Self::new(ProviderConfig::from_env()?))
    }

    fn endpoint(&self, request: &BookingRequest) -> String {
        let path = match request {
            BookingRequest::Hotel(_) => "/bookings/hotels",
            BookingRequest::Activity(_) => "/bookings/activities",
            BookingRequest::Transfer(_) => "/bookings/transfers",
        };
        format!("{}{}", self.config.inventory_base_url, path)
    }
}

#[async_trait]
impl BookingProvider for HttpBookingProvider {
    #[instrument(skip(self, request), fields(client_reference = %request.client_reference()))]
    async fn create_booking(&self, request: &BookingRequest) -> CheckoutResult<BookingRecord> {
        let url = self.endpoint(request);
        debug!(%url, "submitting booking payload");

        let response = self
            .client
            .post(&url)
            .header("X-Api-Key", &self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        let body = read_body("inventory", response).await?;

        // Any shape problem in the response is a booking failure, not a
        // serialization detail: without a booking id nothing downstream
        // may run.
        let parsed: CreateBookingResponse = serde_json::from_str(&body).map_err(|e| {
            CheckoutError::BookingCreationFailed(format!("unparsable booking response: {}", e))
        })?;

        let booking = parsed.booking.ok_or_else(|| {
            CheckoutError::BookingCreationFailed(
                "response carried no booking object".to_string(),
            )
        })?;

        if booking.id.trim().is_empty() {
            return Err(CheckoutError::BookingCreationFailed(
                "response carried an empty booking id".to_string(),
            ));
        }

        info!(booking_id = %booking.id, reference = %booking.reference, "booking created");

        Ok(BookingRecord {
            booking_id: booking.id,
            reference: booking.reference,
            status: booking.status,
            client_reference: request.client_reference().to_string(),
        })
    }
}

// =============================================================================
// Inventory API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct CreateBookingResponse {
    #[serde(default)]
    booking: Option<CreatedBooking>,
}

#[derive(Debug, Deserialize)]
struct CreatedBooking {
    id: String,
    reference: String,
    #[serde(default = "pending")]
    status: BookingStatus,
}

fn pending() -> BookingStatus {
    BookingStatus::Pending
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_core::{BillingInfo, CartItem, CartSnapshot, Currency, ItemDetails, Price};
    use chrono::NaiveDate;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> HttpBookingProvider {
        HttpBookingProvider::new(
            ProviderConfig::new("https://unused.test", "https://unused.test", "key-123")
                .with_inventory_base_url(server.uri()),
        )
    }

    fn hotel_request() -> BookingRequest {
        let billing = BillingInfo {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone: "5551234567".into(),
            address: "12 St James Sq".into(),
            city: "London".into(),
            state: "Greater London".into(),
            ..Default::default()
        };
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let snapshot = CartSnapshot::build(vec![CartItem {
            name: "Hotel Bosphorus".into(),
            start_date: start,
            end_date: start + chrono::Duration::days(2),
            unit_price: Price::new(100.0, Currency::EUR),
            adults: 2,
            children: 0,
            rooms: 1,
            details: ItemDetails::Hotel {
                rate_key: "RK1".into(),
            },
        }])
        .unwrap();
        BookingRequest::from_snapshot(&snapshot, &billing, Some("RK2"))
    }

    #[tokio::test]
    async fn test_hotel_booking_hits_hotel_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bookings/hotels"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "booking": { "id": "bk-55", "reference": "VY-2025-55", "status": "pending" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = hotel_request();
        let record = provider(&server).create_booking(&request).await.unwrap();

        assert_eq!(record.booking_id, "bk-55");
        assert_eq!(record.reference, "VY-2025-55");
        assert_eq!(record.status, BookingStatus::Pending);
        assert_eq!(record.client_reference, request.client_reference());
    }

    #[tokio::test]
    async fn test_missing_booking_object_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bookings/hotels"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
            .mount(&server)
            .await;

        let err = provider(&server)
            .create_booking(&hotel_request())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::BookingCreationFailed(_)));
    }

    #[tokio::test]
    async fn test_unparsable_body_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bookings/hotels"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = provider(&server)
            .create_booking(&hotel_request())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::BookingCreationFailed(_)));
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_authentication_required() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bookings/hotels"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = provider(&server)
            .create_booking(&hotel_request())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::AuthenticationRequired));
    }
}
