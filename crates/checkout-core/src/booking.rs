//! # Booking Types
//!
//! Provider-specific booking payloads, shaped per item kind, and the
//! `BookingRecord` a successful provider call yields. Records are never
//! fabricated client-side; the only constructor path is a parsed provider
//! response.

use crate::billing::BillingInfo;
use crate::cart::{CartSnapshot, ItemDetails, TransferPickup};
use crate::money::Currency;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Age assigned to child paxes when the cart carries no per-child ages
pub const DEFAULT_CHILD_AGE: u8 = 10;

/// Age assigned to activity paxes; the provider requires one per adult
pub const DEFAULT_ADULT_AGE: u8 = 30;

/// Acceptable price drift (percent) between quote and booking confirmation
pub const PRICE_TOLERANCE_PERCENT: f64 = 2.0;

/// A passenger entry in a booking payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pax {
    #[serde(rename = "type")]
    pub pax_type: PaxType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    pub name: String,
    pub surname: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaxType {
    Ad,
    Ch,
}

/// One room entry in a hotel booking
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomBooking {
    pub rate_key: String,
    pub paxes: Vec<Pax>,
}

/// Hotel booking payload. Carries the freshened rate key, never the
/// originally cached one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelBookingRequest {
    pub client_reference: String,
    pub holder: Pax,
    pub rooms: Vec<RoomBooking>,
    pub remark: String,
    /// Bounds acceptable price drift between quote and confirmation
    pub tolerance: f64,
}

/// One activity entry; a single client reference covers the submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityBookingItem {
    pub code: String,
    pub modality_code: String,
    pub date: NaiveDate,
    pub paxes: Vec<Pax>,
    pub price: f64,
    pub currency: Currency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityBookingRequest {
    pub client_reference: String,
    pub holder: Pax,
    pub items: Vec<ActivityBookingItem>,
}

/// Transfer detail block: pickup time and endpoint descriptors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferDetail {
    pub pickup_at: NaiveDateTime,
    pub origin_code: String,
    pub origin_kind: String,
    pub destination_code: String,
    pub destination_kind: String,
}

impl From<&TransferPickup> for TransferDetail {
    fn from(p: &TransferPickup) -> Self {
        Self {
            pickup_at: p.pickup_at,
            origin_code: p.origin_code.clone(),
            origin_kind: p.origin_kind.clone(),
            destination_code: p.destination_code.clone(),
            destination_kind: p.destination_kind.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferBookingItem {
    pub rate_key: String,
    pub transfer_detail: TransferDetail,
    pub passengers: Vec<Pax>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferBookingRequest {
    pub client_reference: String,
    pub items: Vec<TransferBookingItem>,
}

/// Provider-specific booking payload, one variant per item kind.
/// Dispatched by pattern match, not by comparing type strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BookingRequest {
    Hotel(HotelBookingRequest),
    Activity(ActivityBookingRequest),
    Transfer(TransferBookingRequest),
}

impl BookingRequest {
    /// Shape the provider payload for a frozen cart.
    ///
    /// For hotel carts `fresh_rate_key` must be the key returned by the most
    /// recent rate revalidation; it supersedes whatever the cart items carry.
    pub fn from_snapshot(
        snapshot: &CartSnapshot,
        billing: &BillingInfo,
        fresh_rate_key: Option<&str>,
    ) -> Self {
        let client_reference = Uuid::new_v4().to_string();
        let holder = Pax {
            pax_type: PaxType::Ad,
            age: None,
            name: billing.first_name.trim().to_string(),
            surname: billing.last_name.trim().to_string(),
        };

        // Kind uniformity is enforced by CartSnapshot::build, so the first
        // item's details decide the variant.
        match &snapshot.items()[0].details {
            ItemDetails::Hotel { rate_key } => {
                let item = &snapshot.items()[0];
                let rate_key = fresh_rate_key.unwrap_or(rate_key).to_string();

                let rooms = (0..item.rooms.max(1))
                    .map(|_| RoomBooking {
                        rate_key: rate_key.clone(),
                        paxes: room_paxes(billing, item.adults, item.children),
                    })
                    .collect();

                BookingRequest::Hotel(HotelBookingRequest {
                    client_reference,
                    holder,
                    rooms,
                    remark: "Booked via Voyage checkout".to_string(),
                    tolerance: PRICE_TOLERANCE_PERCENT,
                })
            }
            ItemDetails::Activity { .. } => {
                let items = snapshot
                    .items()
                    .iter()
                    .map(|item| {
                        let ItemDetails::Activity {
                            activity_code,
                            modality_code,
                        } = &item.details
                        else {
                            unreachable!("snapshot holds a single kind");
                        };
                        ActivityBookingItem {
                            code: activity_code.clone(),
                            modality_code: modality_code.clone(),
                            date: item.start_date,
                            paxes: activity_paxes(billing, item.adults),
                            price: item.unit_price.as_decimal(),
                            currency: item.unit_price.currency,
                        }
                    })
                    .collect();

                BookingRequest::Activity(ActivityBookingRequest {
                    client_reference,
                    holder,
                    items,
                })
            }
            ItemDetails::Transfer { .. } => {
                let items = snapshot
                    .items()
                    .iter()
                    .map(|item| {
                        let ItemDetails::Transfer { rate_key, pickup } = &item.details else {
                            unreachable!("snapshot holds a single kind");
                        };
                        TransferBookingItem {
                            rate_key: rate_key.clone(),
                            transfer_detail: pickup.into(),
                            passengers: transfer_passengers(billing, item.adults),
                        }
                    })
                    .collect();

                BookingRequest::Transfer(TransferBookingRequest {
                    client_reference,
                    items,
                })
            }
        }
    }

    /// Idempotency token carried by this submission
    pub fn client_reference(&self) -> &str {
        match self {
            BookingRequest::Hotel(r) => &r.client_reference,
            BookingRequest::Activity(r) => &r.client_reference,
            BookingRequest::Transfer(r) => &r.client_reference,
        }
    }

    /// Rate key the payload will submit, where the kind carries one
    pub fn rate_key(&self) -> Option<&str> {
        match self {
            BookingRequest::Hotel(r) => r.rooms.first().map(|room| room.rate_key.as_str()),
            BookingRequest::Transfer(r) => r.items.first().map(|i| i.rate_key.as_str()),
            BookingRequest::Activity(_) => None,
        }
    }
}

/// Adults: lead guest named from billing, companions get a placeholder.
/// Children get the default age when none is specified.
fn room_paxes(billing: &BillingInfo, adults: u32, children: u32) -> Vec<Pax> {
    let mut paxes = Vec::with_capacity((adults + children) as usize);
    for i in 0..adults {
        if i == 0 {
            paxes.push(Pax {
                pax_type: PaxType::Ad,
                age: None,
                name: billing.first_name.trim().to_string(),
                surname: billing.last_name.trim().to_string(),
            });
        } else {
            paxes.push(Pax {
                pax_type: PaxType::Ad,
                age: None,
                name: "Guest".to_string(),
                surname: "Companion".to_string(),
            });
        }
    }
    for _ in 0..children {
        paxes.push(Pax {
            pax_type: PaxType::Ch,
            age: Some(DEFAULT_CHILD_AGE),
            name: "Guest".to_string(),
            surname: "Child".to_string(),
        });
    }
    paxes
}

fn activity_paxes(billing: &BillingInfo, adults: u32) -> Vec<Pax> {
    (0..adults)
        .map(|i| Pax {
            pax_type: PaxType::Ad,
            age: Some(DEFAULT_ADULT_AGE),
            name: if i == 0 {
                billing.first_name.trim().to_string()
            } else {
                "Guest".to_string()
            },
            surname: if i == 0 {
                billing.last_name.trim().to_string()
            } else {
                "Companion".to_string()
            },
        })
        .collect()
}

fn transfer_passengers(billing: &BillingInfo, adults: u32) -> Vec<Pax> {
    // Same shaping as activities, minus the age requirement
    (0..adults)
        .map(|i| Pax {
            pax_type: PaxType::Ad,
            age: None,
            name: if i == 0 {
                billing.first_name.trim().to_string()
            } else {
                "Guest".to_string()
            },
            surname: if i == 0 {
                billing.last_name.trim().to_string()
            } else {
                "Companion".to_string()
            },
        })
        .collect()
}

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Created but not yet paired with a successful payment
    Pending,
    /// Confirmed by the provider
    Confirmed,
    /// Cancelled
    Cancelled,
}

/// A booking created by a provider. `booking_id` is the opaque identifier
/// subsequent payment calls reference; `reference` is the human-facing one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub booking_id: String,
    pub reference: String,
    pub status: BookingStatus,
    pub client_reference: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{CartItem, CartSnapshot, ItemDetails, TransferPickup};
    use crate::money::{Currency, Price};
    use chrono::{NaiveDate, NaiveDateTime};

    fn billing() -> BillingInfo {
        BillingInfo {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone: "5551234567".into(),
            address: "12 St James Sq".into(),
            city: "London".into(),
            state: "Greater London".into(),
            ..Default::default()
        }
    }

    fn hotel_snapshot(adults: u32, children: u32, rooms: u32) -> CartSnapshot {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        CartSnapshot::build(vec![CartItem {
            name: "Hotel Bosphorus".into(),
            start_date: start,
            end_date: start + chrono::Duration::days(2),
            unit_price: Price::new(100.0, Currency::EUR),
            adults,
            children,
            rooms,
            details: ItemDetails::Hotel {
                rate_key: "RK1".into(),
            },
        }])
        .unwrap()
    }

    #[test]
    fn test_hotel_payload_uses_fresh_rate_key() {
        let snapshot = hotel_snapshot(2, 0, 1);
        let request = BookingRequest::from_snapshot(&snapshot, &billing(), Some("RK2"));

        assert_eq!(request.rate_key(), Some("RK2"));
        let BookingRequest::Hotel(hotel) = request else {
            panic!("expected hotel payload");
        };
        assert_eq!(hotel.rooms.len(), 1);
        assert_eq!(hotel.tolerance, PRICE_TOLERANCE_PERCENT);
    }

    #[test]
    fn test_hotel_paxes_lead_guest_and_placeholders() {
        let snapshot = hotel_snapshot(3, 2, 1);
        let BookingRequest::Hotel(hotel) =
            BookingRequest::from_snapshot(&snapshot, &billing(), Some("RK2"))
        else {
            panic!("expected hotel payload");
        };

        let paxes = &hotel.rooms[0].paxes;
        assert_eq!(paxes.len(), 5);
        assert_eq!(paxes[0].name, "Ada");
        assert_eq!(paxes[0].surname, "Lovelace");
        assert_eq!(paxes[1].name, "Guest");
        assert_eq!(paxes[3].pax_type, PaxType::Ch);
        assert_eq!(paxes[3].age, Some(DEFAULT_CHILD_AGE));
    }

    #[test]
    fn test_hotel_one_room_entry_per_room_count() {
        let snapshot = hotel_snapshot(2, 0, 3);
        let BookingRequest::Hotel(hotel) =
            BookingRequest::from_snapshot(&snapshot, &billing(), Some("RK2"))
        else {
            panic!("expected hotel payload");
        };
        assert_eq!(hotel.rooms.len(), 3);
        assert!(hotel.rooms.iter().all(|r| r.rate_key == "RK2"));
    }

    #[test]
    fn test_activity_payload_shape() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let snapshot = CartSnapshot::build(vec![CartItem {
            name: "Old Town Walking Tour".into(),
            start_date: date,
            end_date: date,
            unit_price: Price::new(45.0, Currency::EUR),
            adults: 2,
            children: 0,
            rooms: 1,
            details: ItemDetails::Activity {
                activity_code: "ACT-001".into(),
                modality_code: "STD".into(),
            },
        }])
        .unwrap();

        let BookingRequest::Activity(activity) =
            BookingRequest::from_snapshot(&snapshot, &billing(), None)
        else {
            panic!("expected activity payload");
        };

        assert_eq!(activity.items.len(), 1);
        let item = &activity.items[0];
        assert_eq!(item.code, "ACT-001");
        assert_eq!(item.modality_code, "STD");
        assert_eq!(item.paxes.len(), 2);
        assert!(item.paxes.iter().all(|p| p.age == Some(DEFAULT_ADULT_AGE)));
        assert_eq!(item.price, 45.0);
    }

    #[test]
    fn test_transfer_payload_shape() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
        let pickup_at =
            NaiveDateTime::parse_from_str("2025-06-03 09:30", "%Y-%m-%d %H:%M").unwrap();
        let snapshot = CartSnapshot::build(vec![CartItem {
            name: "Airport Transfer".into(),
            start_date: date,
            end_date: date,
            unit_price: Price::new(35.0, Currency::EUR),
            adults: 2,
            children: 0,
            rooms: 1,
            details: ItemDetails::Transfer {
                rate_key: "TRK-9".into(),
                pickup: TransferPickup {
                    pickup_at,
                    origin_code: "IST".into(),
                    origin_kind: "IATA".into(),
                    destination_code: "HTL-42".into(),
                    destination_kind: "ATLAS".into(),
                },
            },
        }])
        .unwrap();

        let BookingRequest::Transfer(transfer) =
            BookingRequest::from_snapshot(&snapshot, &billing(), None)
        else {
            panic!("expected transfer payload");
        };

        assert_eq!(transfer.items.len(), 1);
        let item = &transfer.items[0];
        assert_eq!(item.rate_key, "TRK-9");
        assert_eq!(item.transfer_detail.origin_code, "IST");
        assert_eq!(item.passengers.len(), 2);
    }

    #[test]
    fn test_client_reference_is_fresh_per_build() {
        let snapshot = hotel_snapshot(2, 0, 1);
        let a = BookingRequest::from_snapshot(&snapshot, &billing(), Some("RK2"));
        let b = BookingRequest::from_snapshot(&snapshot, &billing(), Some("RK2"));
        assert_ne!(a.client_reference(), b.client_reference());
    }
}
