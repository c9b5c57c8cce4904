//! # Cart Types
//!
//! Cart items, the cart store seam, and the immutable snapshot a checkout
//! attempt runs against. The persisted cart is the only shared mutable
//! resource the workflow touches, and it is cleared from exactly one place
//! after a confirmed success.

use crate::error::{CheckoutError, CheckoutResult};
use crate::money::{Currency, Price};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// The three purchasable item kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Hotel,
    Activity,
    Transfer,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ItemKind::Hotel => "hotel",
            ItemKind::Activity => "activity",
            ItemKind::Transfer => "transfer",
        };
        write!(f, "{s}")
    }
}

/// Pickup descriptors for a ground transfer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferPickup {
    /// Pickup date and time
    pub pickup_at: NaiveDateTime,
    /// Origin terminal/station/hotel code
    pub origin_code: String,
    /// Origin location type (e.g. "IATA", "ATLAS")
    pub origin_kind: String,
    /// Destination code
    pub destination_code: String,
    /// Destination location type
    pub destination_kind: String,
}

/// Type-specific identifiers for a cart item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemDetails {
    /// Hotel stay quoted under an opaque, time-limited rate key
    Hotel { rate_key: String },
    /// Bookable activity identified by code + modality
    Activity {
        activity_code: String,
        modality_code: String,
    },
    /// Ground transfer quoted under a rate key, with pickup descriptors
    Transfer {
        rate_key: String,
        pickup: TransferPickup,
    },
}

impl ItemDetails {
    pub fn kind(&self) -> ItemKind {
        match self {
            ItemDetails::Hotel { .. } => ItemKind::Hotel,
            ItemDetails::Activity { .. } => ItemKind::Activity,
            ItemDetails::Transfer { .. } => ItemKind::Transfer,
        }
    }
}

/// One purchasable item in the cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Display name for itinerary summaries
    pub name: String,
    /// Stay/travel start date (check-in for hotels)
    pub start_date: NaiveDate,
    /// Stay end date (check-out for hotels; equals `start_date` otherwise)
    pub end_date: NaiveDate,
    /// Unit price as quoted
    pub unit_price: Price,
    /// Occupancy
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    #[serde(default = "default_rooms")]
    pub rooms: u32,
    /// Type-specific identifiers
    pub details: ItemDetails,
}

fn default_rooms() -> u32 {
    1
}

impl CartItem {
    pub fn kind(&self) -> ItemKind {
        self.details.kind()
    }

    /// Night count for hotel stays: checkout minus checkin in whole days
    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Price contribution of this item: hotel items are priced per night
    pub fn line_total(&self) -> CheckoutResult<Price> {
        match self.kind() {
            ItemKind::Hotel => {
                let nights = self.nights();
                if nights < 1 {
                    return Err(CheckoutError::InvalidDates(format!(
                        "check-out {} is not after check-in {}",
                        self.end_date, self.start_date
                    )));
                }
                Ok(Price::from_minor(
                    self.unit_price.amount * nights,
                    self.unit_price.currency,
                ))
            }
            _ => Ok(self.unit_price),
        }
    }
}

/// Immutable view of the cart frozen for one checkout attempt
#[derive(Debug, Clone)]
pub struct CartSnapshot {
    items: Vec<CartItem>,
    kind: ItemKind,
    total: Price,
}

impl CartSnapshot {
    /// Freeze a set of items for checkout.
    ///
    /// Rejects empty carts (there is no "empty checkout") and carts mixing
    /// item kinds: a checkout submission covers exactly one provider.
    pub fn build(items: Vec<CartItem>) -> CheckoutResult<Self> {
        let first = items.first().ok_or(CheckoutError::EmptyCart)?;
        let kind = first.kind();
        let currency = first.unit_price.currency;

        if let Some(other) = items.iter().find(|i| i.kind() != kind) {
            return Err(CheckoutError::MixedCart(format!(
                "{} and {}",
                kind,
                other.kind()
            )));
        }

        if items.iter().any(|i| i.unit_price.currency != currency) {
            return Err(CheckoutError::Validation(
                "All cart items must share one currency".to_string(),
            ));
        }

        let mut total = 0i64;
        for item in &items {
            total += item.line_total()?.amount;
        }

        Ok(Self {
            items,
            kind,
            total: Price::from_minor(total, currency),
        })
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn total(&self) -> Price {
        self.total
    }

    /// Rate key of the first item, for hotel/transfer carts
    pub fn first_rate_key(&self) -> Option<&str> {
        match &self.items.first()?.details {
            ItemDetails::Hotel { rate_key } | ItemDetails::Transfer { rate_key, .. } => {
                Some(rate_key)
            }
            ItemDetails::Activity { .. } => None,
        }
    }

    /// Human-readable itinerary line for gateway booking data
    pub fn itinerary(&self) -> String {
        self.items
            .iter()
            .map(|i| {
                format!(
                    "{} {} ({} -> {}, {} adults)",
                    i.kind(),
                    i.name,
                    i.start_date,
                    i.end_date,
                    i.adults
                )
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Persistence seam for the cart aggregate
pub trait CartStore: Send + Sync {
    /// Load the current items for a cart
    fn load(&self, cart_id: &str) -> Vec<CartItem>;

    /// Replace a cart's items
    fn save(&self, cart_id: &str, items: Vec<CartItem>);

    /// Empty a cart. Clearing an already-empty cart is a no-op, which makes
    /// the gateway-return clear idempotent against page re-renders.
    fn clear(&self, cart_id: &str);
}

/// In-memory cart store
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
    carts: RwLock<HashMap<String, Vec<CartItem>>>,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item to a cart
    pub fn add_item(&self, cart_id: &str, item: CartItem) {
        self.carts
            .write()
            .expect("cart store lock poisoned")
            .entry(cart_id.to_string())
            .or_default()
            .push(item);
    }
}

impl CartStore for InMemoryCartStore {
    fn load(&self, cart_id: &str) -> Vec<CartItem> {
        self.carts
            .read()
            .expect("cart store lock poisoned")
            .get(cart_id)
            .cloned()
            .unwrap_or_default()
    }

    fn save(&self, cart_id: &str, items: Vec<CartItem>) {
        self.carts
            .write()
            .expect("cart store lock poisoned")
            .insert(cart_id.to_string(), items);
    }

    fn clear(&self, cart_id: &str) {
        self.carts
            .write()
            .expect("cart store lock poisoned")
            .remove(cart_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    pub(crate) fn hotel_item(rate_key: &str, price: f64, nights: i64) -> CartItem {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        CartItem {
            name: "Hotel Bosphorus".into(),
            start_date: start,
            end_date: start + chrono::Duration::days(nights),
            unit_price: Price::new(price, Currency::EUR),
            adults: 2,
            children: 0,
            rooms: 1,
            details: ItemDetails::Hotel {
                rate_key: rate_key.into(),
            },
        }
    }

    fn activity_item(price: f64) -> CartItem {
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        CartItem {
            name: "Old Town Walking Tour".into(),
            start_date: date,
            end_date: date,
            unit_price: Price::new(price, Currency::EUR),
            adults: 2,
            children: 0,
            rooms: 1,
            details: ItemDetails::Activity {
                activity_code: "ACT-001".into(),
                modality_code: "STD".into(),
            },
        }
    }

    #[test]
    fn test_hotel_total_multiplies_nights() {
        let snapshot = CartSnapshot::build(vec![hotel_item("RK1", 100.0, 2)]).unwrap();
        assert_eq!(snapshot.total().amount, 20000); // 100.00 x 2 nights
        assert_eq!(snapshot.kind(), ItemKind::Hotel);
    }

    #[test]
    fn test_activity_total_is_flat() {
        let snapshot =
            CartSnapshot::build(vec![activity_item(45.0), activity_item(30.0)]).unwrap();
        assert_eq!(snapshot.total().amount, 7500);
    }

    #[test]
    fn test_empty_cart_rejected() {
        let err = CartSnapshot::build(vec![]).unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[test]
    fn test_mixed_cart_rejected() {
        let err =
            CartSnapshot::build(vec![hotel_item("RK1", 100.0, 2), activity_item(45.0)])
                .unwrap_err();
        assert!(matches!(err, CheckoutError::MixedCart(_)));
    }

    #[test]
    fn test_zero_night_stay_rejected() {
        let err = CartSnapshot::build(vec![hotel_item("RK1", 100.0, 0)]).unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidDates(_)));
    }

    #[test]
    fn test_first_rate_key() {
        let snapshot = CartSnapshot::build(vec![hotel_item("RK1", 100.0, 2)]).unwrap();
        assert_eq!(snapshot.first_rate_key(), Some("RK1"));

        let snapshot = CartSnapshot::build(vec![activity_item(45.0)]).unwrap();
        assert_eq!(snapshot.first_rate_key(), None);
    }

    #[test]
    fn test_cart_store_clear_is_idempotent() {
        let store = InMemoryCartStore::new();
        store.add_item("c1", hotel_item("RK1", 100.0, 2));
        assert_eq!(store.load("c1").len(), 1);

        store.clear("c1");
        assert!(store.load("c1").is_empty());
        store.clear("c1"); // no-op
        assert!(store.load("c1").is_empty());
    }

    #[test]
    fn test_itinerary_line() {
        let snapshot = CartSnapshot::build(vec![hotel_item("RK1", 100.0, 2)]).unwrap();
        let line = snapshot.itinerary();
        assert!(line.contains("hotel Hotel Bosphorus"));
        assert!(line.contains("2 adults"));
    }
}
