//! # Billing Information
//!
//! Contact and address fields collected from the checkout form.
//! Validation is a pure check: no network call happens until it passes.

use crate::error::{CheckoutError, CheckoutResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

fn email_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$")
            .expect("email pattern is valid")
    })
}

fn phone_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Local-format digits, optional leading +, after whitespace stripping
    RE.get_or_init(|| Regex::new(r"^\+?\d{7,15}$").expect("phone pattern is valid"))
}

/// Guest contact and address details for one checkout attempt
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingInfo {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub postal_code: String,
}

impl BillingInfo {
    /// Validate required fields and formats.
    ///
    /// Missing fields are reported together as one combined message so the
    /// form can surface them in a single pass. Email and phone formats are
    /// only checked once present.
    pub fn validate(&self) -> CheckoutResult<()> {
        let required: [(&str, &str); 7] = [
            (self.first_name.trim(), "first name"),
            (self.last_name.trim(), "last name"),
            (self.email.trim(), "email"),
            (self.phone.trim(), "phone"),
            (self.address.trim(), "address"),
            (self.city.trim(), "city"),
            (self.state.trim(), "state"),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(value, _)| value.is_empty())
            .map(|(_, label)| *label)
            .collect();

        if !missing.is_empty() {
            return Err(CheckoutError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        if !email_pattern().is_match(self.email.trim()) {
            return Err(CheckoutError::Validation(format!(
                "Invalid email address: {}",
                self.email.trim()
            )));
        }

        let phone: String = self.phone.chars().filter(|c| !c.is_whitespace()).collect();
        if !phone_pattern().is_match(&phone) {
            return Err(CheckoutError::Validation(
                "Invalid phone number".to_string(),
            ));
        }

        Ok(())
    }

    /// Lead guest full name used for the first pax entry
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_billing() -> BillingInfo {
        BillingInfo {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone: "+44 20 7946 0958".into(),
            address: "12 St James Sq".into(),
            city: "London".into(),
            state: "Greater London".into(),
            country: "GB".into(),
            postal_code: "SW1Y 4JH".into(),
        }
    }

    #[test]
    fn test_valid_billing_passes() {
        assert!(valid_billing().validate().is_ok());
    }

    #[test]
    fn test_missing_fields_reported_together() {
        let billing = BillingInfo {
            email: "ada@example.com".into(),
            phone: "5551234567".into(),
            ..Default::default()
        };

        let err = billing.validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("first name"));
        assert!(msg.contains("last name"));
        assert!(msg.contains("address"));
        assert!(msg.contains("city"));
        assert!(msg.contains("state"));
        assert!(!msg.contains("email,"));
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut billing = valid_billing();
        billing.email = "not-an-email".into();
        let err = billing.validate().unwrap_err();
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn test_phone_whitespace_stripped() {
        let mut billing = valid_billing();
        billing.phone = "  555 123 4567 ".into();
        assert!(billing.validate().is_ok());

        billing.phone = "call-me".into();
        assert!(billing.validate().is_err());
    }

    #[test]
    fn test_full_name() {
        assert_eq!(valid_billing().full_name(), "Ada Lovelace");
    }
}
