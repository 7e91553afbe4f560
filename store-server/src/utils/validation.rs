//! Field-level validation
//!
//! Client-correctable errors are reported as a `{field, msg, value}` list
//! so the storefront can highlight the offending input or prune the
//! offending cart line.

use crate::db::models::CustomerInfo;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One client-correctable validation failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub msg: String,
    pub value: Value,
}

impl FieldError {
    pub fn new(field: impl Into<String>, msg: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            msg: msg.into(),
            value: value.into(),
        }
    }
}

/// Non-empty after trimming
pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// local@domain.tld, without pulling in a regex engine for it
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && (2..=4).contains(&tld.len()) && tld.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Exactly ten digits
pub fn is_valid_phone(value: &str) -> bool {
    value.len() == 10 && value.chars().all(|c| c.is_ascii_digit())
}

/// Validate the customer contact block of an order payload
pub fn validate_customer(customer: &CustomerInfo) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if !is_present(&customer.name) {
        errors.push(FieldError::new("name", "Name is required", customer.name.clone()));
    }
    if !is_valid_phone(&customer.phone) {
        errors.push(FieldError::new(
            "phone",
            "Phone number must be ten digits",
            customer.phone.clone(),
        ));
    }
    if !is_valid_email(&customer.email) {
        errors.push(FieldError::new(
            "email",
            "Email address is invalid",
            customer.email.clone(),
        ));
    }
    if !is_present(&customer.address) {
        errors.push(FieldError::new(
            "address",
            "Delivery address is required",
            customer.address.clone(),
        ));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> CustomerInfo {
        CustomerInfo {
            name: "Alice".into(),
            phone: "0912345678".into(),
            email: "alice@example.com".into(),
            address: "12 Market St".into(),
        }
    }

    #[test]
    fn accepts_complete_customer() {
        assert!(validate_customer(&customer()).is_empty());
    }

    #[test]
    fn rejects_blank_name_and_address() {
        let mut c = customer();
        c.name = "   ".into();
        c.address = String::new();
        let errors = validate_customer(&c);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "address"]);
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@.co"));
        assert!(!is_valid_email("plainaddress"));
    }

    #[test]
    fn phone_shapes() {
        assert!(is_valid_phone("0912345678"));
        assert!(!is_valid_phone("091234567"));
        assert!(!is_valid_phone("09123456789"));
        assert!(!is_valid_phone("09123x5678"));
    }
}
