use lazy_static::lazy_static;
use regex::Regex;

use super::models::SellEnquiryFields;
use crate::common::FieldError;

pub const TRANSACTION_TYPES: &[&str] = &["Sell", "Rent"];
pub const AVAILABILITY_STATUSES: &[&str] = &["Ready to move", "Under construction", "Available from"];
const AVAILABLE_FROM: &str = "Available from";

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").unwrap();
    static ref MOBILE_REGEX: Regex = Regex::new(r"^\+?\d{10,15}$").unwrap();
}

/// Check a complete enquiry record. Returns every failing field.
pub fn validate_enquiry(f: &SellEnquiryFields) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let required = [
        ("propertyType", &f.property_type, "Property type is required"),
        ("propertySubType", &f.property_sub_type, "Property subtype is required"),
        ("propertyName", &f.property_name, "Property name is required"),
        ("location", &f.location, "Location is required"),
        ("description", &f.description, "Description is required"),
        ("contactName", &f.contact_name, "Contact name is required"),
    ];
    for (field, value, message) in required {
        if value.trim().is_empty() {
            errors.push(FieldError::new(field, message));
        }
    }

    if !TRANSACTION_TYPES.contains(&f.transaction_type.as_str()) {
        errors.push(FieldError::new(
            "transactionType",
            "Transaction type must be Sell or Rent",
        ));
    }

    if f.price.is_nan() || f.price <= 0.0 {
        errors.push(FieldError::new("price", "Price must be greater than 0"));
    }

    if f.area.is_nan() || f.area <= 0.0 {
        errors.push(FieldError::new("area", "Area must be greater than 0"));
    }

    if !AVAILABILITY_STATUSES.contains(&f.availability_status.as_str()) {
        errors.push(FieldError::new(
            "availabilityStatus",
            "Availability status must be Ready to move, Under construction, or Available from",
        ));
    } else if f.availability_status == AVAILABLE_FROM && f.available_from.is_none() {
        errors.push(FieldError::new(
            "availableFrom",
            "Available from date is required when availability status is \"Available from\"",
        ));
    }

    if !EMAIL_REGEX.is_match(&f.contact_email) {
        errors.push(FieldError::new("contactEmail", "Valid email is required"));
    }

    if !MOBILE_REGEX.is_match(&f.contact_mobile) {
        errors.push(FieldError::new(
            "contactMobile",
            "Mobile number must be 10-15 digits",
        ));
    }

    errors
}
