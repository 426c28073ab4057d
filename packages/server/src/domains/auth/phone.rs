//! Phone number normalization.
//!
//! Inputs arrive in whatever shape the client typed them ("98765 43210",
//! "+91-98765-43210", "919876543210"). Everything downstream (the OTP store key,
//! the SMS destination, the `users.phone_number` column) uses the normalized form.

use lazy_static::lazy_static;
use regex::Regex;

/// Country code prefixed to bare 10-digit numbers.
pub const DEFAULT_COUNTRY_CODE: &str = "+91";

lazy_static! {
    static ref NORMALIZED_PHONE_REGEX: Regex = Regex::new(r"^(\+[0-9]{9,14}|[0-9]{10,15})$").unwrap();
}

/// Normalize a phone number to `+<country code><digits>`.
///
/// Keeps digits and a leading `+`. Returns `None` when the digit count is not
/// 10 (local) or 11-15 (international without `+`). Input that already starts
/// with `+` is returned as-is, so callers must still run [`is_valid_normalized`].
pub fn normalize_phone(raw: &str) -> Option<String> {
    let mut cleaned = String::with_capacity(raw.len());
    for c in raw.trim().chars() {
        if c.is_ascii_digit() || (c == '+' && cleaned.is_empty()) {
            cleaned.push(c);
        }
    }

    if cleaned.starts_with('+') {
        return Some(cleaned);
    }

    match cleaned.len() {
        10 => Some(format!("{}{}", DEFAULT_COUNTRY_CODE, cleaned)),
        11..=15 => Some(format!("+{}", cleaned)),
        _ => None,
    }
}

/// 10-15 characters of digits with an optional leading `+`.
pub fn is_valid_normalized(phone: &str) -> bool {
    NORMALIZED_PHONE_REGEX.is_match(phone)
}

/// Normalize and validate in one step.
pub fn parse_phone(raw: &str) -> Option<String> {
    normalize_phone(raw).filter(|phone| is_valid_normalized(phone))
}
