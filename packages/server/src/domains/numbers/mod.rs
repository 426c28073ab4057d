//! Numbers domain - the marketing phone-number list

pub mod models;

pub use models::{parse_number, MobileNumber, TEST_NUMBER};
