pub mod mobile_number;

pub use mobile_number::{parse_number, MobileNumber, TEST_NUMBER};
