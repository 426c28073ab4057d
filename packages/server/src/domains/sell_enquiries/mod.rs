//! Sell enquiries domain - owners listing property for sale or rent

pub mod actions;
pub mod input;
pub mod models;
pub mod sanitize;
pub mod validation;

pub use actions::{create_enquiry, delete_enquiry, update_enquiry, EnquiryError};
pub use input::SellEnquiryInput;
pub use models::{SellEnquiry, SellEnquiryFields};
