pub mod sell_enquiry;

pub use sell_enquiry::{SellEnquiry, SellEnquiryFields};
