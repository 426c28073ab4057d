// HTTP routes
pub mod auth;
pub mod contacts;
pub mod health;
pub mod numbers;
pub mod sell_enquiries;

pub use health::*;
