// Business domains
pub mod auth;
pub mod contacts;
pub mod numbers;
pub mod sell_enquiries;
pub mod uploads;
