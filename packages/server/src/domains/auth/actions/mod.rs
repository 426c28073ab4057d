//! Auth domain actions - business logic functions
//!
//! Actions are async functions called directly from the HTTP handlers.

mod google_register;
mod send_otp;
mod verify_otp;

pub use google_register::google_register;
pub use send_otp::{send_login_otp, send_otp};
pub use verify_otp::{verify_login_otp, verify_otp};
