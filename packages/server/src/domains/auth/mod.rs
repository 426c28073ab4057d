//! Auth domain - phone OTP and Google sign-in
//!
//! Responsibilities:
//! - Phone normalization and the in-process OTP store
//! - OTP delivery via the SMS gateway
//! - User upsert on verification
//! - Session/JWT token management

pub mod actions;
pub mod error;
pub mod jwt;
pub mod models;
pub mod otp;
pub mod phone;
pub mod types;

pub use error::{AuthError, AuthStage};
pub use jwt::{Claims, JwtService};
pub use models::{User, UserProfile};
pub use otp::{OtpEntry, OtpStore};
