// Real-estate listing API - core library
//
// Phone OTP and Google sign-in, contact messages, the marketing number list,
// and property sell-enquiries with file attachments.
//
// Domain logic lives in domains/*; HTTP wiring in server/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
