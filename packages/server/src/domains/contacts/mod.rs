//! Contacts domain - messages from the public contact form

pub mod models;

pub use models::{ContactInput, ContactMessage};
