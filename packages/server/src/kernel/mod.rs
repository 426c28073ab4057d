//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod google_client;
pub mod test_dependencies;
pub mod traits;

pub use deps::{ServerDeps, TwilioAdapter};
pub use google_client::GoogleTokenInfoClient;
pub use test_dependencies::{MockIdentityVerifier, MockSmsService, SentSms, TestDependencies};
pub use traits::*;
