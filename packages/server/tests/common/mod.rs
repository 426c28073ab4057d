// Common test utilities
#![allow(dead_code)]


pub mod harness;
pub mod http;

pub use harness::*;
pub use http::*;

/// A random 10-digit Indian mobile number, so tests sharing one database never collide.
pub fn random_phone() -> String {
    format!("9{:09}", rand::random::<u32>() % 1_000_000_000)
}

/// The stored form of a 10-digit number.
pub fn normalized(phone: &str) -> String {
    format!("+91{}", phone)
}

/// Count files currently in the harness upload directory.
pub fn stored_file_count(ctx: &TestHarness) -> usize {
    std::fs::read_dir(&ctx.deps.upload_dir)
        .map(|dir| dir.count())
        .unwrap_or(0)
}
