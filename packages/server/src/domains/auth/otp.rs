//! In-process store of pending one-time codes.
//!
//! One entry per normalized phone number. Issuing a code overwrites any previous
//! entry for that phone. A code is removed only when it is consumed by a matching,
//! unexpired verification; mismatches and expired codes leave the entry in place
//! until the next issue overwrites it.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// How long an issued code stays valid.
pub const OTP_TTL_SECONDS: i64 = 5 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpEntry {
    /// Six ASCII digits
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl OtpEntry {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Why a consume attempt failed. Callers map every variant to the same error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpRejection {
    Missing,
    Expired,
    Mismatch,
}

/// Thread-safe, cloneable. Clones share the same map.
#[derive(Clone, Default)]
pub struct OtpStore {
    entries: Arc<Mutex<HashMap<String, OtpEntry>>>,
}

impl OtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate and store a fresh code for `phone`, replacing any existing one.
    pub async fn issue(&self, phone: &str) -> OtpEntry {
        self.issue_at(phone, Utc::now()).await
    }

    pub async fn issue_at(&self, phone: &str, now: DateTime<Utc>) -> OtpEntry {
        let entry = OtpEntry {
            code: generate_code(),
            expires_at: now + Duration::seconds(OTP_TTL_SECONDS),
        };
        self.entries
            .lock()
            .await
            .insert(phone.to_string(), entry.clone());
        entry
    }

    /// Check `code` against the stored entry and remove it on success.
    ///
    /// Lookup, comparison and removal happen under a single lock acquisition, so
    /// two concurrent calls with the same code cannot both succeed.
    pub async fn consume(&self, phone: &str, code: &str) -> Result<(), OtpRejection> {
        self.consume_at(phone, code, Utc::now()).await
    }

    pub async fn consume_at(
        &self,
        phone: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<(), OtpRejection> {
        let mut entries = self.entries.lock().await;

        let entry = entries.get(phone).ok_or(OtpRejection::Missing)?;
        if entry.is_expired_at(now) {
            return Err(OtpRejection::Expired);
        }
        if entry.code != code {
            return Err(OtpRejection::Mismatch);
        }

        entries.remove(phone);
        Ok(())
    }

    pub async fn get(&self, phone: &str) -> Option<OtpEntry> {
        self.entries.lock().await.get(phone).cloned()
    }

    pub async fn remove(&self, phone: &str) -> Option<OtpEntry> {
        self.entries.lock().await.remove(phone)
    }

    /// Number of entries, including expired ones not yet overwritten.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Uniform six-digit code in 100000..=999999.
pub fn generate_code() -> String {
    let n: u32 = rand::thread_rng().gen_range(100_000..=999_999);
    n.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHONE: &str = "+919999999999";

    #[test]
    fn test_generate_code_shape() {
        for _ in 0..1000 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            let n: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&n));
        }
    }

    #[tokio::test]
    async fn test_issue_sets_five_minute_expiry() {
        let store = OtpStore::new();
        let now = Utc::now();
        let entry = store.issue_at(PHONE, now).await;
        assert_eq!(entry.expires_at - now, Duration::seconds(300));
        assert_eq!(store.get(PHONE).await, Some(entry));
    }

    #[tokio::test]
    async fn test_issue_overwrites_existing_entry() {
        let store = OtpStore::new();
        let now = Utc::now();
        store.issue_at(PHONE, now).await;
        let second = store.issue_at(PHONE, now + Duration::seconds(10)).await;

        assert_eq!(store.len().await, 1);
        assert_eq!(store.get(PHONE).await, Some(second));
    }

    #[tokio::test]
    async fn test_consume_is_single_use() {
        let store = OtpStore::new();
        let entry = store.issue(PHONE).await;

        assert_eq!(store.consume(PHONE, &entry.code).await, Ok(()));
        assert_eq!(
            store.consume(PHONE, &entry.code).await,
            Err(OtpRejection::Missing)
        );
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_expired_code_fails_even_when_correct() {
        let store = OtpStore::new();
        let now = Utc::now();
        let entry = store.issue_at(PHONE, now).await;

        let later = now + Duration::seconds(OTP_TTL_SECONDS + 1);
        assert_eq!(
            store.consume_at(PHONE, &entry.code, later).await,
            Err(OtpRejection::Expired)
        );
    }

    #[tokio::test]
    async fn test_code_valid_at_exact_expiry() {
        let store = OtpStore::new();
        let now = Utc::now();
        let entry = store.issue_at(PHONE, now).await;

        assert_eq!(
            store.consume_at(PHONE, &entry.code, entry.expires_at).await,
            Ok(())
        );
    }

    #[tokio::test]
    async fn test_mismatch_keeps_entry_for_retry() {
        let store = OtpStore::new();
        let entry = store.issue(PHONE).await;
        let wrong = if entry.code == "123456" { "654321" } else { "123456" };

        assert_eq!(
            store.consume(PHONE, wrong).await,
            Err(OtpRejection::Mismatch)
        );
        assert!(store.get(PHONE).await.is_some());
        assert_eq!(store.consume(PHONE, &entry.code).await, Ok(()));
    }

    #[tokio::test]
    async fn test_unknown_phone() {
        let store = OtpStore::new();
        assert_eq!(
            store.consume(PHONE, "123456").await,
            Err(OtpRejection::Missing)
        );
    }

    #[tokio::test]
    async fn test_remove() {
        let store = OtpStore::new();
        store.issue(PHONE).await;
        assert!(store.remove(PHONE).await.is_some());
        assert!(store.remove(PHONE).await.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_consume_succeeds_once() {
        let store = OtpStore::new();
        let entry = store.issue(PHONE).await;

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                let code = entry.code.clone();
                tokio::spawn(async move { store.consume(PHONE, &code).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
    }
}
