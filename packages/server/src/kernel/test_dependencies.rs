// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::{BaseIdentityVerifier, BaseSmsService, IdentityClaims, ServerDeps};
use crate::domains::auth::{JwtService, OtpStore};
use crate::domains::uploads::UploadStore;

// =============================================================================
// Mock SMS Service
// =============================================================================

/// A message captured by `MockSmsService`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentSms {
    pub to: String,
    pub body: String,
}

pub struct MockSmsService {
    sent: Arc<Mutex<Vec<SentSms>>>,
    fail_with: Arc<Mutex<Option<String>>>,
}

impl MockSmsService {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail_with: Arc::new(Mutex::new(None)),
        }
    }

    /// Make every subsequent send fail with the given message
    pub fn fail_with(self, message: &str) -> Self {
        *self.fail_with.lock().unwrap() = Some(message.to_string());
        self
    }

    /// Stop failing
    pub fn recover(&self) {
        *self.fail_with.lock().unwrap() = None;
    }

    /// Get all messages that were sent
    pub fn sent(&self) -> Vec<SentSms> {
        self.sent.lock().unwrap().clone()
    }

    /// Get the last message sent to a number
    pub fn last_to(&self, to: &str) -> Option<SentSms> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|sms| sms.to == to)
            .cloned()
    }

    /// Extract the 6-digit code from the last message sent to a number
    pub fn last_code_for(&self, to: &str) -> Option<String> {
        let sms = self.last_to(to)?;
        sms.body
            .split_whitespace()
            .map(|word| word.trim_end_matches('.'))
            .find(|word| word.len() == 6 && word.chars().all(|c| c.is_ascii_digit()))
            .map(String::from)
    }
}

impl Default for MockSmsService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseSmsService for MockSmsService {
    async fn send_sms(&self, to: &str, body: &str) -> Result<()> {
        let failure = self.fail_with.lock().unwrap().clone();
        if let Some(message) = failure {
            anyhow::bail!(message);
        }
        self.sent.lock().unwrap().push(SentSms {
            to: to.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

// =============================================================================
// Mock Identity Verifier
// =============================================================================

pub struct MockIdentityVerifier {
    /// token -> (audience, claims)
    tokens: Arc<Mutex<Vec<(String, String, IdentityClaims)>>>,
    unreachable: bool,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockIdentityVerifier {
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(Mutex::new(Vec::new())),
            unreachable: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Accept `token` for `audience`, returning `claims`
    pub fn with_token(self, token: &str, audience: &str, claims: IdentityClaims) -> Self {
        self.tokens
            .lock()
            .unwrap()
            .push((token.to_string(), audience.to_string(), claims));
        self
    }

    /// Simulate the provider being unreachable
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// Tokens passed to verify_id_token
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockIdentityVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseIdentityVerifier for MockIdentityVerifier {
    async fn verify_id_token(
        &self,
        id_token: &str,
        audience: &str,
    ) -> Result<Option<IdentityClaims>> {
        self.calls.lock().unwrap().push(id_token.to_string());

        if self.unreachable {
            anyhow::bail!("identity provider unreachable");
        }
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|(token, aud, _)| token == id_token && aud == audience)
            .map(|(_, _, claims)| claims.clone()))
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

pub const TEST_JWT_SECRET: &str = "test_secret_key";
pub const TEST_JWT_ISSUER: &str = "test_issuer";
pub const TEST_GOOGLE_CLIENT_ID: &str = "test-client.apps.googleusercontent.com";

#[derive(Clone)]
pub struct TestDependencies {
    pub sms: Arc<MockSmsService>,
    pub identity: Arc<MockIdentityVerifier>,
    pub otp_store: OtpStore,
    pub upload_dir: PathBuf,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            sms: Arc::new(MockSmsService::new()),
            identity: Arc::new(MockIdentityVerifier::new()),
            otp_store: OtpStore::new(),
            upload_dir: std::env::temp_dir()
                .join(format!("estate-uploads-{}", uuid::Uuid::new_v4().simple())),
        }
    }

    /// Set a mock SMS service
    pub fn mock_sms(mut self, sms: MockSmsService) -> Self {
        self.sms = Arc::new(sms);
        self
    }

    /// Set a mock identity verifier
    pub fn mock_identity(mut self, identity: MockIdentityVerifier) -> Self {
        self.identity = Arc::new(identity);
        self
    }

    pub fn jwt_service(&self) -> JwtService {
        JwtService::new(TEST_JWT_SECRET, TEST_JWT_ISSUER.to_string())
    }

    /// Convert into ServerDeps for testing
    pub fn into_server_deps(self, db_pool: PgPool) -> Result<ServerDeps> {
        let jwt_service = Arc::new(self.jwt_service());
        Ok(ServerDeps::new(
            db_pool,
            self.sms,
            self.identity,
            self.otp_store,
            jwt_service,
            UploadStore::new(self.upload_dir)?,
            TEST_GOOGLE_CLIENT_ID.to_string(),
        ))
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
