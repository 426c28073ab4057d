//! Server dependencies for domain actions (using traits for testability)
//!
//! This module provides the central dependency container used by all domain actions.
//! All external services use trait abstractions to enable testing.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use twilio::TwilioService;

use crate::domains::auth::{JwtService, OtpStore};
use crate::domains::uploads::UploadStore;
use crate::kernel::{BaseIdentityVerifier, BaseSmsService};

// =============================================================================
// TwilioService Adapter (implements BaseSmsService trait)
// =============================================================================

/// Wrapper around TwilioService that implements BaseSmsService trait
pub struct TwilioAdapter(pub Arc<TwilioService>);

impl TwilioAdapter {
    pub fn new(service: Arc<TwilioService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseSmsService for TwilioAdapter {
    async fn send_sms(&self, to: &str, body: &str) -> Result<()> {
        let message = self
            .0
            .send_sms(to, body)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        tracing::debug!(sid = %message.sid, status = %message.status, "Twilio accepted message");
        Ok(())
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to actions (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    pub sms: Arc<dyn BaseSmsService>,
    /// Verifies federated ID tokens (Google tokeninfo in production)
    pub identity: Arc<dyn BaseIdentityVerifier>,
    /// Process-wide pending OTP codes, keyed by normalized phone
    pub otp_store: OtpStore,
    /// JWT service for token creation
    pub jwt_service: Arc<JwtService>,
    pub uploads: UploadStore,
    /// Expected audience for Google ID tokens
    pub google_client_id: String,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        db_pool: PgPool,
        sms: Arc<dyn BaseSmsService>,
        identity: Arc<dyn BaseIdentityVerifier>,
        otp_store: OtpStore,
        jwt_service: Arc<JwtService>,
        uploads: UploadStore,
        google_client_id: String,
    ) -> Self {
        Self {
            db_pool,
            sms,
            identity,
            otp_store,
            jwt_service,
            uploads,
            google_client_id,
        }
    }
}
