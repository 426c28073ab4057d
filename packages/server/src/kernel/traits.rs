// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (OTP issuing, user upserts) lives in domain actions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseSmsService)

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// =============================================================================
// SMS Trait (Infrastructure - outbound text messages)
// =============================================================================

#[async_trait]
pub trait BaseSmsService: Send + Sync {
    /// Send a text message to a phone number in E.164 form.
    async fn send_sms(&self, to: &str, body: &str) -> Result<()>;
}

// =============================================================================
// Identity Verifier Trait (Infrastructure - federated ID tokens)
// =============================================================================

/// Claims returned by the identity provider for a verified ID token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Provider-assigned subject id
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

#[async_trait]
pub trait BaseIdentityVerifier: Send + Sync {
    /// Verify an ID token issued for `audience`.
    ///
    /// `Ok(None)` means the provider rejected the token (or it was issued for a
    /// different audience). `Err` is reserved for transport failures.
    async fn verify_id_token(&self, id_token: &str, audience: &str)
        -> Result<Option<IdentityClaims>>;
}
