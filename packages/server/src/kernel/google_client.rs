//! Google ID token verification via the public tokeninfo endpoint.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{BaseIdentityVerifier, IdentityClaims};

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Subset of the tokeninfo response we rely on.
#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    sub: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

pub struct GoogleTokenInfoClient {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleTokenInfoClient {
    pub fn new() -> Self {
        Self::with_endpoint(TOKENINFO_URL)
    }

    /// Point the client at a different tokeninfo endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl Default for GoogleTokenInfoClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseIdentityVerifier for GoogleTokenInfoClient {
    async fn verify_id_token(
        &self,
        id_token: &str,
        audience: &str,
    ) -> Result<Option<IdentityClaims>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .context("tokeninfo request failed")?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "Google rejected ID token");
            return Ok(None);
        }

        let info: TokenInfo = response
            .json()
            .await
            .context("tokeninfo response was not valid JSON")?;

        Ok(claims_for_audience(info, audience))
    }
}

fn claims_for_audience(info: TokenInfo, audience: &str) -> Option<IdentityClaims> {
    if audience.is_empty() || info.aud != audience {
        warn!(aud = %info.aud, "ID token audience mismatch");
        return None;
    }

    Some(IdentityClaims {
        sub: info.sub,
        email: info.email,
        name: info.name,
        picture: info.picture,
    })
}
