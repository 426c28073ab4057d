use anyhow::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::User;

/// Session tokens are valid for seven days.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// JWT Claims - data stored in the token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,                  // Subject (user id as string)
    pub user_id: i64,                 // User id
    pub phone_number: Option<String>, // Normalized phone, absent for Google-only users
    pub email: Option<String>,
    pub exp: i64,    // Expiration timestamp
    pub iat: i64,    // Issued at timestamp
    pub iss: String, // Issuer
    pub jti: String, // JWT ID (unique token identifier)
}

/// JWT Service - creates and verifies JWT tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    /// Create new JWT service with secret and issuer
    pub fn new(secret: &str, issuer: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// Create a new JWT token for a user
    ///
    /// Token expires after 7 days
    pub fn create_token(&self, user: &User) -> Result<String> {
        self.create_token_for(user.id, user.phone_number.clone(), user.email.clone())
    }

    pub fn create_token_for(
        &self,
        user_id: i64,
        phone_number: Option<String>,
        email: Option<String>,
    ) -> Result<String> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::days(TOKEN_TTL_DAYS);

        let claims = Claims {
            sub: user_id.to_string(),
            user_id,
            phone_number,
            email,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(), // Unique token ID
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify and decode a JWT token
    ///
    /// Returns claims if token is valid and not expired
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_verify_token() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string());

        let token = service
            .create_token_for(42, Some("+919999999999".to_string()), None)
            .unwrap();

        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.phone_number.as_deref(), Some("+919999999999"));
        assert_eq!(claims.email, None);
        assert_eq!(claims.iss, "test_issuer");
    }

    #[test]
    fn test_invalid_token() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string());
        let result = service.verify_token("invalid_token");
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let service1 = JwtService::new("secret1", "test_issuer".to_string());
        let service2 = JwtService::new("secret2", "test_issuer".to_string());

        let token = service1.create_token_for(7, None, None).unwrap();

        // Token created with secret1 should not verify with secret2
        let result = service2.verify_token(&token);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_issuer() {
        let service1 = JwtService::new("secret", "issuer-a".to_string());
        let service2 = JwtService::new("secret", "issuer-b".to_string());

        let token = service1.create_token_for(7, None, None).unwrap();
        assert!(service2.verify_token(&token).is_err());
    }

    #[test]
    fn test_token_lasts_seven_days() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string());
        let token = service
            .create_token_for(1, None, Some("a@b.com".to_string()))
            .unwrap();

        let claims = service.verify_token(&token).unwrap();

        let now = chrono::Utc::now().timestamp();
        let expires_in = claims.exp - now;
        assert!(expires_in > 7 * 24 * 3600 - 60);
        assert!(expires_in <= 7 * 24 * 3600);
    }
}
