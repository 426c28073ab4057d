//! Request inputs and results for the auth actions.
//!
//! Every field is optional at the type level; actions decide which are
//! required and reject with `AuthError::InvalidInput`.

use serde::{Deserialize, Deserializer, Serialize};

use super::models::{User, UserProfile};

/// Phone numbers arrive as JSON strings or bare numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    }))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpInput {
    #[serde(default, deserialize_with = "string_or_number")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpInput {
    #[serde(default, deserialize_with = "string_or_number")]
    pub phone_number: Option<String>,
    pub otp: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginVerifyInput {
    #[serde(default, deserialize_with = "string_or_number")]
    pub phone_number: Option<String>,
    pub otp: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleRegisterInput {
    pub google_id: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "token")]
    pub google_token: Option<String>,
    /// Photo URL; falls back to the provider's picture claim.
    pub profile_photo: Option<String>,
}

/// Which SMS wording to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpPurpose {
    Registration,
    Login,
}

impl OtpPurpose {
    pub fn sms_body(self, code: &str) -> String {
        let purpose = match self {
            OtpPurpose::Registration => "registration",
            OtpPurpose::Login => "login",
        };
        format!(
            "Your OTP for {} is {}. It expires in 5 minutes.",
            purpose, code
        )
    }
}

/// A signed-in user and their session token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpResponse {
    pub success: bool,
    pub message: String,
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserProfile,
}

impl AuthResponse {
    pub fn new(message: &str, session: AuthSession) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            user: session.user.profile(),
            token: session.token,
        }
    }
}

/// Treat empty strings from form posts as absent.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
