//! Send OTP actions (registration and login)

use tracing::{error, info};

use crate::domains::auth::error::AuthError;
use crate::domains::auth::models::User;
use crate::domains::auth::phone::parse_phone;
use crate::domains::auth::types::{non_empty, OtpPurpose, SendOtpInput};
use crate::kernel::ServerDeps;

/// Resolve the submitted phone to its normalized form or reject the request.
pub(super) fn require_phone(raw: Option<String>) -> Result<String, AuthError> {
    let raw = non_empty(raw)
        .ok_or_else(|| AuthError::InvalidInput("phoneNumber is required".to_string()))?;
    parse_phone(&raw).ok_or_else(|| AuthError::InvalidInput("Invalid phoneNumber format".to_string()))
}

/// Send a registration OTP, creating an unverified user for new phones.
///
/// Returns the user's id. The code stays stored even if SMS delivery fails.
pub async fn send_otp(input: SendOtpInput, deps: &ServerDeps) -> Result<i64, AuthError> {
    let phone = require_phone(input.phone_number)?;

    let user = User::find_or_create_by_phone(&phone, &deps.db_pool).await?;

    dispatch_code(&phone, OtpPurpose::Registration, deps).await?;

    info!(user_id = user.id, phone = %phone, "Registration OTP sent");
    Ok(user.id)
}

/// Send a login OTP. Unknown phones are rejected and no user is created.
pub async fn send_login_otp(input: SendOtpInput, deps: &ServerDeps) -> Result<i64, AuthError> {
    let phone = require_phone(input.phone_number)?;

    let user = User::find_by_phone(&phone, &deps.db_pool)
        .await?
        .ok_or_else(|| {
            info!(phone = %phone, "Login OTP requested for unregistered phone");
            AuthError::UserNotFound("User not registered. Please sign up first.".to_string())
        })?;

    dispatch_code(&phone, OtpPurpose::Login, deps).await?;

    info!(user_id = user.id, phone = %phone, "Login OTP sent");
    Ok(user.id)
}

async fn dispatch_code(phone: &str, purpose: OtpPurpose, deps: &ServerDeps) -> Result<(), AuthError> {
    let entry = deps.otp_store.issue(phone).await;

    deps.sms
        .send_sms(phone, &purpose.sms_body(&entry.code))
        .await
        .map_err(|e| {
            error!(phone = %phone, error = %e, "Failed to send OTP");
            AuthError::DeliveryFailure(e.to_string())
        })
}
