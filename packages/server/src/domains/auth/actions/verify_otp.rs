//! Verify OTP actions (registration and login)

use tracing::{info, warn};

use super::send_otp::require_phone;
use crate::domains::auth::error::AuthError;
use crate::domains::auth::models::{NewUser, User};
use crate::domains::auth::types::{non_empty, AuthSession, LoginVerifyInput, VerifyOtpInput};
use crate::kernel::ServerDeps;

/// Validate phone + code and consume the stored OTP.
async fn consume_code(
    phone_number: Option<String>,
    otp: Option<String>,
    deps: &ServerDeps,
) -> Result<String, AuthError> {
    // Presence is checked on the trimmed value; the code itself is compared as sent.
    let (phone_number, otp) = match (non_empty(phone_number), otp) {
        (Some(phone), Some(otp)) if !otp.trim().is_empty() => (phone, otp),
        _ => {
            return Err(AuthError::InvalidInput(
                "phoneNumber and otp are required".to_string(),
            ))
        }
    };
    let phone = require_phone(Some(phone_number))?;

    deps.otp_store.consume(&phone, &otp).await.map_err(|reason| {
        warn!(phone = %phone, ?reason, "OTP rejected");
        AuthError::InvalidOrExpiredOtp
    })?;

    Ok(phone)
}

/// Verify a registration OTP and mark the user verified.
///
/// Creates the user if it does not exist yet. Provided username, email and
/// photo overwrite the stored values.
pub async fn verify_otp(
    input: VerifyOtpInput,
    profile_photo: Option<String>,
    deps: &ServerDeps,
) -> Result<AuthSession, AuthError> {
    let phone = consume_code(input.phone_number, input.otp, deps).await?;
    let username = non_empty(input.username);
    let email = non_empty(input.email);

    let user = match User::find_by_phone(&phone, &deps.db_pool).await? {
        Some(mut user) => {
            user.is_phone_verified = true;
            if username.is_some() {
                user.username = username;
            }
            if email.is_some() {
                user.email = email;
            }
            if profile_photo.is_some() {
                user.profile_photo = profile_photo;
            }
            let user = user.save(&deps.db_pool).await?;
            info!(user_id = user.id, "User verified");
            user
        }
        None => {
            let user = User::create(
                NewUser {
                    username,
                    email,
                    phone_number: Some(phone.clone()),
                    profile_photo,
                    is_phone_verified: true,
                    ..Default::default()
                },
                &deps.db_pool,
            )
            .await?;
            info!(user_id = user.id, "User created at verification");
            user
        }
    };

    let token = deps.jwt_service.create_token(&user)?;
    Ok(AuthSession { token, user })
}

/// Verify a login OTP. The code is consumed before the user lookup.
pub async fn verify_login_otp(
    input: LoginVerifyInput,
    deps: &ServerDeps,
) -> Result<AuthSession, AuthError> {
    let phone = consume_code(input.phone_number, input.otp, deps).await?;

    let mut user = User::find_by_phone(&phone, &deps.db_pool)
        .await?
        .ok_or_else(|| AuthError::UserNotFound("User not found".to_string()))?;

    user.is_phone_verified = true;
    let user = user.save(&deps.db_pool).await?;
    info!(user_id = user.id, "User logged in");

    let token = deps.jwt_service.create_token(&user)?;
    Ok(AuthSession { token, user })
}
