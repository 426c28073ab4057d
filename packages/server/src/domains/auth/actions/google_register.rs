//! Google sign-in / registration action

use tracing::{error, info, warn};

use crate::domains::auth::error::AuthError;
use crate::domains::auth::models::{NewUser, User};
use crate::domains::auth::types::{non_empty, AuthSession, GoogleRegisterInput};
use crate::kernel::ServerDeps;

/// Register or sign in with a Google ID token.
///
/// Looks up by Google id first, then by email. Existing users only get their
/// Google id and photo filled in when those are missing.
pub async fn google_register(
    input: GoogleRegisterInput,
    deps: &ServerDeps,
) -> Result<AuthSession, AuthError> {
    let (google_id, email, google_token) = match (
        non_empty(input.google_id),
        non_empty(input.email),
        non_empty(input.google_token),
    ) {
        (Some(id), Some(email), Some(token)) => (id, email, token),
        _ => {
            return Err(AuthError::InvalidInput(
                "googleId, email, and googleToken are required".to_string(),
            ))
        }
    };
    let profile_photo = non_empty(input.profile_photo);

    let claims = deps
        .identity
        .verify_id_token(&google_token, &deps.google_client_id)
        .await
        .map_err(|e| {
            error!(error = %e, "Google token verification failed");
            AuthError::UpstreamVerification(e.to_string())
        })?
        .ok_or(AuthError::InvalidToken)?;

    if claims.sub != google_id {
        warn!(google_id = %google_id, "Google token subject mismatch");
        return Err(AuthError::InvalidToken);
    }

    let existing = match User::find_by_google_id(&google_id, &deps.db_pool).await? {
        Some(user) => Some(user),
        None => User::find_by_email(&email, &deps.db_pool).await?,
    };

    let user = match existing {
        Some(mut user) => {
            if user.google_id.is_none() {
                user.google_id = Some(google_id);
            }
            if user.profile_photo.is_none() {
                user.profile_photo = profile_photo.or(claims.picture);
            }
            let user = user.save(&deps.db_pool).await?;
            info!(user_id = user.id, "Google user signed in");
            user
        }
        None => {
            let username = claims
                .name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| email_local_part(&email).to_string());
            let user = User::create(
                NewUser {
                    username: Some(username),
                    email: Some(email),
                    google_id: Some(google_id),
                    profile_photo: profile_photo.or(claims.picture),
                    is_phone_verified: false,
                    ..Default::default()
                },
                &deps.db_pool,
            )
            .await?;
            info!(user_id = user.id, "Google user created");
            user
        }
    };

    let token = deps.jwt_service.create_token(&user)?;
    Ok(AuthSession { token, user })
}

fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_local_part() {
        assert_eq!(email_local_part("asha@example.com"), "asha");
        assert_eq!(email_local_part("no-at-sign"), "no-at-sign");
    }
}
