//! `/api/auth` routes: phone OTP registration and login, Google sign-in, users.

use axum::{
    extract::{Extension, FromRequest, Path, Request},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::debug;

use crate::common::{ApiError, ApiResult};
use crate::domains::auth::actions::{
    google_register, send_login_otp, send_otp, verify_login_otp, verify_otp,
};
use crate::domains::auth::types::{
    AuthResponse, GoogleRegisterInput, LoginVerifyInput, SendOtpInput, SendOtpResponse,
    VerifyOtpInput,
};
use crate::domains::auth::{AuthStage, User, UserProfile};
use crate::domains::uploads::PROFILE_PHOTO_RULES;
use crate::server::app::AxumAppState;
use crate::server::extract::{is_multipart, multipart_form, FormOrJson};
use crate::server::middleware::AuthUser;

const OTP_SENT: &str = "OTP sent to your phone number via SMS";

pub fn routes() -> Router {
    Router::new()
        .route("/send-otp", post(send_otp_handler))
        .route("/verify-otp", post(verify_otp_handler))
        .route("/login/send-otp", post(login_send_otp_handler))
        .route("/login/verify-otp", post(login_verify_otp_handler))
        .route("/google-register", post(google_register_handler))
        .route("/users", get(list_users_handler))
        .route("/users/:id", get(get_user_handler))
        .route("/me", get(me_handler))
}

async fn send_otp_handler(
    Extension(state): Extension<AxumAppState>,
    FormOrJson(input): FormOrJson<SendOtpInput>,
) -> ApiResult<Json<SendOtpResponse>> {
    let user_id = send_otp(input, &state.server_deps)
        .await
        .map_err(|e| e.into_api_error(AuthStage::SendOtp))?;

    Ok(Json(SendOtpResponse {
        success: true,
        message: OTP_SENT.to_string(),
        user_id,
    }))
}

/// Accepts multipart (with an optional `profilePhoto` file), urlencoded or JSON.
async fn verify_otp_handler(
    Extension(state): Extension<AxumAppState>,
    request: Request,
) -> ApiResult<Json<AuthResponse>> {
    let deps = &state.server_deps;

    let (input, photo) = if is_multipart(request.headers()) {
        let form = multipart_form(request, PROFILE_PHOTO_RULES, "Invalid profilePhoto").await?;
        let input = VerifyOtpInput {
            phone_number: form.text("phoneNumber"),
            otp: form.text("otp"),
            username: form.text("username"),
            email: form.text("email"),
        };
        let stored = form
            .store_files(&deps.uploads)
            .await
            .map_err(|e| ApiError::internal("Failed to verify OTP", format!("{:#}", e)))?;
        (input, stored.first("profilePhoto"))
    } else {
        let FormOrJson(input) = FormOrJson::<VerifyOtpInput>::from_request(request, &()).await?;
        (input, None)
    };

    match verify_otp(input, photo.clone(), deps).await {
        Ok(session) => Ok(Json(AuthResponse::new(
            "OTP verified and user registered successfully",
            session,
        ))),
        Err(e) => {
            if let Some(path) = photo {
                deps.uploads.remove(&path).await;
            }
            Err(e.into_api_error(AuthStage::VerifyOtp))
        }
    }
}

async fn login_send_otp_handler(
    Extension(state): Extension<AxumAppState>,
    FormOrJson(input): FormOrJson<SendOtpInput>,
) -> ApiResult<Json<SendOtpResponse>> {
    let user_id = send_login_otp(input, &state.server_deps)
        .await
        .map_err(|e| e.into_api_error(AuthStage::SendOtp))?;

    Ok(Json(SendOtpResponse {
        success: true,
        message: OTP_SENT.to_string(),
        user_id,
    }))
}

async fn login_verify_otp_handler(
    Extension(state): Extension<AxumAppState>,
    FormOrJson(input): FormOrJson<LoginVerifyInput>,
) -> ApiResult<Json<AuthResponse>> {
    let session = verify_login_otp(input, &state.server_deps)
        .await
        .map_err(|e| e.into_api_error(AuthStage::VerifyOtp))?;

    Ok(Json(AuthResponse::new("Login successful", session)))
}

async fn google_register_handler(
    Extension(state): Extension<AxumAppState>,
    FormOrJson(input): FormOrJson<GoogleRegisterInput>,
) -> ApiResult<Json<AuthResponse>> {
    let session = google_register(input, &state.server_deps)
        .await
        .map_err(|e| e.into_api_error(AuthStage::GoogleRegister))?;

    Ok(Json(AuthResponse::new(
        "Google login/register successful",
        session,
    )))
}

#[derive(Serialize)]
struct UsersResponse {
    success: bool,
    users: Vec<User>,
}

#[derive(Serialize)]
struct UserResponse {
    success: bool,
    user: User,
}

async fn list_users_handler(
    Extension(state): Extension<AxumAppState>,
) -> ApiResult<Json<UsersResponse>> {
    let users = User::find_all(&state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch users", format!("{:#}", e)))?;

    Ok(Json(UsersResponse {
        success: true,
        users,
    }))
}

async fn get_user_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let Ok(id) = id.parse::<i64>() else {
        return Err(ApiError::not_found("User not found"));
    };

    let user = User::find_by_id(id, &state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch user", format!("{:#}", e)))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(UserResponse {
        success: true,
        user,
    }))
}

#[derive(Serialize)]
struct MeResponse {
    success: bool,
    user: UserProfile,
}

async fn me_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
) -> ApiResult<Json<MeResponse>> {
    let user = User::find_by_id(auth.user_id, &state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch user", format!("{:#}", e)))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    debug!(user_id = user.id, "Resolved current user");
    Ok(Json(MeResponse {
        success: true,
        user: user.profile(),
    }))
}
