use thiserror::Error;

use crate::common::{unique_violation, ApiError, FieldError};

/// Failures of the auth flows.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid or expired OTP")]
    InvalidOrExpiredOtp,

    #[error("Invalid Google token")]
    InvalidToken,

    #[error("{0}")]
    UserNotFound(String),

    #[error("SMS delivery failed: {0}")]
    DeliveryFailure(String),

    #[error("identity verification failed: {0}")]
    UpstreamVerification(String),

    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<sqlx::Error>().and_then(unique_violation) {
            Some(field_error) => AuthError::Validation(vec![field_error]),
            None => AuthError::Internal(err),
        }
    }
}

/// The flow an error came from, used to pick the generic 500 message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStage {
    SendOtp,
    VerifyOtp,
    GoogleRegister,
}

impl AuthStage {
    fn failure_message(self) -> &'static str {
        match self {
            AuthStage::SendOtp => "Failed to send OTP",
            AuthStage::VerifyOtp => "Failed to verify OTP",
            AuthStage::GoogleRegister => "Google register failed",
        }
    }
}

impl AuthError {
    pub fn into_api_error(self, stage: AuthStage) -> ApiError {
        match self {
            AuthError::InvalidInput(message) => ApiError::bad_request(message),
            AuthError::InvalidOrExpiredOtp => ApiError::unauthorized("Invalid or expired OTP"),
            AuthError::InvalidToken => ApiError::unauthorized("Invalid Google token"),
            AuthError::UserNotFound(message) => ApiError::not_found(message),
            AuthError::Validation(errors) => ApiError::validation(errors),
            AuthError::DeliveryFailure(details) | AuthError::UpstreamVerification(details) => {
                ApiError::internal(stage.failure_message(), details)
            }
            AuthError::Internal(err) => {
                ApiError::internal(stage.failure_message(), format!("{:#}", err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AuthError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (AuthError::InvalidOrExpiredOtp, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidToken, StatusCode::UNAUTHORIZED),
            (AuthError::UserNotFound("x".into()), StatusCode::NOT_FOUND),
            (
                AuthError::DeliveryFailure("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AuthError::UpstreamVerification("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (AuthError::Validation(vec![]), StatusCode::BAD_REQUEST),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_api_error(AuthStage::SendOtp).status(), status);
        }
    }

    #[test]
    fn test_delivery_failure_uses_generic_message() {
        let api = AuthError::DeliveryFailure("21211 invalid To".into())
            .into_api_error(AuthStage::SendOtp);
        match api {
            ApiError::Internal { message, details } => {
                assert_eq!(message, "Failed to send OTP");
                assert_eq!(details, "21211 invalid To");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_plain_anyhow_is_internal() {
        let err: AuthError = anyhow::anyhow!("pool timed out").into();
        assert!(matches!(err, AuthError::Internal(_)));
    }
}
