//! HTTP-facing error type.
//!
//! Every route handler returns `ApiResult<T>`. Domain errors convert into
//! `ApiError` with `From`, and `ApiError` renders the single JSON error body
//! used across the API:
//!
//! ```json
//! { "success": false, "error": "...", "details": "...", "errors": [{ "field": "...", "message": "..." }] }
//! ```
//!
//! `details` and `errors` are omitted when empty.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use super::validation::{unique_violation, FieldError};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request input.
    #[error("{message}")]
    BadRequest {
        message: String,
        details: Option<String>,
    },

    /// Field-keyed validation failures.
    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    /// Server-side failure. `message` is generic; `details` carries the cause.
    #[error("{message}: {details}")]
    Internal { message: String, details: String },
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldError]>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request_with(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            details: Some(details.into()),
        }
    }

    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::Validation {
            message: "Please fix the following errors:".to_string(),
            errors,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn internal(message: impl Into<String>, details: impl std::fmt::Display) -> Self {
        Self::Internal {
            message: message.into(),
            details: details.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } | Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(field_error) = err.downcast_ref::<sqlx::Error>().and_then(unique_violation) {
            return Self::validation(vec![field_error]);
        }
        Self::internal("Internal server error", format!("{:#}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let (error, details, errors) = match &self {
            Self::BadRequest { message, details } => (message.as_str(), details.as_deref(), None),
            Self::Validation { message, errors } => {
                (message.as_str(), None, Some(errors.as_slice()))
            }
            Self::Unauthorized(message) | Self::NotFound(message) => (message.as_str(), None, None),
            Self::Internal { message, details } => {
                (message.as_str(), Some(details.as_str()), None)
            }
        };

        let body = ErrorBody {
            success: false,
            error,
            details,
            errors,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_bad_request_body() {
        let (status, json) = body_json(ApiError::bad_request("Phone number is required")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Phone number is required");
        assert!(json.get("details").is_none());
        assert!(json.get("errors").is_none());
    }

    #[tokio::test]
    async fn test_validation_body_lists_fields() {
        let err = ApiError::validation(vec![FieldError::new("price", "Price must be positive")]);
        let (status, json) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["errors"][0]["field"], "price");
    }

    #[tokio::test]
    async fn test_internal_keeps_details() {
        let (status, json) = body_json(ApiError::internal("Failed to send OTP", "boom")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Failed to send OTP");
        assert_eq!(json["details"], "boom");
    }

    #[test]
    fn test_plain_anyhow_is_internal() {
        let err: ApiError = anyhow::anyhow!("connection reset").into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
