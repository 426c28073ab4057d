//! Request body extractors shared by the route handlers.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
    Form, Json,
};
use serde::de::DeserializeOwned;

use crate::common::ApiError;
use crate::domains::uploads::{receive_multipart, FileRule, MultipartForm};

const INVALID_BODY: &str = "Invalid request body";

/// Accepts either `application/x-www-form-urlencoded` or JSON.
///
/// Rejections become a 400 in the API error shape instead of axum's plain-text body.
#[derive(Debug, Clone)]
pub struct FormOrJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for FormOrJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if content_type_is(req.headers(), "application/x-www-form-urlencoded") {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request_with(INVALID_BODY, e.body_text()))?;
            return Ok(Self(value));
        }

        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request_with(INVALID_BODY, e.body_text()))?;
        Ok(Self(value))
    }
}

pub fn is_multipart(headers: &HeaderMap) -> bool {
    content_type_is(headers, "multipart/form-data")
}

fn content_type_is(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim_start().to_ascii_lowercase().starts_with(expected))
        .unwrap_or(false)
}

/// Read a multipart request under `rules`. Any rejection is a 400 with `error`
/// as the message and the cause as `details`.
pub async fn multipart_form(
    req: Request,
    rules: &[FileRule],
    error: &str,
) -> Result<MultipartForm, ApiError> {
    let multipart = Multipart::from_request(req, &())
        .await
        .map_err(|e| ApiError::bad_request_with(error, e.body_text()))?;

    receive_multipart(multipart, rules)
        .await
        .map_err(|e| ApiError::bad_request_with(error, e.to_string()))
}
