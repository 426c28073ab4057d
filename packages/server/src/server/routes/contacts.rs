//! `/api/contact` routes for the public contact form.

use axum::{
    extract::{Extension, Path},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::info;

use crate::common::{ApiError, ApiResult};
use crate::domains::contacts::{ContactInput, ContactMessage};
use crate::server::app::AxumAppState;
use crate::server::extract::FormOrJson;

pub fn routes() -> Router {
    Router::new()
        .route("/", get(list_contacts_handler).post(submit_contact_handler))
        .route(
            "/:id",
            get(get_contact_handler)
                .put(update_contact_handler)
                .delete(delete_contact_handler),
        )
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

#[derive(Serialize)]
struct ContactUpdated {
    message: &'static str,
    contact: ContactMessage,
}

/// Path ids that are not integers can never match a row.
fn contact_id(raw: &str, not_found: &str) -> ApiResult<i64> {
    raw.parse().map_err(|_| ApiError::not_found(not_found))
}

async fn submit_contact_handler(
    Extension(state): Extension<AxumAppState>,
    FormOrJson(input): FormOrJson<ContactInput>,
) -> ApiResult<Json<MessageResponse>> {
    if !input.has_required() {
        return Err(ApiError::bad_request("Name, Email, and Comments are required."));
    }

    let contact = ContactMessage::create(&input, &state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Server error", format!("{:#}", e)))?;
    info!(contact_id = contact.id, "Contact form submitted");

    Ok(MessageResponse::new("Contact form submitted successfully."))
}

async fn list_contacts_handler(
    Extension(state): Extension<AxumAppState>,
) -> ApiResult<Json<Vec<ContactMessage>>> {
    let contacts = ContactMessage::find_all(&state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Error fetching contacts", format!("{:#}", e)))?;
    Ok(Json(contacts))
}

async fn get_contact_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ContactMessage>> {
    let id = contact_id(&id, "Contact not found")?;
    ContactMessage::find_by_id(id, &state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Error fetching contact", format!("{:#}", e)))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Contact not found"))
}

async fn update_contact_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
    FormOrJson(input): FormOrJson<ContactInput>,
) -> ApiResult<Json<ContactUpdated>> {
    let id = contact_id(&id, "Contact not found")?;
    let contact = ContactMessage::update(id, &input, &state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Error updating contact", format!("{:#}", e)))?
        .ok_or_else(|| ApiError::not_found("Contact not found"))?;

    Ok(Json(ContactUpdated {
        message: "Contact updated successfully",
        contact,
    }))
}

async fn delete_contact_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    const GONE: &str = "Contact not found or already deleted";

    let id = contact_id(&id, GONE)?;
    let deleted = ContactMessage::delete(id, &state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Error deleting contact", format!("{:#}", e)))?;

    if deleted == 0 {
        return Err(ApiError::not_found(GONE));
    }
    Ok(MessageResponse::new("Contact deleted successfully"))
}
