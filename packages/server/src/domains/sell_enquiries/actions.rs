//! Sell-enquiry actions
//!
//! Attachments are written to disk only after the form has parsed and
//! validated, and are removed again if the database write fails.

use thiserror::Error;
use tracing::{info, warn};

use super::input::{InputError, SellEnquiryInput, INVALID_JSON_MESSAGE};
use super::models::{SellEnquiry, SellEnquiryFields};
use super::validation::validate_enquiry;
use crate::common::{unique_violation, ApiError, FieldError};
use crate::domains::uploads::{MultipartForm, StoredFiles};
use crate::kernel::ServerDeps;

#[derive(Debug, Error)]
pub enum EnquiryError {
    #[error("Enquiry not found")]
    NotFound,

    #[error("{}", INVALID_JSON_MESSAGE)]
    InvalidJson,

    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<InputError> for EnquiryError {
    fn from(err: InputError) -> Self {
        match err {
            InputError::InvalidJson => EnquiryError::InvalidJson,
            InputError::Fields(errors) => EnquiryError::Validation(errors),
        }
    }
}

impl EnquiryError {
    pub fn into_api_error(self, failure_message: &str) -> ApiError {
        match self {
            EnquiryError::NotFound => ApiError::not_found("Enquiry not found"),
            EnquiryError::InvalidJson => ApiError::bad_request(INVALID_JSON_MESSAGE),
            EnquiryError::Validation(errors) => ApiError::validation(errors),
            EnquiryError::Internal(err) => {
                match err.downcast_ref::<sqlx::Error>().and_then(unique_violation) {
                    Some(field_error) => ApiError::validation(vec![field_error]),
                    None => ApiError::internal(failure_message, format!("{:#}", err)),
                }
            }
        }
    }
}

fn ensure_valid(fields: &SellEnquiryFields) -> Result<(), EnquiryError> {
    let errors = validate_enquiry(fields);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(EnquiryError::Validation(errors))
    }
}

/// Create an enquiry from a submitted form.
pub async fn create_enquiry(
    form: MultipartForm,
    user_id: Option<i64>,
    deps: &ServerDeps,
) -> Result<SellEnquiry, EnquiryError> {
    let mut fields = SellEnquiryInput::from_fields(&form.fields)?.into_new_fields();
    ensure_valid(&fields)?;

    let stored = form.store_files(&deps.uploads).await?;
    fields.property_images.0 = stored.get("images").to_vec();
    fields.document = stored.first("document");
    fields.verification_docs.0 = stored.get("verificationDocs").to_vec();

    match SellEnquiry::create(&fields, user_id, &deps.db_pool).await {
        Ok(enquiry) => {
            info!(enquiry_id = enquiry.id, user_id = ?user_id, "Sell enquiry created");
            Ok(enquiry)
        }
        Err(e) => {
            stored.discard(&deps.uploads).await;
            Err(e.into())
        }
    }
}

/// Apply a partial update.
///
/// New images and verification docs are appended; a new document replaces
/// the old one, whose file is then removed.
pub async fn update_enquiry(
    id: i64,
    form: MultipartForm,
    deps: &ServerDeps,
) -> Result<SellEnquiry, EnquiryError> {
    let existing = SellEnquiry::find_by_id(id, &deps.db_pool)
        .await?
        .ok_or(EnquiryError::NotFound)?;

    let mut fields = existing.fields.clone();
    SellEnquiryInput::from_fields(&form.fields)?.apply_to(&mut fields);
    ensure_valid(&fields)?;

    let stored = form.store_files(&deps.uploads).await?;
    let replaced_document = attach_files(&mut fields, &stored);

    match SellEnquiry::update(id, &fields, &deps.db_pool).await {
        Ok(Some(enquiry)) => {
            if let Some(old) = replaced_document {
                deps.uploads.remove(&old).await;
            }
            info!(enquiry_id = id, "Sell enquiry updated");
            Ok(enquiry)
        }
        Ok(None) => {
            stored.discard(&deps.uploads).await;
            Err(EnquiryError::NotFound)
        }
        Err(e) => {
            stored.discard(&deps.uploads).await;
            Err(e.into())
        }
    }
}

/// Merge newly stored files into `fields`. Returns the replaced document path.
fn attach_files(fields: &mut SellEnquiryFields, stored: &StoredFiles) -> Option<String> {
    fields
        .property_images
        .0
        .extend(stored.get("images").iter().cloned());
    fields
        .verification_docs
        .0
        .extend(stored.get("verificationDocs").iter().cloned());

    let new_document = stored.first("document")?;
    std::mem::replace(&mut fields.document, Some(new_document))
}

/// Delete an enquiry and its files.
pub async fn delete_enquiry(id: i64, deps: &ServerDeps) -> Result<(), EnquiryError> {
    let existing = SellEnquiry::find_by_id(id, &deps.db_pool)
        .await?
        .ok_or(EnquiryError::NotFound)?;

    deps.uploads
        .remove_all(&existing.fields.attachments())
        .await;

    if SellEnquiry::delete(id, &deps.db_pool).await? == 0 {
        warn!(enquiry_id = id, "Enquiry vanished before delete");
        return Err(EnquiryError::NotFound);
    }

    info!(enquiry_id = id, "Sell enquiry deleted");
    Ok(())
}
