//! Multipart receive step.
//!
//! Reads a whole `multipart/form-data` body into text fields and in-memory
//! files, enforcing per-field count, size and content-type rules. Nothing is
//! written to disk here; handlers call [`MultipartForm::store_files`] once the
//! form has been accepted.

use axum::extract::Multipart;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use super::store::UploadStore;

pub const MIB: usize = 1024 * 1024;

/// Which content types a file field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accept {
    Images,
    ImagesOrPdf,
}

impl Accept {
    fn allows(self, content_type: &str) -> bool {
        let is_image = content_type.starts_with("image/");
        match self {
            Accept::Images => is_image,
            Accept::ImagesOrPdf => is_image || content_type == "application/pdf",
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Accept::Images => "Only image files are allowed",
            Accept::ImagesOrPdf => "Only image or PDF files are allowed",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FileRule {
    pub field: &'static str,
    pub max_count: usize,
    pub max_bytes: usize,
    pub accept: Accept,
}

impl FileRule {
    pub const fn new(field: &'static str, max_count: usize, max_bytes: usize, accept: Accept) -> Self {
        Self {
            field,
            max_count,
            max_bytes,
            accept,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Unexpected file field: {0}")]
    UnexpectedField(String),

    #[error("Too many files for {field} (max {max})")]
    TooManyFiles { field: String, max: usize },

    #[error("File too large for {field} (max {max_bytes} bytes)")]
    TooLarge { field: String, max_bytes: usize },

    #[error("{reason}: {field} was {content_type}")]
    UnsupportedType {
        field: String,
        content_type: String,
        reason: &'static str,
    },

    #[error("Malformed multipart body: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct MultipartForm {
    /// Text fields; a repeated name keeps the last value.
    pub fields: HashMap<String, String>,
    pub files: Vec<UploadedFile>,
}

/// Public paths of stored files, grouped by form field.
#[derive(Debug, Default, Clone)]
pub struct StoredFiles {
    by_field: HashMap<String, Vec<String>>,
}

impl StoredFiles {
    pub(crate) fn push(&mut self, field: &str, public_path: String) {
        self.by_field
            .entry(field.to_string())
            .or_default()
            .push(public_path);
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.by_field.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first(&self, field: &str) -> Option<String> {
        self.get(field).first().cloned()
    }

    pub fn all(&self) -> Vec<String> {
        self.by_field.values().flatten().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.by_field.values().all(Vec::is_empty)
    }

    /// Delete every stored file.
    pub async fn discard(&self, store: &UploadStore) {
        store.remove_all(&self.all()).await;
    }
}

impl MultipartForm {
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    /// Write every file to `store`. On failure, files written so far are removed.
    pub async fn store_files(&self, store: &UploadStore) -> anyhow::Result<StoredFiles> {
        let mut stored = StoredFiles::default();
        for file in &self.files {
            match store.save(&file.file_name, &file.bytes).await {
                Ok(path) => stored.push(&file.field, path),
                Err(e) => {
                    stored.discard(store).await;
                    return Err(e);
                }
            }
        }
        Ok(stored)
    }
}

/// Read a multipart body, applying `rules` to its file parts.
pub async fn receive_multipart(
    mut multipart: Multipart,
    rules: &[FileRule],
) -> Result<MultipartForm, UploadError> {
    let mut form = MultipartForm::default();
    let mut counts: HashMap<&'static str, usize> = HashMap::new();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Malformed(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        let Some(file_name) = field.file_name().map(str::to_string) else {
            let value = field
                .text()
                .await
                .map_err(|e| UploadError::Malformed(e.body_text()))?;
            form.fields.insert(name, value);
            continue;
        };

        let rule = rules
            .iter()
            .find(|r| r.field == name)
            .ok_or_else(|| UploadError::UnexpectedField(name.clone()))?;

        let count = counts.entry(rule.field).or_insert(0);
        *count += 1;
        if *count > rule.max_count {
            return Err(UploadError::TooManyFiles {
                field: name,
                max: rule.max_count,
            });
        }

        let content_type = field
            .content_type()
            .map(str::to_string)
            .filter(|ct| ct != "application/octet-stream")
            .unwrap_or_else(|| guess_content_type(&file_name));
        if !rule.accept.allows(&content_type) {
            return Err(UploadError::UnsupportedType {
                field: name,
                content_type,
                reason: rule.accept.describe(),
            });
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| UploadError::Malformed(e.body_text()))?
        {
            if bytes.len() + chunk.len() > rule.max_bytes {
                return Err(UploadError::TooLarge {
                    field: name,
                    max_bytes: rule.max_bytes,
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        debug!(field = %name, file = %file_name, size = bytes.len(), "Received file part");
        form.files.push(UploadedFile {
            field: name,
            file_name,
            content_type,
            bytes,
        });
    }

    Ok(form)
}

fn guess_content_type(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_rules() {
        assert!(Accept::Images.allows("image/png"));
        assert!(!Accept::Images.allows("application/pdf"));
        assert!(Accept::ImagesOrPdf.allows("application/pdf"));
        assert!(Accept::ImagesOrPdf.allows("image/jpeg"));
        assert!(!Accept::ImagesOrPdf.allows("text/plain"));
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type("a.PNG"), "image/png");
        assert_eq!(guess_content_type("deed.pdf"), "application/pdf");
        assert_eq!(guess_content_type("noext"), "application/octet-stream");
    }

    #[test]
    fn test_stored_files_lookup() {
        let mut stored = StoredFiles::default();
        stored.push("images", "/uploads/a".to_string());
        assert_eq!(stored.get("images"), ["/uploads/a".to_string()]);
        assert!(stored.get("document").is_empty());
        assert_eq!(stored.first("images").as_deref(), Some("/uploads/a"));
        assert!(!stored.is_empty());
    }
}
