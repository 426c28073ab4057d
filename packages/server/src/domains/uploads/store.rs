use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// URL prefix under which stored files are served.
pub const PUBLIC_PREFIX: &str = "/uploads/";

/// Disk-backed file sink for uploaded attachments.
///
/// Files are written flat into one directory and addressed by their public
/// path (`/uploads/<file>`).
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Create the store, making the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create upload dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` and return the public path.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        let file_name = stored_file_name(original_name);
        let path = self.dir.join(&file_name);
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        debug!(file = %file_name, size = bytes.len(), "Stored upload");
        Ok(format!("{}{}", PUBLIC_PREFIX, file_name))
    }

    /// Delete a previously stored file by its public path.
    ///
    /// Missing files and paths outside the upload directory are ignored.
    pub async fn remove(&self, public_path: &str) {
        let Some(path) = self.resolve(public_path) else {
            warn!(path = %public_path, "Refusing to remove path outside uploads");
            return;
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!(path = %path.display(), "Removed upload"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove upload"),
        }
    }

    pub async fn remove_all(&self, public_paths: &[String]) {
        for path in public_paths {
            self.remove(path).await;
        }
    }

    /// Map `/uploads/<file>` to its location on disk.
    pub fn resolve(&self, public_path: &str) -> Option<PathBuf> {
        let name = public_path
            .strip_prefix(PUBLIC_PREFIX)
            .or_else(|| public_path.strip_prefix("uploads/"))?;
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return None;
        }
        Some(self.dir.join(name))
    }
}

/// `<unix millis>_<short random>_<name with whitespace as _>`
fn stored_file_name(original_name: &str) -> String {
    let base = Path::new(original_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file");
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| *c != '/' && *c != '\\')
        .collect();
    let cleaned = if cleaned.is_empty() || cleaned == ".." {
        "file".to_string()
    } else {
        cleaned
    };

    let random = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}_{}",
        chrono::Utc::now().timestamp_millis(),
        &random[..8],
        cleaned
    )
}
