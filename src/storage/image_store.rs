// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Filesystem storage for uploaded and highlighted images

use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use super::filename::{file_stem, has_allowed_extension, sanitize_filename};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid file type")]
    DisallowedExtension(String),

    #[error("Invalid filename")]
    InvalidFilename(String),

    #[error("File not found")]
    NotFound(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An upload persisted to disk
#[derive(Debug, Clone, PartialEq)]
pub struct StoredUpload {
    /// Sanitized name the client uses to refer to the upload
    pub filename: String,
    pub path: PathBuf,
}

/// Uploads live in `<static>/uploads`, highlighted results in
/// `<static>/results`. Both are flat directories keyed by filename.
#[derive(Debug, Clone)]
pub struct ImageStore {
    static_dir: PathBuf,
    uploads_dir: PathBuf,
    results_dir: PathBuf,
}

impl ImageStore {
    pub fn new(static_dir: impl Into<PathBuf>) -> Self {
        let static_dir = static_dir.into();
        Self {
            uploads_dir: static_dir.join("uploads"),
            results_dir: static_dir.join("results"),
            static_dir,
        }
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Create the upload and result directories if missing
    pub async fn ensure_dirs(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.uploads_dir).await?;
        tokio::fs::create_dir_all(&self.results_dir).await?;
        Ok(())
    }

    /// Validate and sanitize a client filename for upload
    pub fn upload_name(&self, raw_filename: &str) -> Result<String, StorageError> {
        if !has_allowed_extension(raw_filename) {
            return Err(StorageError::DisallowedExtension(raw_filename.to_string()));
        }

        let filename = sanitize_filename(raw_filename);
        if filename.is_empty() {
            return Err(StorageError::InvalidFilename(raw_filename.to_string()));
        }
        if !has_allowed_extension(&filename) {
            return Err(StorageError::DisallowedExtension(raw_filename.to_string()));
        }

        Ok(filename)
    }

    /// Persist an upload, overwriting any earlier upload with the same name
    pub async fn save_upload(
        &self,
        raw_filename: &str,
        bytes: &[u8],
    ) -> Result<StoredUpload, StorageError> {
        let filename = self.upload_name(raw_filename)?;
        let path = self.uploads_dir.join(&filename);

        tokio::fs::create_dir_all(&self.uploads_dir).await?;
        tokio::fs::write(&path, bytes).await?;
        info!("Stored upload {} ({} bytes)", path.display(), bytes.len());

        Ok(StoredUpload { filename, path })
    }

    /// Path of a previously uploaded file
    ///
    /// Names that would change under sanitization never refer to a stored
    /// upload and are reported as missing.
    pub async fn upload_path(&self, filename: &str) -> Result<PathBuf, StorageError> {
        if filename.is_empty() || sanitize_filename(filename) != filename {
            debug!("Rejecting unsanitized filename {:?}", filename);
            return Err(StorageError::NotFound(filename.to_string()));
        }

        let path = self.uploads_dir.join(filename);
        if tokio::fs::try_exists(&path).await? {
            Ok(path)
        } else {
            Err(StorageError::NotFound(filename.to_string()))
        }
    }

    /// Deterministic result path for a source image:
    /// `<results>/highlighted_<stem>.jpg`
    pub fn highlighted_path(&self, source_filename: &str) -> PathBuf {
        self.results_dir
            .join(format!("highlighted_{}.jpg", file_stem(source_filename)))
    }

    /// URL under `/static` for a file inside the static directory
    pub fn public_url(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.static_dir).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Option<_>>()?;
        Some(format!("/static/{}", parts.join("/")))
    }
}
