// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod filename;
pub mod image_store;

// Re-export main types for convenience
pub use filename::{has_allowed_extension, sanitize_filename, ALLOWED_EXTENSIONS};
pub use image_store::{ImageStore, StorageError, StoredUpload};
