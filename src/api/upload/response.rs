// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload response types

use serde::{Deserialize, Serialize};

pub const UPLOAD_SUCCESS_MESSAGE: &str = "File uploaded successfully";

/// Response for a stored upload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadResponse {
    pub message: String,
    /// Distinct class names detected in the image
    pub objects: Vec<String>,
    /// Sanitized name to use in later requests
    pub filename: String,
}

impl UploadResponse {
    pub fn new(filename: String, objects: Vec<String>) -> Self {
        Self {
            message: UPLOAD_SUCCESS_MESSAGE.to_string(),
            objects,
            filename,
        }
    }
}
