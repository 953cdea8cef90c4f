// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Highlight request types and validation

use serde::{Deserialize, Serialize};

use crate::api::errors::{ApiError, MISSING_PARAMETERS};

/// Request to highlight one object class in an uploaded image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightRequest {
    /// Name returned by /upload
    #[serde(default)]
    pub filename: Option<String>,

    /// Class name to highlight, matched exactly
    #[serde(default)]
    pub object_name: Option<String>,
}

impl HighlightRequest {
    /// Check both fields are present and non-empty, returning them
    pub fn validate(&self) -> Result<(&str, &str), ApiError> {
        let filename = required("filename", self.filename.as_deref())?;
        let object_name = required("object_name", self.object_name.as_deref())?;
        Ok((filename, object_name))
    }
}

/// Empty strings count as missing, for every field including `question`,
/// so the models never see a blank request.
pub(crate) fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, ApiError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::ValidationError {
            field: field.to_string(),
            message: MISSING_PARAMETERS.to_string(),
        }),
    }
}
