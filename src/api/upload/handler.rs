// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload endpoint handler

use std::sync::Arc;

use anyhow::Context;
use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::{
    multipart::{MultipartError, MultipartRejection},
    Multipart,
};
use tracing::{debug, info, warn};

use super::response::UploadResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::query::unique_labels;
use crate::storage::{has_allowed_extension, StorageError};
use crate::vision::decode_image_bytes;

/// Multipart field carrying the image
pub const FILE_FIELD: &str = "file";

/// POST /upload - Store an image and detect the objects in it
///
/// # Request
/// Multipart form with the image in the `file` field. Accepted extensions
/// are png, jpg and jpeg (case-insensitive).
///
/// # Response
/// - `message`: "File uploaded successfully"
/// - `objects`: distinct detected class names
/// - `filename`: sanitized name the image was stored under
///
/// # Errors
/// - 400: no `file` part, empty filename, disallowed extension, or
///   content that is not an image
/// - 413: body larger than the configured upload limit
/// - 500: storage or detection failure
pub async fn upload_handler(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        warn!("Upload without multipart body: {}", e);
        ApiError::InvalidRequest("No file part".to_string())
    })?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Multipart error", e))?
    {
        if field.name() == Some(FILE_FIELD) {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| multipart_error("Failed to read file", e))?;
            upload = Some((filename, data));
            break;
        }
    }

    let (raw_filename, data) = upload.ok_or_else(|| {
        warn!("Upload without a '{}' field", FILE_FIELD);
        ApiError::InvalidRequest("No file part".to_string())
    })?;

    if raw_filename.is_empty() {
        warn!("Upload with empty filename");
        return Err(ApiError::InvalidRequest("No selected file".to_string()));
    }
    if !has_allowed_extension(&raw_filename) {
        warn!("Rejected upload '{}': disallowed extension", raw_filename);
        return Err(ApiError::InvalidRequest("Invalid file type".to_string()));
    }

    let (image, info) = decode_image_bytes(&data).map_err(|e| {
        warn!("Rejected upload '{}': {}", raw_filename, e);
        ApiError::InvalidRequest("Invalid image data".to_string())
    })?;
    debug!(
        "Upload '{}' decoded: {}x{} {:?}",
        raw_filename, info.width, info.height, info.format
    );

    let stored = state
        .store
        .save_upload(&raw_filename, &data)
        .await
        .map_err(|e| match e {
            StorageError::DisallowedExtension(_) | StorageError::InvalidFilename(_) => {
                warn!("Rejected upload '{}': {}", raw_filename, e);
                ApiError::InvalidRequest("Invalid file type".to_string())
            }
            other => ApiError::internal(&anyhow::Error::new(other).context("Failed to store upload")),
        })?;

    let detections = state
        .vision
        .detector()
        .detect(&image)
        .await
        .context("Object detection failed")
        .map_err(|e| ApiError::internal(&e))?;

    let objects = unique_labels(&detections);
    info!(
        "Uploaded {}: {} detections, objects {:?}",
        stored.filename,
        detections.len(),
        objects
    );

    Ok(Json(UploadResponse::new(stored.filename, objects)))
}

/// Map a multipart read failure, keeping the body-limit status
fn multipart_error(context: &str, e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("Upload exceeds body limit: {}", e);
        ApiError::file_too_large()
    } else {
        ApiError::InvalidRequest(format!("{}: {}", context, e))
    }
}
