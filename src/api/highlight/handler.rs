// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Highlight endpoint handler

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{error, info, warn};

use super::request::HighlightRequest;
use super::response::HighlightResponse;
use crate::annotate::HighlightError;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::storage::StorageError;

/// POST /highlight - Draw every instance of one object class
///
/// Detection is re-run on the stored image; the result is written to
/// `results/highlighted_<stem>.jpg`, replacing any earlier result.
///
/// # Errors
/// - 400: missing fields, or an unknown label when strict labels are on
/// - 404: unknown file, object not detected, or the result could not be written
/// - 500: unreadable source or detector failure
pub async fn highlight_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<HighlightRequest>, JsonRejection>,
) -> Result<Json<HighlightResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        warn!("Highlight request rejected: {}", e);
        ApiError::missing_parameters()
    })?;
    let (filename, object_name) = request.validate().inspect_err(|e| {
        warn!("Highlight validation failed: {}", e);
    })?;

    let source = match state.store.upload_path(filename).await {
        Ok(path) => path,
        Err(StorageError::NotFound(_)) => {
            warn!("[highlight] File not found: {}", filename);
            return Err(ApiError::file_not_found());
        }
        Err(e) => return Err(ApiError::internal(&anyhow::Error::new(e))),
    };

    if state.strict_object_labels {
        let detector = state.vision.detector();
        if !detector.labels().iter().any(|label| label == object_name) {
            warn!("[highlight] '{}' is not a {} label", object_name, detector.model_name());
            return Err(ApiError::UnknownLabel(object_name.to_string()));
        }
    }

    let output = state.store.highlighted_path(filename);
    match state.highlighter.highlight(&source, &output, object_name).await {
        Ok(_) => {}
        Err(HighlightError::ObjectNotFound(_)) => {
            info!("[highlight] Object '{}' not found in {}", object_name, filename);
            return Err(ApiError::object_not_found(object_name));
        }
        Err(e) if e.is_not_produced() => {
            let e = anyhow::Error::new(e);
            error!("[highlight] Could not write {}: {:#}", output.display(), e);
            return Err(ApiError::object_not_found(object_name));
        }
        Err(e) => {
            let e = anyhow::Error::new(e);
            error!("[highlight] Internal error: {:#}", e);
            return Err(ApiError::internal(&e));
        }
    }

    let image_url = state.store.public_url(&output).ok_or_else(|| {
        ApiError::internal(&anyhow::anyhow!(
            "{} is outside the static directory",
            output.display()
        ))
    })?;

    Ok(Json(HighlightResponse { image_url }))
}
