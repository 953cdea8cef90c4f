// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Ask endpoint handler

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{debug, error, info, warn};

use super::request::AskRequest;
use super::response::AskResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::query::{classify, count, count_message, Query};
use crate::storage::StorageError;
use crate::vision::load_image_file;

const ASK_ERROR: &str = "Error processing question";

/// POST /ask - Answer a question about an uploaded image
///
/// "How many X are there" questions count detections of the single token
/// following "many". Other questions go to the visual question answerer
/// under the configured error policy.
///
/// # Errors
/// - 400: missing fields
/// - 404: unknown file
/// - 500: counting failed, or answering failed under the propagate policy
pub async fn ask_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        warn!("Ask request rejected: {}", e);
        ApiError::missing_parameters()
    })?;
    let (filename, question) = request.validate().inspect_err(|e| {
        warn!("Ask validation failed: {}", e);
    })?;

    let source = match state.store.upload_path(filename).await {
        Ok(path) => path,
        Err(StorageError::NotFound(_)) => {
            warn!("[ask] File not found: {}", filename);
            return Err(ApiError::file_not_found());
        }
        Err(e) => return Err(ApiError::internal(&anyhow::Error::new(e))),
    };

    let answer = match classify(question) {
        Query::Counting { object_name } => {
            debug!("[ask] Counting '{}' in {}", object_name, filename);
            let n = count_objects(&state, &source, &object_name)
                .await
                .map_err(|e| {
                    error!("[ask] {}: {:#}", ASK_ERROR, e);
                    ApiError::internal_with(ASK_ERROR, &e)
                })?;
            count_message(n, &object_name)
        }
        Query::General { text } => {
            debug!("[ask] General question about {}", filename);
            state.answers.answer(&source, &text).await.map_err(|e| {
                error!("[ask] {}: {:#}", ASK_ERROR, e);
                ApiError::internal_with(ASK_ERROR, &e)
            })?
        }
    };

    info!("[ask] {} -> {:?}", filename, answer);
    Ok(Json(AskResponse { answer }))
}

async fn count_objects(state: &AppState, source: &Path, object_name: &str) -> anyhow::Result<usize> {
    let image = load_image_file(source)
        .await
        .with_context(|| format!("Failed to load {}", source.display()))?;
    let detections = state.vision.detector().detect(&image.image).await?;
    Ok(count(&detections, object_name))
}
