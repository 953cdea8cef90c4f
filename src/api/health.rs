// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Health endpoint

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::http_server::AppState;
use crate::version;
use crate::vision::VisionModelInfo;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy", or "degraded" when a model is unavailable
    pub status: String,
    pub version: String,
    pub build_date: String,
    /// Full build info including enabled features
    pub build: serde_json::Value,
    pub timestamp: String,
    pub detector_labels: usize,
    pub models: Vec<VisionModelInfo>,
}

/// GET /health - Report version and model availability
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let models = state.vision.list_models().await;
    let status = if models.iter().all(|m| m.available) {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: version::VERSION_NUMBER.to_string(),
        build_date: version::BUILD_DATE.to_string(),
        build: version::get_version_info(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        detector_labels: state.vision.detector().labels().len(),
        models,
    })
}
