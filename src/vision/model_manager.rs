// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision model manager holding the detector and question answerer

use anyhow::Context;
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::vision::detection::ObjectDetector;
use crate::vision::question_answering::VisualQuestionAnswerer;
use crate::vision::vlm_client::VlmClient;
use crate::vision::yolo::YoloDetector;

/// Information about a loaded vision model
#[derive(Debug, Clone, serde::Serialize)]
pub struct VisionModelInfo {
    /// Model name
    pub name: String,
    /// Model type (detection, vqa)
    pub model_type: String,
    /// Whether the model is available
    pub available: bool,
}

/// Manager for the vision models
///
/// Built once at startup and shared by every request. Both services are
/// trait objects so tests can substitute fakes.
#[derive(Clone)]
pub struct VisionModelManager {
    detector: Arc<dyn ObjectDetector>,
    answerer: Arc<dyn VisualQuestionAnswerer>,
}

impl VisionModelManager {
    /// Assemble a manager from already constructed services
    pub fn new(
        detector: Arc<dyn ObjectDetector>,
        answerer: Arc<dyn VisualQuestionAnswerer>,
    ) -> Self {
        Self { detector, answerer }
    }

    /// Load the YOLO detector and configure the VLM client
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let detector = YoloDetector::new(&config.detector).context("Failed to load detector")?;
        tracing::info!("✅ Object detector ready: {:?}", detector);

        let answerer = VlmClient::new(&config.vlm).context("Failed to create VLM client")?;

        Ok(Self::new(Arc::new(detector), Arc::new(answerer)))
    }

    pub fn detector(&self) -> Arc<dyn ObjectDetector> {
        self.detector.clone()
    }

    pub fn answerer(&self) -> Arc<dyn VisualQuestionAnswerer> {
        self.answerer.clone()
    }

    /// List all vision models and whether they are reachable
    pub async fn list_models(&self) -> Vec<VisionModelInfo> {
        vec![
            VisionModelInfo {
                name: self.detector.model_name(),
                model_type: "detection".to_string(),
                available: true,
            },
            VisionModelInfo {
                name: self.answerer.model_name(),
                model_type: "vqa".to_string(),
                available: self.answerer.health_check().await,
            },
        ]
    }
}
