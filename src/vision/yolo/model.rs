// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLOv8 ONNX object detector
//!
//! Runs the Ultralytics YOLOv8 ONNX export through ONNX Runtime on CPU.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use image::DynamicImage;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::labels::load_labels;
use super::postprocess::decode_output;
use super::preprocessing::{preprocess_for_yolo, YOLO_INPUT_SIZE};
use crate::config::DetectorConfig;
use crate::vision::detection::{Detection, ObjectDetector};

/// YOLOv8 detector backed by an ONNX Runtime session
#[derive(Clone)]
pub struct YoloDetector {
    /// ONNX Runtime session (inference needs exclusive access)
    session: Arc<Mutex<Session>>,
    /// Model input name
    input_name: String,
    /// Class names indexed by class id
    labels: Arc<Vec<String>>,
    confidence_threshold: f32,
    iou_threshold: f32,
    /// Model name derived from the file stem, e.g. `yolov8n`
    model_name: String,
}

impl std::fmt::Debug for YoloDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoloDetector")
            .field("model_name", &self.model_name)
            .field("input_name", &self.input_name)
            .field("labels", &self.labels.len())
            .field("confidence_threshold", &self.confidence_threshold)
            .field("iou_threshold", &self.iou_threshold)
            .finish_non_exhaustive()
    }
}

impl YoloDetector {
    /// Load the detector described by `config`
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found
    /// - Label file cannot be read
    /// - ONNX Runtime initialization fails
    pub fn new(config: &DetectorConfig) -> Result<Self> {
        let model_path = &config.model_path;
        if !model_path.exists() {
            anyhow::bail!("Detector model not found: {}", model_path.display());
        }

        let labels = load_labels(config.labels_path.as_deref())?;

        info!("Loading detector model from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(config.intra_threads)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .with_context(|| {
                format!("Failed to load detector model from {}", model_path.display())
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "images".to_string());

        let model_name = model_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "yolo".to_string());

        info!(
            "✅ Detector {} loaded ({} labels, input: {})",
            model_name,
            labels.len(),
            input_name
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            labels: Arc::new(labels),
            confidence_threshold: config.confidence_threshold,
            iou_threshold: config.iou_threshold,
            model_name,
        })
    }

    /// Run detection synchronously
    pub fn detect_blocking(&self, image: &DynamicImage) -> Result<Vec<Detection>> {
        let (tensor, letterbox) = preprocess_for_yolo(image, YOLO_INPUT_SIZE);

        let input_value = Value::from_array(tensor).context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("Detector session lock poisoned"))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .context("Detection inference failed")?;

        let output_tensor = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        debug!("Detector output shape: {:?}", output_tensor.shape());

        let detections = decode_output(
            output_tensor.view(),
            &self.labels,
            &letterbox,
            self.confidence_threshold,
            self.iou_threshold,
        )?;

        debug!(
            "Detected {} objects in {}x{} image",
            detections.len(),
            letterbox.src_width,
            letterbox.src_height
        );

        Ok(detections)
    }
}

#[async_trait]
impl ObjectDetector for YoloDetector {
    async fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>> {
        let detector = self.clone();
        let image = image.clone();
        tokio::task::spawn_blocking(move || detector.detect_blocking(&image))
            .await
            .context("Detection task failed")?
    }

    fn labels(&self) -> Vec<String> {
        self.labels.as_ref().clone()
    }

    fn model_name(&self) -> String {
        self.model_name.clone()
    }
}
