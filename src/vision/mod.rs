// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing module
//!
//! This module provides:
//! - Object detection via a YOLOv8 ONNX model
//! - Visual question answering via an OpenAI-compatible VLM sidecar
//!
//! Both sit behind traits so the HTTP layer never depends on a concrete model.

pub mod detection;
pub mod image_utils;
pub mod model_manager;
pub mod question_answering;
pub mod vlm_client;
pub mod yolo;

pub use detection::{BoundingBox, Detection, ObjectDetector};
pub use image_utils::{
    decode_image_bytes, detect_format, encode_jpeg, load_image_file, ImageError, ImageInfo,
    LoadedImage,
};
pub use model_manager::{VisionModelInfo, VisionModelManager};
pub use question_answering::VisualQuestionAnswerer;
pub use vlm_client::VlmClient;
pub use yolo::YoloDetector;
