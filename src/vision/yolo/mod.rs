// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLOv8 object detection via ONNX Runtime

pub mod labels;
pub mod model;
pub mod postprocess;
pub mod preprocessing;

pub use labels::{load_labels, COCO_CLASSES};
pub use model::YoloDetector;
pub use postprocess::decode_output;
pub use preprocessing::{preprocess_for_yolo, Letterbox, YOLO_INPUT_SIZE};
