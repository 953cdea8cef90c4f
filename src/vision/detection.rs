// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection types and the object detector capability

use async_trait::async_trait;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in source-image pixel coordinates
///
/// Produced boxes always satisfy `x1 < x2` and `y1 < y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> u32 {
        (self.x2 - self.x1).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.y2 - self.y1).max(0) as u32
    }

    /// Check the box has positive area
    pub fn is_valid(&self) -> bool {
        self.x1 < self.x2 && self.y1 < self.y2
    }
}

/// One object instance found by the detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Class label as reported by the model
    pub class_name: String,
    /// Confidence score (0.0-1.0)
    pub confidence: f32,
    /// Box in source-image pixels
    pub bbox: BoundingBox,
}

impl Detection {
    pub fn new(class_name: impl Into<String>, confidence: f32, bbox: BoundingBox) -> Self {
        Self {
            class_name: class_name.into(),
            confidence,
            bbox,
        }
    }

    /// Label drawn next to the box, e.g. `car 0.87`
    pub fn label(&self) -> String {
        format!("{} {:.2}", self.class_name, self.confidence)
    }
}

/// Object detection capability
///
/// Implementations are constructed once at startup and shared across
/// requests, so `detect` must be safe to call concurrently.
#[async_trait]
pub trait ObjectDetector: Send + Sync {
    /// Run detection on a decoded image
    async fn detect(&self, image: &DynamicImage) -> anyhow::Result<Vec<Detection>>;

    /// Closed label vocabulary of the model
    fn labels(&self) -> Vec<String>;

    /// Human-readable model name for logs and health output
    fn model_name(&self) -> String;
}
