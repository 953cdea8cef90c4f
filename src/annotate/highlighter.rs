// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Highlighting one named object in a stored image

use std::path::Path;
use std::sync::Arc;

use ab_glyph::FontArc;
use thiserror::Error;
use tracing::{debug, info};

use super::draw::draw_detections;
use crate::query::resolve;
use crate::vision::{encode_jpeg, load_image_file, ImageError, ObjectDetector};

#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("Object '{0}' not found")]
    ObjectNotFound(String),

    #[error("Failed to read source image")]
    ImageUnreadable(#[source] ImageError),

    #[error("Detection failed: {0:#}")]
    Detection(anyhow::Error),

    #[error("Failed to encode highlighted image")]
    EncodeFailed(#[source] ImageError),

    #[error("Failed to write highlighted image")]
    WriteFailed(#[from] std::io::Error),
}

impl HighlightError {
    /// Whether no highlighted image could be produced for the object.
    /// Unreadable sources and detector failures are not in this class.
    pub fn is_not_produced(&self) -> bool {
        matches!(
            self,
            Self::ObjectNotFound(_) | Self::EncodeFailed(_) | Self::WriteFailed(_)
        )
    }
}

/// Re-runs detection on a stored image and draws the matches for one object
#[derive(Clone)]
pub struct Highlighter {
    detector: Arc<dyn ObjectDetector>,
    font: Option<FontArc>,
}

impl Highlighter {
    pub fn new(detector: Arc<dyn ObjectDetector>, font: Option<FontArc>) -> Self {
        Self { detector, font }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Draw every `object_name` detection in `source` and write the result
    /// to `output` as JPEG
    ///
    /// Returns the number of boxes drawn. When nothing matches the output
    /// path is left untouched.
    pub async fn highlight(
        &self,
        source: &Path,
        output: &Path,
        object_name: &str,
    ) -> Result<usize, HighlightError> {
        let loaded = load_image_file(source)
            .await
            .map_err(HighlightError::ImageUnreadable)?;

        let detections = self
            .detector
            .detect(&loaded.image)
            .await
            .map_err(HighlightError::Detection)?;
        debug!(
            "{} detections in {}, resolving '{}'",
            detections.len(),
            source.display(),
            object_name
        );

        let matched = resolve(&detections, object_name);
        if matched.is_empty() {
            return Err(HighlightError::ObjectNotFound(object_name.to_string()));
        }

        let mut canvas = loaded.image.to_rgb8();
        draw_detections(&mut canvas, &matched, self.font.as_ref());
        let jpeg = encode_jpeg(&canvas).map_err(HighlightError::EncodeFailed)?;

        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(output, jpeg).await?;

        info!(
            "Highlighted {} '{}' box(es) into {}",
            matched.len(),
            object_name,
            output.display()
        );
        Ok(matched.len())
    }
}
