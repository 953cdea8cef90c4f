// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLOv8 output decoding and non-maximum suppression

use anyhow::Result;
use ndarray::{ArrayViewD, Axis, Ix2};

use super::preprocessing::Letterbox;
use crate::vision::detection::{BoundingBox, Detection};

/// A decoded box before NMS, in source-image pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Candidate {
    pub class_id: usize,
    pub score: f32,
    /// [x1, y1, x2, y2]
    pub bbox: [f32; 4],
}

/// Decode a YOLOv8 output tensor into detections
///
/// Accepts `[1, 4 + C, N]` (the default Ultralytics export) and the
/// transposed `[1, N, 4 + C]` layout. Each anchor contributes at most one
/// candidate: its best-scoring class, if that score reaches
/// `confidence_threshold`. Candidates go through per-class NMS, then are
/// rounded to integer pixels and clamped to the source image. Boxes that
/// collapse to zero area are dropped.
pub fn decode_output(
    output: ArrayViewD<f32>,
    labels: &[String],
    letterbox: &Letterbox,
    confidence_threshold: f32,
    iou_threshold: f32,
) -> Result<Vec<Detection>> {
    let shape = output.shape().to_vec();
    if shape.len() != 3 || shape[0] != 1 {
        anyhow::bail!("Unexpected detector output shape: {:?}", shape);
    }

    let channels = 4 + labels.len();
    let view = output
        .index_axis(Axis(0), 0)
        .into_dimensionality::<Ix2>()?;

    // Normalise to [anchors, channels]
    let rows = if shape[1] == channels {
        view.reversed_axes()
    } else if shape[2] == channels {
        view
    } else {
        anyhow::bail!(
            "Detector output {:?} does not match {} labels (expected {} channels)",
            shape,
            labels.len(),
            channels
        );
    };

    let mut candidates = Vec::new();
    for row in rows.outer_iter() {
        let (class_id, score) = row
            .iter()
            .skip(4)
            .copied()
            .enumerate()
            .fold((0usize, f32::MIN), |best, (i, s)| {
                if s > best.1 {
                    (i, s)
                } else {
                    best
                }
            });

        if score < confidence_threshold {
            continue;
        }

        let (cx, cy, w, h) = (row[0], row[1], row[2], row[3]);
        let (x1, y1) = letterbox.to_source(cx - w / 2.0, cy - h / 2.0);
        let (x2, y2) = letterbox.to_source(cx + w / 2.0, cy + h / 2.0);

        candidates.push(Candidate {
            class_id,
            score,
            bbox: [x1, y1, x2, y2],
        });
    }

    let kept = non_max_suppression(candidates, iou_threshold);

    let max_x = letterbox.src_width as i32;
    let max_y = letterbox.src_height as i32;
    let detections = kept
        .into_iter()
        .filter_map(|c| {
            let bbox = BoundingBox::new(
                (c.bbox[0].round() as i32).clamp(0, max_x),
                (c.bbox[1].round() as i32).clamp(0, max_y),
                (c.bbox[2].round() as i32).clamp(0, max_x),
                (c.bbox[3].round() as i32).clamp(0, max_y),
            );
            bbox.is_valid()
                .then(|| Detection::new(labels[c.class_id].clone(), c.score, bbox))
        })
        .collect();

    Ok(detections)
}

/// Per-class greedy non-maximum suppression, highest score first
pub(crate) fn non_max_suppression(
    mut candidates: Vec<Candidate>,
    iou_threshold: f32,
) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut kept: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        let suppressed = kept.iter().any(|k| {
            k.class_id == candidate.class_id && iou(&k.bbox, &candidate.bbox) > iou_threshold
        });
        if !suppressed {
            kept.push(candidate);
        }
    }
    kept
}

/// Intersection over union of two `[x1, y1, x2, y2]` boxes
pub(crate) fn iou(a: &[f32; 4], b: &[f32; 4]) -> f32 {
    let x1 = a[0].max(b[0]);
    let y1 = a[1].max(b[1]);
    let x2 = a[2].min(b[2]);
    let y2 = a[3].min(b[3]);

    let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    let area_a = (a[2] - a[0]).max(0.0) * (a[3] - a[1]).max(0.0);
    let area_b = (b[2] - b[0]).max(0.0) * (b[3] - b[1]).max(0.0);
    let union = area_a + area_b - intersection;

    if union > 0.0 {
        intersection / union
    } else {
        0.0
    }
}
