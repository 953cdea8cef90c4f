// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Box and label rendering for highlighted images

use std::path::Path;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use tracing::warn;

use crate::vision::{BoundingBox, Detection};

pub const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const BOX_THICKNESS: u32 = 2;
pub const LABEL_FONT_SIZE: f32 = 18.0;
/// Distance between the label baseline and the top edge of its box
pub const LABEL_BASELINE_OFFSET: i32 = 10;

/// Load the TTF used for labels
///
/// Returns `None` (and logs) when no path is configured or the font cannot
/// be read, in which case boxes are drawn without labels.
pub fn load_font(path: Option<&Path>) -> Option<FontArc> {
    let path = path?;
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Label font {} unavailable: {}", path.display(), e);
            return None;
        }
    };
    match FontArc::try_from_vec(bytes) {
        Ok(font) => Some(font),
        Err(e) => {
            warn!("Label font {} is not a valid font: {}", path.display(), e);
            None
        }
    }
}

/// Top-left corner at which to draw label text so its baseline sits
/// `LABEL_BASELINE_OFFSET` pixels above the box. Not clamped to the canvas.
pub fn label_origin(bbox: &BoundingBox, ascent: i32) -> (i32, i32) {
    (bbox.x1, bbox.y1 - LABEL_BASELINE_OFFSET - ascent)
}

/// Outline `bbox` with `thickness` nested one-pixel rectangles, growing inward
pub fn draw_box(image: &mut RgbImage, bbox: &BoundingBox, color: Rgb<u8>, thickness: u32) {
    for t in 0..thickness {
        let width = bbox.width().saturating_sub(2 * t);
        let height = bbox.height().saturating_sub(2 * t);
        if width == 0 || height == 0 {
            break;
        }
        let rect = Rect::at(bbox.x1 + t as i32, bbox.y1 + t as i32).of_size(width, height);
        draw_hollow_rect_mut(image, rect, color);
    }
}

/// Draw every detection's box and, when a font is available, its label
pub fn draw_detections(image: &mut RgbImage, detections: &[&Detection], font: Option<&FontArc>) {
    let scale = PxScale::from(LABEL_FONT_SIZE);

    for detection in detections {
        draw_box(image, &detection.bbox, BOX_COLOR, BOX_THICKNESS);

        if let Some(font) = font {
            let ascent = font.as_scaled(scale).ascent().ceil() as i32;
            let (x, y) = label_origin(&detection.bbox, ascent);
            draw_text_mut(image, BOX_COLOR, x, y, scale, font, &detection.label());
        }
    }
}
