// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for YOLOv8

use image::{imageops, DynamicImage, GenericImageView, Rgb, RgbImage};
use ndarray::Array4;

/// Square input size of the YOLOv8 export
pub const YOLO_INPUT_SIZE: u32 = 640;

/// Grey used for letterbox padding (matches Ultralytics)
pub const PAD_VALUE: u8 = 114;

/// Geometry of a letterbox resize, used to map model-space coordinates back
/// to the source image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    /// Uniform scale applied to the source image
    pub scale: f32,
    /// Horizontal padding on the left, in model pixels
    pub pad_x: u32,
    /// Vertical padding on the top, in model pixels
    pub pad_y: u32,
    pub src_width: u32,
    pub src_height: u32,
}

impl Letterbox {
    /// Compute the letterbox for a source size and square target
    pub fn compute(src_width: u32, src_height: u32, target: u32) -> Self {
        let w = src_width.max(1) as f32;
        let h = src_height.max(1) as f32;
        let scale = (target as f32 / w).min(target as f32 / h);

        let (new_w, new_h) = scaled_size(src_width, src_height, scale, target);

        Self {
            scale,
            pad_x: (target - new_w) / 2,
            pad_y: (target - new_h) / 2,
            src_width,
            src_height,
        }
    }

    /// Map a point from model input space to source pixels (unclamped)
    pub fn to_source(&self, x: f32, y: f32) -> (f32, f32) {
        (
            (x - self.pad_x as f32) / self.scale,
            (y - self.pad_y as f32) / self.scale,
        )
    }
}

fn scaled_size(src_width: u32, src_height: u32, scale: f32, target: u32) -> (u32, u32) {
    let new_w = ((src_width as f32 * scale).round() as u32).clamp(1, target);
    let new_h = ((src_height as f32 * scale).round() as u32).clamp(1, target);
    (new_w, new_h)
}

/// Preprocess an image for YOLOv8
///
/// Steps:
/// 1. Resize keeping aspect ratio so the longer side equals `target`
/// 2. Pad to `target x target` with grey, centred
/// 3. Scale pixels to [0, 1]
/// 4. Convert to NCHW tensor format [1, 3, target, target]
pub fn preprocess_for_yolo(image: &DynamicImage, target: u32) -> (Array4<f32>, Letterbox) {
    let (src_w, src_h) = image.dimensions();
    let letterbox = Letterbox::compute(src_w, src_h, target);
    let (new_w, new_h) = scaled_size(src_w, src_h, letterbox.scale, target);

    let resized = imageops::resize(
        &image.to_rgb8(),
        new_w,
        new_h,
        imageops::FilterType::Triangle,
    );

    let mut canvas = RgbImage::from_pixel(target, target, Rgb([PAD_VALUE; 3]));
    imageops::overlay(
        &mut canvas,
        &resized,
        letterbox.pad_x as i64,
        letterbox.pad_y as i64,
    );

    let size = target as usize;
    let mut tensor = Array4::zeros((1, 3, size, size));
    for (x, y, pixel) in canvas.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = pixel[c] as f32 / 255.0;
        }
    }

    (tensor, letterbox)
}
