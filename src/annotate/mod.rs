// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image annotation: draws detection boxes and labels onto stored images

pub mod draw;
pub mod highlighter;

pub use draw::{draw_detections, label_origin, load_font, BOX_COLOR, BOX_THICKNESS};
pub use highlighter::{HighlightError, Highlighter};
