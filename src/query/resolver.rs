// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Object reference resolution and counting

use std::collections::BTreeSet;

use crate::vision::Detection;

/// Detections whose class name equals `object_name` byte for byte
///
/// An empty result means the object is not in the image; callers decide
/// whether that is an error.
pub fn resolve<'a>(detections: &'a [Detection], object_name: &str) -> Vec<&'a Detection> {
    detections
        .iter()
        .filter(|d| d.class_name == object_name)
        .collect()
}

/// Number of detections matching `object_name`
pub fn count(detections: &[Detection], object_name: &str) -> usize {
    resolve(detections, object_name).len()
}

/// Answer text for a counting question. The `(s)` suffix is literal.
pub fn count_message(count: usize, object_name: &str) -> String {
    format!("There are {} {}(s) in the image.", count, object_name)
}

/// De-duplicated class names across all detections, sorted
pub fn unique_labels(detections: &[Detection]) -> Vec<String> {
    detections
        .iter()
        .map(|d| d.class_name.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
