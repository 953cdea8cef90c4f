// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};

/// URL of the highlighted image under `/static`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HighlightResponse {
    pub image_url: String,
}
