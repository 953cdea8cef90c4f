// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Visual question answering capability

use async_trait::async_trait;

use crate::vision::image_utils::LoadedImage;

/// Answers free-form questions about an image
///
/// Implementations return the model's raw answer. Echo detection and error
/// conversion are applied by [`crate::query::AnswerService`].
#[async_trait]
pub trait VisualQuestionAnswerer: Send + Sync {
    async fn answer(&self, image: &LoadedImage, question: &str) -> anyhow::Result<String>;

    /// Model name for logs and health output
    fn model_name(&self) -> String;

    /// Whether the backing model is reachable
    async fn health_check(&self) -> bool {
        true
    }
}
