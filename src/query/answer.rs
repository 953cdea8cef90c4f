// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Answer policy around the visual question answerer

use anyhow::{Context, Result};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::vision::{load_image_file, VisualQuestionAnswerer};

/// Returned when the model just repeats the question back
pub const FALLBACK_ANSWER: &str = "Sorry, I could not answer this question.";

/// What to do when answering fails (model error, unreadable image, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnswerErrorPolicy {
    /// Succeed with `"Error processing question: {details}"` as the answer
    #[default]
    Embed,
    /// Return the error to the caller
    Propagate,
}

impl FromStr for AnswerErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "embed" => Ok(Self::Embed),
            "propagate" => Ok(Self::Propagate),
            other => Err(format!(
                "unknown answer error policy '{}', expected 'embed' or 'propagate'",
                other
            )),
        }
    }
}

impl fmt::Display for AnswerErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embed => write!(f, "embed"),
            Self::Propagate => write!(f, "propagate"),
        }
    }
}

/// Replace an answer that merely echoes the question
pub fn guard_echo(raw: String, question: &str) -> String {
    if raw.to_lowercase() == question.to_lowercase() {
        FALLBACK_ANSWER.to_string()
    } else {
        raw
    }
}

/// Answers general questions about stored images
#[derive(Clone)]
pub struct AnswerService {
    answerer: Arc<dyn VisualQuestionAnswerer>,
    policy: AnswerErrorPolicy,
}

impl AnswerService {
    pub fn new(answerer: Arc<dyn VisualQuestionAnswerer>, policy: AnswerErrorPolicy) -> Self {
        Self { answerer, policy }
    }

    pub fn policy(&self) -> AnswerErrorPolicy {
        self.policy
    }

    /// Answer `question` about the image stored at `image_path`
    ///
    /// Under [`AnswerErrorPolicy::Embed`] this never fails.
    pub async fn answer(&self, image_path: &Path, question: &str) -> Result<String> {
        match self.try_answer(image_path, question).await {
            Ok(answer) => Ok(answer),
            Err(e) => match self.policy {
                AnswerErrorPolicy::Embed => {
                    warn!("Error processing question: {:#}", e);
                    Ok(format!("Error processing question: {:#}", e))
                }
                AnswerErrorPolicy::Propagate => Err(e),
            },
        }
    }

    async fn try_answer(&self, image_path: &Path, question: &str) -> Result<String> {
        let image = load_image_file(image_path)
            .await
            .with_context(|| format!("Failed to load {}", image_path.display()))?;

        let raw = self.answerer.answer(&image, question).await?;
        debug!("Raw answer from {}: {:?}", self.answerer.model_name(), raw);

        Ok(guard_echo(raw, question))
    }
}
