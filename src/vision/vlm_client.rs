// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! VLM sidecar client for visual question answering via OpenAI-compatible API

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::VlmConfig;
use crate::vision::image_utils::LoadedImage;
use crate::vision::question_answering::VisualQuestionAnswerer;

// --- OpenAI-compatible serde structs ---

#[derive(serde::Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(serde::Serialize)]
struct ChatMessage {
    role: String,
    content: serde_json::Value,
}

#[derive(serde::Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(serde::Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Answers are short; BLIP-style models produce a few words
const ANSWER_MAX_TOKENS: u32 = 64;

/// Client for calling a VLM sidecar service via OpenAI-compatible API
pub struct VlmClient {
    client: Client,
    endpoint: String,
    model_name: String,
}

impl VlmClient {
    /// Create a new VLM client
    pub fn new(config: &VlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build VLM HTTP client")?;

        let endpoint = config.endpoint.trim_end_matches('/').to_string();
        info!(
            "VLM client configured: endpoint={}, model={}",
            endpoint, config.model_name
        );

        Ok(Self {
            client,
            endpoint,
            model_name: config.model_name.clone(),
        })
    }

    /// Get the endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request(&self, data_url: &str, question: &str) -> ChatRequest {
        ChatRequest {
            model: self.model_name.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: serde_json::json!([
                    {"type": "text", "text": question},
                    {"type": "image_url", "image_url": {"url": data_url}}
                ]),
            }],
            max_tokens: ANSWER_MAX_TOKENS,
            temperature: 0.0,
        }
    }
}

#[async_trait]
impl VisualQuestionAnswerer for VlmClient {
    async fn answer(&self, image: &LoadedImage, question: &str) -> Result<String> {
        let start = std::time::Instant::now();
        let data_url = format!(
            "data:image/{};base64,{}",
            image.mime_subtype(),
            image.to_base64()
        );

        let request = self.build_request(&data_url, question);

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.endpoint))
            .json(&request)
            .send()
            .await
            .context("VLM request failed")?
            .error_for_status()
            .context("VLM returned an error status")?;

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse VLM response")?;

        let answer = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .context("VLM response contained no choices")?;

        debug!(
            "VLM answered in {}ms ({} chars)",
            start.elapsed().as_millis(),
            answer.len()
        );

        Ok(answer)
    }

    fn model_name(&self) -> String {
        self.model_name.clone()
    }

    /// Check if the VLM sidecar is healthy
    async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.endpoint))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("VLM health check failed: {}", e);
                false
            }
        }
    }
}
