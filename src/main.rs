// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Context, Result};
use std::env;
use visual_qa_server::{config::ServerConfig, start_server, version, vision::VisionModelManager};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("🚀 Starting Visual QA Server...\n");
    println!("📦 BUILD VERSION: {}", version::VERSION);
    println!("📅 Build Date: {}", version::BUILD_DATE);
    println!();

    let config =
        ServerConfig::from_env().map_err(|e| anyhow!("Invalid configuration: {}", e))?;
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;
    tracing::info!("{}", version::get_version_string());
    tracing::info!(
        "Static dir: {}, answer error policy: {}, strict labels: {}",
        config.static_dir.display(),
        config.answer_error_policy,
        config.strict_object_labels
    );

    println!("🧠 Loading object detector from {}...", config.detector.model_path.display());
    let vision = VisionModelManager::from_config(&config).context("Failed to load vision models")?;
    println!("✅ Vision models ready");

    for model in vision.list_models().await {
        if model.available {
            tracing::info!("Model {} ({}) available", model.name, model.model_type);
        } else {
            tracing::warn!(
                "Model {} ({}) is not reachable yet, general questions will fail until it is",
                model.name,
                model.model_type
            );
        }
    }

    start_server(config, vision).await
}
