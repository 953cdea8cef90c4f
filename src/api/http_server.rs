// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP server: shared state, routing and startup

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::ask::ask_handler;
use super::health::health_handler;
use super::highlight::highlight_handler;
use super::upload::upload_handler;
use crate::annotate::{load_font, Highlighter};
use crate::config::ServerConfig;
use crate::query::AnswerService;
use crate::storage::ImageStore;
use crate::vision::VisionModelManager;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub vision: VisionModelManager,
    pub store: ImageStore,
    pub answers: AnswerService,
    pub highlighter: Highlighter,
    pub strict_object_labels: bool,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Wire the services for `config` around already loaded models
    pub fn new(config: &ServerConfig, vision: VisionModelManager) -> Self {
        let highlighter = Highlighter::new(
            vision.detector(),
            load_font(config.label_font_path.as_deref()),
        );
        if !highlighter.has_font() {
            tracing::warn!("No label font loaded, highlighted boxes will have no labels");
        }

        Self {
            store: ImageStore::new(&config.static_dir),
            answers: AnswerService::new(vision.answerer(), config.answer_error_policy),
            highlighter,
            strict_object_labels: config.strict_object_labels,
            max_upload_bytes: config.max_upload_bytes,
            vision,
        }
    }
}

/// Build the application router
pub fn create_app(state: Arc<AppState>) -> Router {
    let static_dir = state.store.static_dir().to_path_buf();

    Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .route("/health", get(health_handler))
        .route("/upload", post(upload_handler))
        .route("/highlight", post(highlight_handler))
        .route("/ask", post(ask_handler))
        .nest_service("/static", ServeDir::new(&static_dir))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Create storage directories, bind and serve until the process exits
pub async fn start_server(config: ServerConfig, vision: VisionModelManager) -> anyhow::Result<()> {
    let state = AppState::new(&config, vision);
    state.store.ensure_dirs().await?;

    let app = create_app(Arc::new(state));
    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("🚀 Visual QA server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
