// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod ask;
pub mod errors;
pub mod health;
pub mod highlight;
pub mod http_server;
pub mod upload;

pub use ask::{ask_handler, AskRequest, AskResponse};
pub use errors::{ApiError, ErrorResponse};
pub use health::{health_handler, HealthResponse};
pub use highlight::{highlight_handler, HighlightRequest, HighlightResponse};
pub use http_server::{create_app, start_server, AppState};
pub use upload::{upload_handler, UploadResponse};
