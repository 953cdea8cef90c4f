// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Ask API endpoint module
//!
//! Provides POST /ask for questions about an uploaded image. Counting
//! questions are answered from detections, everything else by the VLM.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::ask_handler;
pub use request::AskRequest;
pub use response::AskResponse;
