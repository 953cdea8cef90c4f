// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload API endpoint module
//!
//! Provides POST /upload for storing an image and listing the objects in it.

pub mod handler;
pub mod response;

pub use handler::upload_handler;
pub use response::UploadResponse;
