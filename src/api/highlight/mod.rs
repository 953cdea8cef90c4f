// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Highlight API endpoint module
//!
//! Provides POST /highlight for drawing one named object on a stored image.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::highlight_handler;
pub use request::HighlightRequest;
pub use response::HighlightResponse;
