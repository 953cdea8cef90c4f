// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Server configuration loaded from the environment

pub mod server;

pub use server::{DetectorConfig, ServerConfig, VlmConfig};
