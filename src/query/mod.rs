// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Question routing, object resolution and answer policy
//!
//! This is the decision layer between the HTTP handlers and the models:
//! it decides whether a question is a counting question, which detections a
//! user-supplied object name refers to, and how answerer output and failures
//! are turned into response text.

pub mod answer;
pub mod resolver;
pub mod router;

pub use answer::{AnswerErrorPolicy, AnswerService, FALLBACK_ANSWER};
pub use resolver::{count, count_message, resolve, unique_labels};
pub use router::{classify, Query};
