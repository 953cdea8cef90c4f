// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Ask request types and validation

use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::api::highlight::request::required;

/// Question about an uploaded image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub filename: Option<String>,

    /// Free-form question, passed to the model verbatim
    #[serde(default)]
    pub question: Option<String>,
}

impl AskRequest {
    pub fn validate(&self) -> Result<(&str, &str), ApiError> {
        let filename = required("filename", self.filename.as_deref())?;
        let question = required("question", self.question.as_deref())?;
        Ok((filename, question))
    }
}
