// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Message for a JSON body that is absent, malformed or missing fields
pub const MISSING_PARAMETERS: &str = "Missing required parameters";

/// JSON body of every error response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    InvalidRequest(String),
    ValidationError { field: String, message: String },
    UnknownLabel(String),
    NotFound(String),
    PayloadTooLarge(String),
    Internal { error: String, details: String },
}

impl ApiError {
    pub fn missing_parameters() -> Self {
        ApiError::InvalidRequest(MISSING_PARAMETERS.to_string())
    }

    pub fn file_not_found() -> Self {
        ApiError::NotFound("File not found".to_string())
    }

    pub fn file_too_large() -> Self {
        ApiError::PayloadTooLarge("File too large".to_string())
    }

    pub fn object_not_found(object_name: &str) -> Self {
        ApiError::NotFound(format!("Object '{}' not found", object_name))
    }

    /// 500 with the generic message and the error chain as details
    pub fn internal(error: &anyhow::Error) -> Self {
        Self::internal_with("Internal server error", error)
    }

    pub fn internal_with(message: &str, error: &anyhow::Error) -> Self {
        ApiError::Internal {
            error: message.to_string(),
            details: format!("{:#}", error),
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let (error, details) = match self {
            ApiError::InvalidRequest(msg) => (msg.clone(), None),
            ApiError::ValidationError { message, .. } => (message.clone(), None),
            ApiError::UnknownLabel(label) => (
                "Unknown object label".to_string(),
                Some(format!("'{}' is not a label the detector can produce", label)),
            ),
            ApiError::NotFound(msg) | ApiError::PayloadTooLarge(msg) => (msg.clone(), None),
            ApiError::Internal { error, details } => (error.clone(), Some(details.clone())),
        };

        ErrorResponse { error, details }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_)
            | ApiError::ValidationError { .. }
            | ApiError::UnknownLabel(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::UnknownLabel(label) => write!(f, "Unknown object label '{}'", label),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            ApiError::Internal { error, details } => write!(f, "{}: {}", error, details),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}
