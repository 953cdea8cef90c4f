// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the HTTP server and its model services

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::query::AnswerErrorPolicy;

/// Default location of the label font on Debian/Ubuntu images
const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Static root; uploads and results are stored below it
    pub static_dir: PathBuf,
    /// Maximum accepted multipart body size in bytes
    pub max_upload_bytes: usize,
    /// Object detector settings
    pub detector: DetectorConfig,
    /// Vision-language model sidecar settings
    pub vlm: VlmConfig,
    /// What /ask does when the answerer fails
    pub answer_error_policy: AnswerErrorPolicy,
    /// Reject highlight requests for names outside the detector's label set
    pub strict_object_labels: bool,
    /// TrueType font used for box labels
    pub label_font_path: Option<PathBuf>,
}

/// YOLO detector configuration
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Path to the ONNX export of the detector
    pub model_path: PathBuf,
    /// Optional newline-separated label file; COCO names when unset
    pub labels_path: Option<PathBuf>,
    /// Minimum class score for a detection to be kept
    pub confidence_threshold: f32,
    /// IoU threshold for non-maximum suppression
    pub iou_threshold: f32,
    /// ONNX Runtime intra-op threads
    pub intra_threads: usize,
}

/// OpenAI-compatible VLM sidecar configuration
#[derive(Debug, Clone)]
pub struct VlmConfig {
    pub endpoint: String,
    pub model_name: String,
    pub timeout_secs: u64,
}

/// Parse an optional variable, falling back to `default` when unset
fn parse_var<T>(
    vars: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match vars(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| format!("{}: invalid value '{}': {}", key, raw, e)),
        None => Ok(default),
    }
}

fn parse_flag(
    vars: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: bool,
) -> Result<bool, String> {
    let Some(raw) = vars(key) else {
        return Ok(default);
    };
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(format!(
            "{}: invalid value '{}', expected true/false, 1/0, yes/no or on/off",
            key, raw
        )),
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Unset variables take their defaults; set but unparsable ones are an
    /// error.
    pub fn from_env() -> Result<Self, String> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_vars(vars: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let defaults = Self::default();

        Ok(Self {
            host: vars("API_HOST").unwrap_or(defaults.host),
            port: parse_var(&vars, "API_PORT", defaults.port)?,
            static_dir: vars("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            max_upload_bytes: parse_var(&vars, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            detector: DetectorConfig {
                model_path: vars("DETECTOR_MODEL_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.detector.model_path),
                labels_path: vars("DETECTOR_LABELS_PATH").map(PathBuf::from),
                confidence_threshold: parse_var(
                    &vars,
                    "DETECTOR_CONFIDENCE",
                    defaults.detector.confidence_threshold,
                )?,
                iou_threshold: parse_var(&vars, "DETECTOR_IOU", defaults.detector.iou_threshold)?,
                intra_threads: parse_var(
                    &vars,
                    "DETECTOR_THREADS",
                    defaults.detector.intra_threads,
                )?,
            },
            vlm: VlmConfig {
                endpoint: vars("VLM_ENDPOINT").unwrap_or(defaults.vlm.endpoint),
                model_name: vars("VLM_MODEL").unwrap_or(defaults.vlm.model_name),
                timeout_secs: parse_var(&vars, "VLM_TIMEOUT_SECS", defaults.vlm.timeout_secs)?,
            },
            answer_error_policy: parse_var(
                &vars,
                "ANSWER_ERROR_POLICY",
                defaults.answer_error_policy,
            )?,
            strict_object_labels: parse_flag(
                &vars,
                "STRICT_OBJECT_LABELS",
                defaults.strict_object_labels,
            )?,
            label_font_path: vars("LABEL_FONT_PATH")
                .map(PathBuf::from)
                .or(defaults.label_font_path),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_upload_bytes == 0 {
            return Err("MAX_UPLOAD_BYTES must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.detector.confidence_threshold) {
            return Err(format!(
                "DETECTOR_CONFIDENCE must be within [0, 1], got {}",
                self.detector.confidence_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.detector.iou_threshold) {
            return Err(format!(
                "DETECTOR_IOU must be within [0, 1], got {}",
                self.detector.iou_threshold
            ));
        }
        if self.detector.intra_threads == 0 {
            return Err("DETECTOR_THREADS must be greater than 0".to_string());
        }
        if self.vlm.endpoint.is_empty() {
            return Err("VLM_ENDPOINT must not be empty".to_string());
        }
        Ok(())
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            static_dir: PathBuf::from("./static"),
            max_upload_bytes: 16 * 1024 * 1024,
            detector: DetectorConfig {
                model_path: PathBuf::from("./models/yolov8n.onnx"),
                labels_path: None,
                confidence_threshold: 0.25,
                iou_threshold: 0.7,
                intra_threads: 4,
            },
            vlm: VlmConfig {
                endpoint: "http://localhost:8081".to_string(),
                model_name: "blip2".to_string(),
                timeout_secs: 120,
            },
            answer_error_policy: AnswerErrorPolicy::Embed,
            strict_object_labels: false,
            label_font_path: Some(PathBuf::from(DEFAULT_FONT_PATH)),
        }
    }
}
