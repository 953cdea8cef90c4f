// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Shared fakes and request builders for the HTTP tests

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, Response},
    Router,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::util::ServiceExt;
use visual_qa_server::{
    api::http_server::{create_app, AppState},
    config::ServerConfig,
    query::AnswerErrorPolicy,
    vision::{BoundingBox, Detection, LoadedImage, ObjectDetector, VisionModelManager},
    VisualQuestionAnswerer,
};

pub const RED: Rgb<u8> = Rgb([220, 20, 20]);
pub const BLUE: Rgb<u8> = Rgb([20, 20, 220]);
pub const GREEN: Rgb<u8> = Rgb([20, 220, 20]);

const BOUNDARY: &str = "visual-qa-test-boundary";

/// Detector whose output depends on the image content: red images
/// contain two cars, blue images one dog, anything else nothing.
pub struct ColorDetector;

#[async_trait]
impl ObjectDetector for ColorDetector {
    async fn detect(&self, image: &DynamicImage) -> anyhow::Result<Vec<Detection>> {
        let pixel = *image.to_rgb8().get_pixel(0, 0);
        let [r, g, b] = pixel.0;
        let detections = if r > g && r > b {
            vec![
                Detection::new("car", 0.91, BoundingBox::new(4, 4, 30, 30)),
                Detection::new("car", 0.62, BoundingBox::new(32, 10, 60, 40)),
            ]
        } else if b > r && b > g {
            vec![Detection::new("dog", 0.88, BoundingBox::new(8, 8, 40, 40))]
        } else {
            vec![]
        };
        Ok(detections)
    }

    fn labels(&self) -> Vec<String> {
        vec!["car".to_string(), "dog".to_string(), "person".to_string()]
    }

    fn model_name(&self) -> String {
        "color-detector".to_string()
    }
}

/// Answerer with a canned reply that records the questions it receives
pub struct FakeAnswerer {
    reply: Result<String, String>,
    pub questions: Mutex<Vec<String>>,
}

impl FakeAnswerer {
    pub fn replying(answer: &str) -> Self {
        Self {
            reply: Ok(answer.to_string()),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

#[async_trait]
impl VisualQuestionAnswerer for FakeAnswerer {
    async fn answer(&self, _image: &LoadedImage, question: &str) -> anyhow::Result<String> {
        self.questions.lock().unwrap().push(question.to_string());
        self.reply.clone().map_err(|e| anyhow::anyhow!(e))
    }

    fn model_name(&self) -> String {
        "fake-vlm".to_string()
    }
}

pub struct TestServer {
    pub app: Router,
    pub dir: TempDir,
    pub answerer: Arc<FakeAnswerer>,
}

impl TestServer {
    pub fn static_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("static")
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Upload `bytes` as `filename` and return the parsed JSON body
    pub async fn upload(&self, filename: &str, bytes: &[u8]) -> (u16, serde_json::Value) {
        let response = self.send(multipart_request("file", filename, bytes)).await;
        let status = response.status().as_u16();
        (status, json_body(response).await)
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> (u16, serde_json::Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = self.send(request).await;
        let status = response.status().as_u16();
        (status, json_body(response).await)
    }
}

pub struct ServerOptions {
    pub policy: AnswerErrorPolicy,
    pub strict_labels: bool,
    pub answerer: FakeAnswerer,
    pub max_upload_bytes: usize,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            policy: AnswerErrorPolicy::Embed,
            strict_labels: false,
            answerer: FakeAnswerer::replying("a street"),
            max_upload_bytes: ServerConfig::default().max_upload_bytes,
        }
    }
}

pub async fn test_server() -> TestServer {
    test_server_with(ServerOptions::default()).await
}

pub async fn test_server_with(options: ServerOptions) -> TestServer {
    let dir = tempfile::tempdir().unwrap();

    let mut config = ServerConfig::default();
    config.static_dir = dir.path().join("static");
    config.label_font_path = None;
    config.answer_error_policy = options.policy;
    config.strict_object_labels = options.strict_labels;
    config.max_upload_bytes = options.max_upload_bytes;

    let answerer = Arc::new(options.answerer);
    let vision = VisionModelManager::new(Arc::new(ColorDetector), answerer.clone());
    let state = AppState::new(&config, vision);
    state.store.ensure_dirs().await.unwrap();

    TestServer {
        app: create_app(Arc::new(state)),
        dir,
        answerer,
    }
}

pub fn png_bytes(color: Rgb<u8>) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 48, color))
        .write_to(&mut buffer, ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}

pub fn multipart_request(field: &str, filename: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
}
