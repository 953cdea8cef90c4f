// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /upload tests
//!
//! Covers extension filtering, filename sanitization, content checks and
//! overwrite semantics for repeated uploads.

use axum::{body::Body, http::Request};
use serde_json::json;

use super::support::*;

#[tokio::test]
async fn test_upload_returns_detected_objects() {
    let server = test_server().await;

    let (status, body) = server.upload("street.png", &png_bytes(RED)).await;

    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({
            "message": "File uploaded successfully",
            "objects": ["car"],
            "filename": "street.png"
        })
    );
    assert!(server.static_dir().join("uploads/street.png").exists());
}

#[tokio::test]
async fn test_upload_without_detections_lists_nothing() {
    let server = test_server().await;

    let (status, body) = server.upload("lawn.jpg", &png_bytes(GREEN)).await;

    assert_eq!(status, 200);
    assert_eq!(body["objects"], json!([]));
}

#[tokio::test]
async fn test_upload_sanitizes_filename() {
    let server = test_server().await;

    let (status, body) = server.upload("../../my street.PNG", &png_bytes(RED)).await;

    assert_eq!(status, 200);
    assert_eq!(body["filename"], "my_street.PNG");
    assert!(server.static_dir().join("uploads/my_street.PNG").exists());
}

#[tokio::test]
async fn test_upload_rejects_gif_extension() {
    let server = test_server().await;

    let (status, body) = server.upload("photo.GIF", &png_bytes(RED)).await;

    assert_eq!(status, 400);
    assert_eq!(body, json!({"error": "Invalid file type"}));
    assert!(!server.static_dir().join("uploads/photo.GIF").exists());
}

#[tokio::test]
async fn test_upload_rejects_missing_extension() {
    let server = test_server().await;

    let (status, body) = server.upload("photo", &png_bytes(RED)).await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid file type");
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let server = test_server().await;

    let response = server
        .send(multipart_request("image", "street.png", &png_bytes(RED)))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(json_body(response).await, json!({"error": "No file part"}));
}

#[tokio::test]
async fn test_upload_with_empty_filename() {
    let server = test_server().await;

    let (status, body) = server.upload("", &png_bytes(RED)).await;

    assert_eq!(status, 400);
    assert_eq!(body, json!({"error": "No selected file"}));
}

#[tokio::test]
async fn test_upload_rejects_non_image_content() {
    let server = test_server().await;

    let (status, body) = server.upload("notes.png", b"just some text").await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid image data");
    assert!(!server.static_dir().join("uploads/notes.png").exists());
}

#[tokio::test]
async fn test_upload_without_multipart_body() {
    let server = test_server().await;

    let request = Request::builder()
        .method("POST")
        .uri("/upload")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"file": "street.png"}"#))
        .unwrap();
    let response = server.send(request).await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(json_body(response).await, json!({"error": "No file part"}));
}

#[tokio::test]
async fn test_upload_over_body_limit_is_413() {
    let server = test_server_with(ServerOptions {
        max_upload_bytes: 1024,
        ..Default::default()
    })
    .await;

    let (status, body) = server.upload("big.png", &vec![0u8; 8192]).await;

    assert_eq!(status, 413);
    assert_eq!(body, json!({"error": "File too large"}));
    assert!(!server.static_dir().join("uploads/big.png").exists());
}

#[tokio::test]
async fn test_upload_under_body_limit_succeeds() {
    let server = test_server_with(ServerOptions {
        max_upload_bytes: 64 * 1024,
        ..Default::default()
    })
    .await;

    let (status, body) = server.upload("street.png", &png_bytes(RED)).await;

    assert_eq!(status, 200);
    assert_eq!(body["objects"], json!(["car"]));
}

#[tokio::test]
async fn test_reupload_overwrites_and_redetects() {
    let server = test_server().await;

    let (_, first) = server.upload("scene.png", &png_bytes(RED)).await;
    assert_eq!(first["objects"], json!(["car"]));

    let blue = png_bytes(BLUE);
    let (status, second) = server.upload("scene.png", &blue).await;

    assert_eq!(status, 200);
    assert_eq!(second["objects"], json!(["dog"]));
    let stored = std::fs::read(server.static_dir().join("uploads/scene.png")).unwrap();
    assert_eq!(stored, blue);

    let (status, counted) = server
        .post_json(
            "/ask",
            json!({"filename": "scene.png", "question": "how many dog are there?"}),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(counted["answer"], "There are 1 dog(s) in the image.");
}
