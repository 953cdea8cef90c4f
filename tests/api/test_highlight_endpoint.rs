// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /highlight tests

use axum::{
    body::Body,
    http::{Method, Request},
};
use serde_json::json;

use super::support::*;

#[tokio::test]
async fn test_highlight_writes_result_and_returns_url() {
    let server = test_server().await;
    server.upload("street.png", &png_bytes(RED)).await;

    let (status, body) = server
        .post_json("/highlight", json!({"filename": "street.png", "object_name": "car"}))
        .await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"image_url": "/static/results/highlighted_street.jpg"}));

    let result = server.static_dir().join("results/highlighted_street.jpg");
    let written = image::open(&result).unwrap();
    assert_eq!((written.width(), written.height()), (64, 48));
}

#[tokio::test]
async fn test_highlighted_image_is_served() {
    let server = test_server().await;
    server.upload("street.png", &png_bytes(RED)).await;
    let (_, body) = server
        .post_json("/highlight", json!({"filename": "street.png", "object_name": "car"}))
        .await;

    let request = Request::builder()
        .method(Method::GET)
        .uri(body["image_url"].as_str().unwrap())
        .body(Body::empty())
        .unwrap();
    let response = server.send(request).await;

    assert_eq!(response.status().as_u16(), 200);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..3], &[0xFF, 0xD8, 0xFF]);
}

#[tokio::test]
async fn test_highlight_object_not_found() {
    let server = test_server().await;
    server.upload("street.png", &png_bytes(RED)).await;

    let (status, body) = server
        .post_json("/highlight", json!({"filename": "street.png", "object_name": "dog"}))
        .await;

    assert_eq!(status, 404);
    assert_eq!(body, json!({"error": "Object 'dog' not found"}));
    assert!(!server
        .static_dir()
        .join("results/highlighted_street.jpg")
        .exists());
}

#[tokio::test]
async fn test_highlight_matches_case_sensitively() {
    let server = test_server().await;
    server.upload("street.png", &png_bytes(RED)).await;

    let (status, body) = server
        .post_json("/highlight", json!({"filename": "street.png", "object_name": "Car"}))
        .await;

    assert_eq!(status, 404);
    assert_eq!(body["error"], "Object 'Car' not found");
}

#[tokio::test]
async fn test_highlight_unknown_file() {
    let server = test_server().await;

    let (status, body) = server
        .post_json("/highlight", json!({"filename": "missing.png", "object_name": "car"}))
        .await;

    assert_eq!(status, 404);
    assert_eq!(body, json!({"error": "File not found"}));
}

#[tokio::test]
async fn test_highlight_rejects_path_traversal() {
    let server = test_server().await;
    server.upload("street.png", &png_bytes(RED)).await;

    let (status, _) = server
        .post_json(
            "/highlight",
            json!({"filename": "../uploads/street.png", "object_name": "car"}),
        )
        .await;

    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_highlight_missing_parameters() {
    let server = test_server().await;

    let (status, body) = server
        .post_json("/highlight", json!({"filename": "street.png"}))
        .await;

    assert_eq!(status, 400);
    assert_eq!(body, json!({"error": "Missing required parameters"}));
}

#[tokio::test]
async fn test_highlight_malformed_json() {
    let server = test_server().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/highlight")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = server.send(request).await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(json_body(response).await["error"], "Missing required parameters");
}

#[tokio::test]
async fn test_strict_labels_reject_unknown_label() {
    let server = test_server_with(ServerOptions {
        strict_labels: true,
        ..Default::default()
    })
    .await;
    server.upload("street.png", &png_bytes(RED)).await;

    let (status, body) = server
        .post_json("/highlight", json!({"filename": "street.png", "object_name": "unicorn"}))
        .await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "Unknown object label");
}

#[tokio::test]
async fn test_strict_labels_known_but_absent_is_not_found() {
    let server = test_server_with(ServerOptions {
        strict_labels: true,
        ..Default::default()
    })
    .await;
    server.upload("street.png", &png_bytes(RED)).await;

    let (status, body) = server
        .post_json("/highlight", json!({"filename": "street.png", "object_name": "person"}))
        .await;

    assert_eq!(status, 404);
    assert_eq!(body["error"], "Object 'person' not found");
}

#[tokio::test]
async fn test_unknown_label_without_strict_mode_is_not_found() {
    let server = test_server().await;
    server.upload("street.png", &png_bytes(RED)).await;

    let (status, _) = server
        .post_json("/highlight", json!({"filename": "street.png", "object_name": "unicorn"}))
        .await;

    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_highlight_write_failure_reports_not_found() {
    let server = test_server().await;
    server.upload("street.png", &png_bytes(RED)).await;

    let results = server.static_dir().join("results");
    std::fs::remove_dir_all(&results).unwrap();
    std::fs::write(&results, b"not a directory").unwrap();

    let (status, body) = server
        .post_json("/highlight", json!({"filename": "street.png", "object_name": "car"}))
        .await;

    assert_eq!(status, 404);
    assert_eq!(body, json!({"error": "Object 'car' not found"}));
    assert!(results.is_file());
}
