// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /ask tests
//!
//! Counting questions are answered from detections; everything else goes
//! through the answerer under the configured error policy.

use serde_json::json;
use visual_qa_server::query::{AnswerErrorPolicy, FALLBACK_ANSWER};

use super::support::*;

async fn ask(server: &TestServer, question: &str) -> (u16, serde_json::Value) {
    server
        .post_json("/ask", json!({"filename": "street.png", "question": question}))
        .await
}

#[tokio::test]
async fn test_counting_question_counts_detections() {
    let server = test_server().await;
    server.upload("street.png", &png_bytes(RED)).await;

    let (status, body) = ask(&server, "How many car are there?").await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"answer": "There are 2 car(s) in the image."}));
    assert!(server.answerer.questions().is_empty());
}

#[tokio::test]
async fn test_counting_uses_token_verbatim() {
    let server = test_server().await;
    server.upload("street.png", &png_bytes(RED)).await;

    let (_, body) = ask(&server, "how many cars are there?").await;
    assert_eq!(body["answer"], "There are 0 cars(s) in the image.");

    let (_, body) = ask(&server, "how many red cars are there?").await;
    assert_eq!(body["answer"], "There are 0 red(s) in the image.");
}

#[tokio::test]
async fn test_counting_zero_objects() {
    let server = test_server().await;
    server.upload("street.png", &png_bytes(GREEN)).await;

    let (status, body) = ask(&server, "How many car are there").await;

    assert_eq!(status, 200);
    assert_eq!(body["answer"], "There are 0 car(s) in the image.");
}

#[tokio::test]
async fn test_general_question_goes_to_answerer_verbatim() {
    let server = test_server().await;
    server.upload("street.png", &png_bytes(RED)).await;

    let (status, body) = ask(&server, "What Color is the car?").await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"answer": "a street"}));
    assert_eq!(server.answerer.questions(), vec!["What Color is the car?"]);
}

#[tokio::test]
async fn test_how_many_without_are_there_is_general() {
    let server = test_server().await;
    server.upload("street.png", &png_bytes(RED)).await;

    let (_, body) = ask(&server, "how many cars do you see?").await;

    assert_eq!(body["answer"], "a street");
    assert_eq!(server.answerer.questions().len(), 1);
}

#[tokio::test]
async fn test_echoed_answer_is_replaced() {
    let server = test_server_with(ServerOptions {
        answerer: FakeAnswerer::replying("WHAT IS THIS?"),
        ..Default::default()
    })
    .await;
    server.upload("street.png", &png_bytes(RED)).await;

    let (status, body) = ask(&server, "what is this?").await;

    assert_eq!(status, 200);
    assert_eq!(body["answer"], FALLBACK_ANSWER);
}

#[tokio::test]
async fn test_answerer_failure_is_embedded_by_default() {
    let server = test_server_with(ServerOptions {
        answerer: FakeAnswerer::failing("VLM sidecar unavailable"),
        ..Default::default()
    })
    .await;
    server.upload("street.png", &png_bytes(RED)).await;

    let (status, body) = ask(&server, "what is this?").await;

    assert_eq!(status, 200);
    assert_eq!(
        body["answer"],
        "Error processing question: VLM sidecar unavailable"
    );
}

#[tokio::test]
async fn test_answerer_failure_propagates_when_configured() {
    let server = test_server_with(ServerOptions {
        policy: AnswerErrorPolicy::Propagate,
        answerer: FakeAnswerer::failing("VLM sidecar unavailable"),
        ..Default::default()
    })
    .await;
    server.upload("street.png", &png_bytes(RED)).await;

    let (status, body) = ask(&server, "what is this?").await;

    assert_eq!(status, 500);
    assert_eq!(
        body,
        json!({
            "error": "Error processing question",
            "details": "VLM sidecar unavailable"
        })
    );
}

#[tokio::test]
async fn test_ask_missing_parameters() {
    let server = test_server().await;

    let (status, body) = server
        .post_json("/ask", json!({"filename": "street.png"}))
        .await;

    assert_eq!(status, 400);
    assert_eq!(body, json!({"error": "Missing required parameters"}));
}

#[tokio::test]
async fn test_ask_empty_question_is_missing() {
    let server = test_server().await;
    server.upload("street.png", &png_bytes(RED)).await;

    let (status, body) = ask(&server, "").await;

    assert_eq!(status, 400);
    assert_eq!(body, json!({"error": "Missing required parameters"}));
    assert!(server.answerer.questions().is_empty());
}

#[tokio::test]
async fn test_ask_unknown_file() {
    let server = test_server().await;

    let (status, body) = ask(&server, "what is this?").await;

    assert_eq!(status, 404);
    assert_eq!(body, json!({"error": "File not found"}));
}
