//! Gateway endpoint tests
//!
//! Method handling, CORS headers and request validation on
//! `/api/gemini` and its legacy alias.

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{create_test_server, Keys};
use crate::mocks::upstreams::MockUpstreams;

fn assert_cors(response: &axum_test::TestResponse) {
    let header = |name: &str| response.header(name).to_str().unwrap().to_string();
    assert_eq!(header("access-control-allow-origin"), "*");
    assert_eq!(header("access-control-allow-methods"), "POST, OPTIONS");
    assert_eq!(header("access-control-allow-headers"), "Content-Type");
}

#[tokio::test]
async fn test_options_preflight_returns_ok_with_cors() {
    let upstreams = MockUpstreams::start().await;
    let server = create_test_server(&upstreams, Keys::ALL);

    let response = server.method(Method::OPTIONS, "/api/gemini").await;

    response.assert_status_ok();
    assert_cors(&response);
}

#[tokio::test]
async fn test_get_is_method_not_allowed() {
    let upstreams = MockUpstreams::start().await;
    let server = create_test_server(&upstreams, Keys::ALL);

    let response = server.get("/api/gemini").await;

    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    assert_cors(&response);
    let json: Value = response.json();
    assert_eq!(json["error"]["code"], "METHOD_NOT_ALLOWED");
}

#[tokio::test]
async fn test_invalid_json_is_bad_request() {
    let upstreams = MockUpstreams::start().await;
    let server = create_test_server(&upstreams, Keys::ALL);

    let response = server.post("/api/gemini").text("{not json").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_cors(&response);
    let json: Value = response.json();
    assert_eq!(json["error"]["code"], "INVALID_JSON");
}

#[tokio::test]
async fn test_missing_mode_is_bad_request() {
    let upstreams = MockUpstreams::start().await;
    let server = create_test_server(&upstreams, Keys::ALL);

    let response = server
        .post("/api/gemini")
        .json(&json!({"prompt": "What is osmosis?"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["error"]["code"], "INVALID_REQUEST");
    assert_eq!(json["error"]["message"], "mode is required");
}

#[tokio::test]
async fn test_empty_text_request_is_bad_request() {
    let upstreams = MockUpstreams::start().await;
    let server = create_test_server(&upstreams, Keys::ALL);

    let response = server
        .post("/api/gemini")
        .json(&json!({"mode": "text", "messages": []}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_mode_gets_goodwill_text_without_upstream_calls() {
    let upstreams = MockUpstreams::start().await;
    let server = create_test_server(&upstreams, Keys::ALL);

    let response = server
        .post("/api/gemini")
        .json(&json!({"mode": "unknown", "prompt": "hello"}))
        .await;

    response.assert_status_ok();
    assert_cors(&response);
    let json: Value = response.json();
    assert!(!json["answerText"].as_str().unwrap().is_empty());
    assert!(upstreams.gemini.received_requests().await.unwrap().is_empty());
    assert!(upstreams.siliconflow.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_legacy_path_serves_gemini_contents_body() {
    let upstreams = MockUpstreams::start().await;
    upstreams
        .siliconflow_answer("Qwen/Qwen2.5-7B-Instruct", "Namaste!", 1)
        .await;
    let server = create_test_server(&upstreams, Keys::ALL);

    let response = server
        .post("/.netlify/functions/gemini")
        .json(&json!({
            "mode": "text",
            "contents": [{"role": "user", "parts": [{"text": "Say hello"}]}],
            "systemInstruction": "Answer in Hinglish.",
            "generationConfig": {"temperature": 0.5}
        }))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json, json!({"answerText": "Namaste!"}));
}

#[tokio::test]
async fn test_missing_credential_is_configuration_error() {
    let upstreams = MockUpstreams::start().await;
    let server = create_test_server(
        &upstreams,
        Keys {
            siliconflow: true,
            huggingface: true,
            gemini: false,
        },
    );

    let response = server
        .post("/api/gemini")
        .json(&json!({"mode": "image", "prompt": "Diagram of the water cycle"}))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = response.json();
    assert_eq!(json["error"]["code"], "CONFIGURATION_ERROR");
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("GEMINI_API_KEY"));
}

#[tokio::test]
async fn test_error_paths_are_counted_in_metrics() {
    let upstreams = MockUpstreams::start().await;
    let server = create_test_server(
        &upstreams,
        Keys {
            siliconflow: true,
            huggingface: true,
            gemini: false,
        },
    );
    setu::routes::metrics::init_metrics();

    server
        .post("/api/gemini")
        .text("{not json")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .post("/api/gemini")
        .json(&json!({"mode": "image", "prompt": "Diagram of the water cycle"}))
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let metrics = server.get("/metrics").await.text();
    let counted = |mode: &str, outcome: &str| {
        metrics.lines().any(|line| {
            line.starts_with("setu_requests_total{")
                && line.contains(&format!("mode=\"{}\"", mode))
                && line.contains(&format!("outcome=\"{}\"", outcome))
        })
    };
    assert!(counted("invalid", "rejected"), "{}", metrics);
    assert!(counted("image", "unconfigured"), "{}", metrics);
}
