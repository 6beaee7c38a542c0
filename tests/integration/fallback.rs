//! Fallback order tests
//!
//! Each test mounts one mock per candidate with the exact number of calls it
//! must see, so a candidate tried out of order fails verification.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use setu::gateway::{CandidateCatalog, Capabilities, Mode, ProviderCandidate};
use setu::providers::GeminiAdapter;
use std::sync::Arc;

use crate::common::{create_test_server, create_test_server_with_catalog, test_config, Keys};
use crate::mocks::upstreams::{MockUpstreams, TEST_GEMINI_KEY};

fn text_request(question: &str) -> Value {
    json!({
        "mode": "text",
        "messages": [{"role": "user", "text": question}],
        "systemInstruction": "You are a patient tutor."
    })
}

#[tokio::test]
async fn test_first_candidate_success_skips_the_rest() {
    let upstreams = MockUpstreams::start().await;
    upstreams
        .siliconflow_answer("Qwen/Qwen2.5-7B-Instruct", "Cells are the unit of life.", 1)
        .await;
    upstreams.gemini_answer("gemini-1.5-flash", "unused", 0).await;
    let server = create_test_server(&upstreams, Keys::ALL);

    let response = server
        .post("/api/gemini")
        .json(&text_request("What is a cell?"))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json, json!({"answerText": "Cells are the unit of life."}));
}

#[tokio::test]
async fn test_failures_fall_through_in_order() {
    let upstreams = MockUpstreams::start().await;
    upstreams
        .siliconflow_failure("Qwen/Qwen2.5-7B-Instruct", 500, 1)
        .await;
    upstreams.gemini_failure("gemini-1.5-flash", 400, 1).await;
    upstreams
        .gemini_answer("gemini-1.5-pro", "Answer from the third candidate", 1)
        .await;
    upstreams.gemini_answer("gemini-pro", "unused", 0).await;
    let server = create_test_server(&upstreams, Keys::ALL);

    let response = server
        .post("/api/gemini")
        .json(&text_request("Explain gravity"))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["answerText"], "Answer from the third candidate");
}

#[tokio::test]
async fn test_all_candidates_failing_gives_goodwill_text() {
    let upstreams = MockUpstreams::start().await;
    upstreams
        .siliconflow_failure("Qwen/Qwen2.5-7B-Instruct", 500, 1)
        .await;
    upstreams.gemini_failure("gemini-1.5-flash", 500, 1).await;
    upstreams.gemini_failure("gemini-1.5-pro", 500, 1).await;
    upstreams.gemini_failure("gemini-pro", 404, 1).await;
    // No Hugging Face mock: wiremock answers 404
    let server = create_test_server(&upstreams, Keys::ALL);

    let response = server
        .post("/api/gemini")
        .json(&text_request("Explain gravity"))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    let answer = json["answerText"].as_str().unwrap();
    assert!(!answer.is_empty());
    assert!(!answer.contains("upstream failure"));
    assert!(json.get("retryable").is_none());
}

#[tokio::test]
async fn test_loading_model_yields_retryable_advisory() {
    let upstreams = MockUpstreams::start().await;
    upstreams
        .huggingface_loading("mistralai/Mistral-7B-Instruct-v0.2", 42.5, 1)
        .await;
    let server = create_test_server(
        &upstreams,
        Keys {
            siliconflow: false,
            huggingface: true,
            gemini: false,
        },
    );

    let response = server
        .post("/api/gemini")
        .json(&text_request("What is photosynthesis?"))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["retryable"], true);
    assert_eq!(json["retryAfterSecs"], 43);
    assert!(json["answerText"].as_str().unwrap().contains("43"));
}

#[tokio::test]
async fn test_slow_candidate_is_abandoned_after_time_box() {
    let upstreams = MockUpstreams::start().await;
    upstreams
        .gemini_slow_answer("slow-model", "too late", Duration::from_secs(3))
        .await;
    upstreams.gemini_answer("fast-model", "in time", 1).await;

    let adapter = Arc::new(GeminiAdapter::new(upstreams.gemini.uri(), TEST_GEMINI_KEY));
    let catalog = CandidateCatalog::empty().with_candidates(
        Mode::Text,
        vec![
            ProviderCandidate::new(adapter.clone(), "slow-model", Capabilities::multimodal()),
            ProviderCandidate::new(adapter, "fast-model", Capabilities::multimodal()),
        ],
    );
    let mut config = test_config(&upstreams, Keys::ALL);
    config.candidate_timeout_secs = 1;
    let server = create_test_server_with_catalog(config, catalog, Duration::from_secs(1));

    let response = server
        .post("/api/gemini")
        .json(&text_request("Quick question"))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["answerText"], "in time");
}
