//! Per-mode behaviour tests
//!
//! Image generation, vision downgrade and title cleanup through the full
//! router.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{create_test_server, Keys};
use crate::mocks::upstreams::MockUpstreams;

const IMAGEN_MODEL: &str = "imagen-3.0-generate-001";

#[tokio::test]
async fn test_image_mode_returns_base64_image() {
    let upstreams = MockUpstreams::start().await;
    upstreams.imagen_image(IMAGEN_MODEL, "iVBORw0KGgo=", 1).await;
    let server = create_test_server(&upstreams, Keys::ALL);

    let response = server
        .post("/api/gemini")
        .json(&json!({"mode": "image", "prompt": "Labelled diagram of a plant cell"}))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json, json!({"imageBase64": "iVBORw0KGgo="}));
}

#[tokio::test]
async fn test_image_failure_is_image_shaped_and_never_text() {
    let upstreams = MockUpstreams::start().await;
    upstreams.imagen_failure(IMAGEN_MODEL, 429, 1).await;
    upstreams
        .siliconflow_answer("Qwen/Qwen2.5-7B-Instruct", "a text description", 0)
        .await;
    upstreams.gemini_answer("gemini-1.5-flash", "a text description", 0).await;
    let server = create_test_server(&upstreams, Keys::ALL);

    let response = server
        .post("/api/gemini")
        .json(&json!({
            "mode": "image",
            "messages": [{"role": "user", "text": "Draw the water cycle"}]
        }))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["imageBase64"], Value::Null);
    assert!(json["advisory"].as_str().is_some());
    assert!(json.get("answerText").is_none());
}

#[tokio::test]
async fn test_vision_without_image_uses_text_chain() {
    let upstreams = MockUpstreams::start().await;
    upstreams
        .siliconflow_answer("Qwen/Qwen2.5-7B-Instruct", "from the text chain", 1)
        .await;
    upstreams
        .siliconflow_answer("Qwen/Qwen2-VL-72B-Instruct", "from the vision chain", 0)
        .await;
    upstreams.gemini_answer("gemini-1.5-flash", "from the vision chain", 0).await;
    let server = create_test_server(&upstreams, Keys::ALL);

    let response = server
        .post("/api/gemini")
        .json(&json!({
            "mode": "vision",
            "messages": [{"role": "user", "text": "What did we discuss about leaves?"}]
        }))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["answerText"], "from the text chain");
}

#[tokio::test]
async fn test_vision_with_image_uses_vision_chain() {
    let upstreams = MockUpstreams::start().await;
    upstreams
        .gemini_answer("gemini-1.5-flash", "This is a chloroplast.", 1)
        .await;
    upstreams
        .siliconflow_answer("Qwen/Qwen2.5-7B-Instruct", "from the text chain", 0)
        .await;
    let server = create_test_server(&upstreams, Keys::ALL);

    let response = server
        .post("/api/gemini")
        .json(&json!({
            "mode": "vision",
            "messages": [{
                "role": "user",
                "text": "What is this organelle?",
                "imageRef": "data:image/png;base64,iVBORw0KGgo="
            }]
        }))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["answerText"], "This is a chloroplast.");
}

#[tokio::test]
async fn test_title_is_cleaned_of_quotes() {
    let upstreams = MockUpstreams::start().await;
    upstreams
        .siliconflow_answer("Qwen/Qwen2.5-7B-Instruct", "'\"Photosynthesis Basics\"'", 1)
        .await;
    let server = create_test_server(&upstreams, Keys::ALL);

    let response = server
        .post("/api/gemini")
        .json(&json!({
            "mode": "title",
            "messages": [
                {"role": "user", "text": "How do plants make food?"},
                {"role": "assistant", "text": "Through photosynthesis."}
            ]
        }))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json, json!({"shortTitle": "Photosynthesis Basics"}));
}

#[tokio::test]
async fn test_title_exhaustion_keeps_title_shape() {
    let upstreams = MockUpstreams::start().await;
    upstreams
        .siliconflow_failure("Qwen/Qwen2.5-7B-Instruct", 500, 1)
        .await;
    upstreams.gemini_failure("gemini-1.5-flash", 500, 1).await;
    upstreams.gemini_failure("gemini-pro", 500, 1).await;
    let server = create_test_server(&upstreams, Keys::ALL);

    let response = server
        .post("/api/gemini")
        .json(&json!({"mode": "title", "prompt": "Newton's laws of motion"}))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert!(json["shortTitle"].as_str().is_some());
    assert!(json.get("answerText").is_none());
}
