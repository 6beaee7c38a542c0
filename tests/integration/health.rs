//! Health endpoint integration tests
//!
//! - GET /health - Full report with candidates per mode
//! - GET /health/ready - Readiness probe
//! - GET /health/live - Liveness probe
//! - GET /metrics - Prometheus text

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{create_test_server, Keys};
use crate::mocks::upstreams::MockUpstreams;

#[tokio::test]
async fn test_liveness_always_ok() {
    let upstreams = MockUpstreams::start().await;
    let server = create_test_server(&upstreams, Keys::NONE);

    let response = server.get("/health/live").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json, json!({"status": "healthy"}));
}

#[tokio::test]
async fn test_readiness_ok_when_every_mode_configured() {
    let upstreams = MockUpstreams::start().await;
    let server = create_test_server(&upstreams, Keys::ALL);

    let response = server.get("/health/ready").await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_readiness_lists_unconfigured_modes() {
    let upstreams = MockUpstreams::start().await;
    let server = create_test_server(
        &upstreams,
        Keys {
            siliconflow: true,
            huggingface: false,
            gemini: false,
        },
    );

    let response = server.get("/health/ready").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json: Value = response.json();
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["unconfigured_modes"], json!(["image"]));
}

#[tokio::test]
async fn test_full_health_reports_candidates() {
    let upstreams = MockUpstreams::start().await;
    let server = create_test_server(&upstreams, Keys::ALL);

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(
        json["modes"]["image"]["candidates"],
        json!(["gemini/imagen-3.0-generate-001"])
    );
    assert_eq!(json["modes"]["text"]["candidates"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_full_health_unhealthy_without_any_key() {
    let upstreams = MockUpstreams::start().await;
    let server = create_test_server(&upstreams, Keys::NONE);

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json: Value = response.json();
    assert_eq!(json["modes"]["text"]["missing_credentials"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_metrics_endpoint_serves_text() {
    let upstreams = MockUpstreams::start().await;
    let server = create_test_server(&upstreams, Keys::ALL);
    setu::routes::metrics::init_metrics();

    let response = server.get("/metrics").await;

    response.assert_status_ok();
}
