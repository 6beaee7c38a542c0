//! Prometheus metrics endpoint
//!
//! Exposes request and upstream-attempt counters in Prometheus format.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use tracing::warn;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: Lazy<PrometheusHandle> = Lazy::new(|| {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    if metrics::set_global_recorder(recorder).is_err() {
        warn!("A metrics recorder is already installed, /metrics will be empty");
    }
    handle
});

/// Initialize metrics (call once at startup)
pub fn init_metrics() {
    Lazy::force(&PROMETHEUS_HANDLE);
    register_metrics();
}

fn register_metrics() {
    metrics::describe_counter!(
        "setu_requests_total",
        "Gateway requests by mode and outcome"
    );
    metrics::describe_counter!(
        "setu_upstream_attempts_total",
        "Upstream attempts by provider, model and result"
    );
    metrics::describe_histogram!(
        "setu_request_duration_seconds",
        "End-to-end gateway request duration in seconds"
    );
}

/// Prometheus metrics endpoint handler
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}

/// Record a finished gateway request
pub fn record_request(mode: &str, outcome: &str, duration_secs: f64) {
    metrics::counter!(
        "setu_requests_total",
        "mode" => mode.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
    metrics::histogram!("setu_request_duration_seconds", "mode" => mode.to_string())
        .record(duration_secs);
}

/// Record one upstream attempt
pub fn record_attempt(provider: &str, model: &str, result: &str) {
    metrics::counter!(
        "setu_upstream_attempts_total",
        "provider" => provider.to_string(),
        "model" => model.to_string(),
        "result" => result.to_string()
    )
    .increment(1);
}
