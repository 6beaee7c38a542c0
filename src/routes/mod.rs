//! HTTP routes for Setu
//!
//! The gateway endpoint plus health and metrics.

pub mod generate;
pub mod health;
pub mod metrics;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use crate::AppState;

/// Primary gateway path
pub const GATEWAY_PATH: &str = "/api/gemini";
/// Path kept for clients still pointed at the old serverless function
pub const LEGACY_GATEWAY_PATH: &str = "/.netlify/functions/gemini";

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let gateway = post(generate::generate)
        .options(generate::preflight)
        .fallback(generate::method_not_allowed);

    let gateway_routes = Router::new()
        .route(GATEWAY_PATH, gateway.clone())
        .route(LEGACY_GATEWAY_PATH, gateway);

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(metrics::prometheus_metrics));

    Router::new()
        .merge(public_routes)
        .merge(gateway_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        // Every response, errors included, carries the CORS headers
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .with_state(state)
}
