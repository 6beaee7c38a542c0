//! Health check endpoints
//!
//! - `/health` - Full report with candidates per mode
//! - `/health/ready` - Readiness probe, fails while a mode has no candidate
//! - `/health/live` - Liveness probe

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::gateway::Mode;
use crate::AppState;

/// Health status enum
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Candidate summary for one mode
#[derive(Debug, Serialize)]
pub struct ModeReport {
    pub candidates: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_credentials: Vec<&'static str>,
}

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub timestamp: String,
    pub modes: BTreeMap<&'static str, ModeReport>,
}

/// Simple health response for liveness/readiness
#[derive(Debug, Serialize)]
pub struct SimpleHealthResponse {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unconfigured_modes: Vec<&'static str>,
}

fn unconfigured_modes(state: &AppState) -> Vec<&'static str> {
    state
        .catalog
        .unconfigured_modes()
        .into_iter()
        .map(|mode| mode.as_str())
        .collect()
}

/// Full health check endpoint
///
/// Degraded when some modes have no candidate, unhealthy when none has.
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let modes: BTreeMap<&'static str, ModeReport> = Mode::ALL
        .into_iter()
        .map(|mode| {
            let report = ModeReport {
                candidates: state
                    .catalog
                    .candidates(mode)
                    .iter()
                    .map(|c| format!("{}/{}", c.provider_id(), c.model_id))
                    .collect(),
                missing_credentials: state.catalog.missing_credentials(mode).to_vec(),
            };
            (mode.as_str(), report)
        })
        .collect();

    let unconfigured = unconfigured_modes(&state).len();
    let status = if unconfigured == 0 {
        HealthStatus::Healthy
    } else if unconfigured < Mode::ALL.len() {
        HealthStatus::Degraded
    } else {
        HealthStatus::Unhealthy
    };

    let status_code = match status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        modes,
    };

    (status_code, Json(response))
}

/// Readiness probe endpoint
///
/// Returns 503 listing the modes that have no candidate.
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<SimpleHealthResponse>) {
    let unconfigured = unconfigured_modes(&state);

    if !unconfigured.is_empty() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(SimpleHealthResponse {
                status: HealthStatus::Unhealthy,
                unconfigured_modes: unconfigured,
            }),
        );
    }

    (
        StatusCode::OK,
        Json(SimpleHealthResponse {
            status: HealthStatus::Healthy,
            unconfigured_modes: Vec::new(),
        }),
    )
}

/// Liveness probe endpoint
pub async fn liveness_check() -> (StatusCode, Json<SimpleHealthResponse>) {
    (
        StatusCode::OK,
        Json(SimpleHealthResponse {
            status: HealthStatus::Healthy,
            unconfigured_modes: Vec::new(),
        }),
    )
}
