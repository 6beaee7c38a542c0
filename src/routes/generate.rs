//! Gateway endpoint
//!
//! Accepts the client's normalized request and always answers with one
//! canonical envelope. Only malformed input, wrong methods and missing
//! configuration produce non-200 statuses.

use std::sync::Arc;
use std::time::Instant;

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    error::{AppError, AppResult},
    gateway::{CanonicalResponse, GatewayRequest, Mode},
    routes::metrics::record_request,
    AppState,
};

/// POST handler
///
/// The gateway runs on its own task. If the client disconnects, this future
/// is dropped, the drop guard cancels the token and the executor schedules no
/// further candidates.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<Json<CanonicalResponse>> {
    let start = Instant::now();

    let request: GatewayRequest =
        serde_json::from_slice(&body).map_err(|e| rejected(UNPARSED_MODE, start, e.into()))?;
    let envelope = request
        .into_envelope()
        .map_err(|msg| rejected(UNPARSED_MODE, start, AppError::InvalidRequest(msg)))?;
    let mode = mode_label(&envelope.mode);
    debug!(mode = %envelope.mode, turns = envelope.history.len(), "Parsed gateway request");

    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();

    let gateway = state.gateway.clone();
    let joined = tokio::spawn(async move { gateway.handle(envelope, cancel).await }).await;
    guard.disarm();

    let reply = joined
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Gateway task failed: {}", e)))
        .and_then(|handled| handled)
        .map_err(|e| rejected(mode, start, e))?;

    let duration = start.elapsed().as_secs_f64();
    record_request(reply.mode, reply.outcome, duration);
    info!(
        mode = reply.mode,
        outcome = reply.outcome,
        shape = reply.response.shape(),
        duration_ms = (duration * 1000.0) as u64,
        "Gateway request completed"
    );

    Ok(Json(reply.response))
}

/// Mode label for requests that never produced an envelope
const UNPARSED_MODE: &str = "invalid";

/// Metric label for a declared mode
fn mode_label(mode: &str) -> &'static str {
    mode.parse::<Mode>()
        .map(|m| m.as_str())
        .unwrap_or("unsupported")
}

/// Count a request that ends in an error status and pass the error on
fn rejected(mode: &'static str, start: Instant, err: AppError) -> AppError {
    let duration = start.elapsed().as_secs_f64();
    record_request(mode, err.metric_label(), duration);
    debug!(mode, outcome = err.metric_label(), error = %err, "Gateway request rejected");
    err
}

/// CORS preflight
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Any method other than POST and OPTIONS
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
