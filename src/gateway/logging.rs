//! Request logging utilities
//!
//! Provides structured logging with a short correlation ID so every attempt in
//! a fallback chain can be traced back to the inbound request.

use std::time::{Duration, Instant};
use tracing::{debug, info, warn, Span};
use uuid::Uuid;

/// Context for tracking a request through the fallback chain
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request (for log correlation)
    pub trace_id: String,
    /// When the request started
    pub start_time: Instant,
    /// Mode as declared by the caller
    pub mode: String,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(mode: &str) -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string()[..8].to_string(), // Short ID for readability
            start_time: Instant::now(),
            mode: mode.to_string(),
        }
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    /// Log request initiation
    pub fn log_request_start(&self, candidates: usize, downgraded: bool) {
        info!(
            trace_id = %self.trace_id,
            mode = %self.mode,
            candidates = %candidates,
            downgraded = %downgraded,
            "Request started"
        );
    }

    /// Log an attempt being sent upstream
    pub fn log_attempt_start(&self, provider: &str, model: &str, position: usize) {
        debug!(
            trace_id = %self.trace_id,
            provider = %provider,
            model = %model,
            position = %position,
            elapsed_ms = %self.elapsed_ms(),
            "Trying candidate"
        );
    }

    /// Log a candidate skipped for lacking a capability
    pub fn log_attempt_skipped(&self, provider: &str, model: &str, reason: &str) {
        debug!(
            trace_id = %self.trace_id,
            provider = %provider,
            model = %model,
            reason = %reason,
            "Candidate skipped"
        );
    }

    /// Log a failed attempt
    pub fn log_attempt_failed(&self, provider: &str, model: &str, reason: &str, took: Duration) {
        warn!(
            trace_id = %self.trace_id,
            provider = %provider,
            model = %model,
            reason = %reason,
            attempt_ms = %took.as_millis(),
            "Candidate failed"
        );
    }

    /// Log a transient upstream condition
    pub fn log_attempt_transient(&self, provider: &str, model: &str, retry_after_secs: Option<u64>) {
        warn!(
            trace_id = %self.trace_id,
            provider = %provider,
            model = %model,
            retry_after_secs = ?retry_after_secs,
            "Candidate temporarily unavailable"
        );
    }

    /// Log the winning attempt
    pub fn log_success(&self, provider: &str, model: &str, failed_before: usize) {
        info!(
            trace_id = %self.trace_id,
            mode = %self.mode,
            provider = %provider,
            model = %model,
            failed_before = %failed_before,
            elapsed_ms = %self.elapsed_ms(),
            "Request served"
        );
    }

    /// Log that every candidate failed
    pub fn log_exhausted(&self, attempts: usize, transient: bool) {
        warn!(
            trace_id = %self.trace_id,
            mode = %self.mode,
            attempts = %attempts,
            transient = %transient,
            elapsed_ms = %self.elapsed_ms(),
            "All candidates failed"
        );
    }

    /// Log that the caller went away
    pub fn log_cancelled(&self, attempts: usize) {
        info!(
            trace_id = %self.trace_id,
            mode = %self.mode,
            attempts = %attempts,
            "Caller disconnected, no further candidates scheduled"
        );
    }

    /// Create a tracing span for this request
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "gateway_request",
            trace_id = %self.trace_id,
            mode = %self.mode,
        )
    }
}
