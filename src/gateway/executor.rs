//! Fallback executor
//!
//! Walks a mode's candidate list strictly in order. Every attempt is
//! time-boxed and any failure (network error, non-2xx status, unusable body)
//! is recorded and folded into the next attempt; the first success ends the
//! walk.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::providers::{body_snippet, AnswerPayload, FailureClass, UpstreamTransport};
use crate::routes::metrics::record_attempt;

use super::candidate::ProviderCandidate;
use super::logging::RequestContext;
use super::types::{Mode, RequestEnvelope};

/// Characters of an upstream error body kept in a failure reason
const FAILURE_SNIPPET_CHARS: usize = 100;

/// How one attempt ended
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptStatus {
    Succeeded(AnswerPayload),
    /// Hard failure; try the next candidate
    Failed(String),
    /// Upstream asked us to come back later
    Transient {
        reason: String,
        retry_after_secs: Option<u64>,
    },
    /// Candidate was not eligible for this request
    Skipped(String),
}

/// Record of a single candidate attempt
#[derive(Debug, Clone)]
pub struct AttemptOutcome {
    pub provider_id: &'static str,
    pub model_id: String,
    pub status: AttemptStatus,
    pub elapsed: Duration,
}

impl AttemptOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self.status, AttemptStatus::Succeeded(_))
    }

    pub fn answer_text(&self) -> Option<&str> {
        match &self.status {
            AttemptStatus::Succeeded(AnswerPayload::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn image_bytes(&self) -> Option<&[u8]> {
        match &self.status {
            AttemptStatus::Succeeded(AnswerPayload::Image(bytes)) => Some(bytes),
            _ => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match &self.status {
            AttemptStatus::Succeeded(_) => None,
            AttemptStatus::Failed(reason)
            | AttemptStatus::Skipped(reason)
            | AttemptStatus::Transient { reason, .. } => Some(reason),
        }
    }

    fn result_label(&self) -> &'static str {
        match self.status {
            AttemptStatus::Succeeded(_) => "success",
            AttemptStatus::Failed(_) => "failure",
            AttemptStatus::Transient { .. } => "transient",
            AttemptStatus::Skipped(_) => "skipped",
        }
    }
}

/// Terminal state of a fallback walk
#[derive(Debug, Clone)]
pub enum ExecutionResult {
    /// First success; earlier failures are kept for logging only
    Succeeded {
        outcome: AttemptOutcome,
        failures: Vec<AttemptOutcome>,
    },
    /// Nothing succeeded but at least one upstream was warming up or throttled
    Transient {
        retry_after_secs: Option<u64>,
        failures: Vec<AttemptOutcome>,
    },
    /// Every candidate failed
    Exhausted { failures: Vec<AttemptOutcome> },
    /// Caller went away before a candidate succeeded
    Cancelled { failures: Vec<AttemptOutcome> },
}

impl ExecutionResult {
    pub fn failures(&self) -> &[AttemptOutcome] {
        match self {
            ExecutionResult::Succeeded { failures, .. }
            | ExecutionResult::Transient { failures, .. }
            | ExecutionResult::Exhausted { failures }
            | ExecutionResult::Cancelled { failures } => failures,
        }
    }

    /// Label for metrics
    pub fn label(&self) -> &'static str {
        match self {
            ExecutionResult::Succeeded { .. } => "success",
            ExecutionResult::Transient { .. } => "transient",
            ExecutionResult::Exhausted { .. } => "exhausted",
            ExecutionResult::Cancelled { .. } => "cancelled",
        }
    }
}

/// Why a candidate may not serve this request, if it may not
fn ineligibility(mode: Mode, envelope: &RequestEnvelope, candidate: &ProviderCandidate) -> Option<&'static str> {
    let caps = candidate.capabilities;
    if mode == Mode::Image {
        if !caps.supports_image_output {
            return Some("image request needs an image-generating candidate");
        }
        return None;
    }
    if caps.supports_image_output {
        return Some("image-generating candidate cannot answer a text request");
    }
    if envelope.has_image() && !caps.supports_image_input {
        return Some("request carries an image the candidate cannot read");
    }
    None
}

/// Sequential fallback executor
pub struct FallbackExecutor {
    transport: Arc<dyn UpstreamTransport>,
    attempt_timeout: Duration,
}

impl FallbackExecutor {
    pub fn new(transport: Arc<dyn UpstreamTransport>, attempt_timeout: Duration) -> Self {
        Self {
            transport,
            attempt_timeout,
        }
    }

    /// Try candidates in order until one succeeds
    ///
    /// Once `cancel` fires no further candidate is started; an attempt already
    /// in flight runs to completion and its result is discarded.
    pub async fn execute(
        &self,
        mode: Mode,
        envelope: &RequestEnvelope,
        candidates: &[ProviderCandidate],
        cancel: &CancellationToken,
        ctx: &RequestContext,
    ) -> ExecutionResult {
        let mut failures = Vec::new();

        for (position, candidate) in candidates.iter().enumerate() {
            if cancel.is_cancelled() {
                ctx.log_cancelled(failures.len());
                return ExecutionResult::Cancelled { failures };
            }

            if let Some(reason) = ineligibility(mode, envelope, candidate) {
                ctx.log_attempt_skipped(candidate.provider_id(), &candidate.model_id, reason);
                failures.push(AttemptOutcome {
                    provider_id: candidate.provider_id(),
                    model_id: candidate.model_id.clone(),
                    status: AttemptStatus::Skipped(reason.to_string()),
                    elapsed: Duration::ZERO,
                });
                continue;
            }

            ctx.log_attempt_start(candidate.provider_id(), &candidate.model_id, position);
            let outcome = self.attempt(candidate, envelope).await;
            record_attempt(outcome.provider_id, &outcome.model_id, outcome.result_label());

            if cancel.is_cancelled() {
                ctx.log_cancelled(failures.len() + 1);
                failures.push(outcome);
                return ExecutionResult::Cancelled { failures };
            }

            match &outcome.status {
                AttemptStatus::Succeeded(_) => {
                    ctx.log_success(outcome.provider_id, &outcome.model_id, failures.len());
                    return ExecutionResult::Succeeded { outcome, failures };
                }
                AttemptStatus::Transient { retry_after_secs, .. } => {
                    ctx.log_attempt_transient(outcome.provider_id, &outcome.model_id, *retry_after_secs);
                }
                AttemptStatus::Failed(reason) => {
                    ctx.log_attempt_failed(outcome.provider_id, &outcome.model_id, reason, outcome.elapsed);
                }
                AttemptStatus::Skipped(_) => {}
            }
            failures.push(outcome);
        }

        let transient_hints: Vec<Option<u64>> = failures
            .iter()
            .filter_map(|f| match f.status {
                AttemptStatus::Transient { retry_after_secs, .. } => Some(retry_after_secs),
                _ => None,
            })
            .collect();

        ctx.log_exhausted(failures.len(), !transient_hints.is_empty());

        if transient_hints.is_empty() {
            ExecutionResult::Exhausted { failures }
        } else {
            // Shortest known wait
            let retry_after_secs = transient_hints.into_iter().flatten().min();
            ExecutionResult::Transient {
                retry_after_secs,
                failures,
            }
        }
    }

    /// Run one time-boxed attempt; never returns an error
    async fn attempt(&self, candidate: &ProviderCandidate, envelope: &RequestEnvelope) -> AttemptOutcome {
        let started = Instant::now();
        let request = candidate.build_request(envelope);

        let status = match tokio::time::timeout(self.attempt_timeout, self.transport.send(&request)).await {
            Err(_) => AttemptStatus::Failed(format!(
                "timed out after {}s",
                self.attempt_timeout.as_secs_f32()
            )),
            Ok(Err(e)) => AttemptStatus::Failed(e.to_string()),
            Ok(Ok(response)) if !response.is_success() => {
                let snippet = body_snippet(&response.body, FAILURE_SNIPPET_CHARS);
                let reason = format!("HTTP {}: {}", response.status, snippet);
                match candidate.adapter().classify_failure(response.status, &response.body) {
                    FailureClass::Transient { retry_after_secs } => AttemptStatus::Transient {
                        reason,
                        retry_after_secs,
                    },
                    FailureClass::Hard => AttemptStatus::Failed(reason),
                }
            }
            Ok(Ok(response)) => match candidate.adapter().extract_answer(&response.body) {
                Ok(payload) => AttemptStatus::Succeeded(payload),
                Err(e) => AttemptStatus::Failed(e.to_string()),
            },
        };

        AttemptOutcome {
            provider_id: candidate.provider_id(),
            model_id: candidate.model_id.clone(),
            status,
            elapsed: started.elapsed(),
        }
    }
}
