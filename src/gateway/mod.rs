//! The gateway core
//!
//! Route, execute, normalize. [`Gateway::handle`] is the single entry point the
//! HTTP boundary calls once it has parsed a request envelope.

pub mod candidate;
pub mod catalog;
pub mod executor;
pub mod logging;
pub mod normalizer;
pub mod prompts;
pub mod request;
pub mod response;
pub mod router;
pub mod types;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{warn, Instrument};

use crate::error::{AppError, AppResult};

pub use candidate::{Capabilities, ProviderCandidate};
pub use catalog::CandidateCatalog;
pub use executor::{AttemptOutcome, AttemptStatus, ExecutionResult, FallbackExecutor};
pub use logging::RequestContext;
pub use request::GatewayRequest;
pub use response::CanonicalResponse;
pub use router::{ModeRouter, Route};
pub use types::{GenerationOptions, HistoryEntry, Mode, RequestEnvelope, Role};

/// Outcome of one gateway call, with the labels the boundary records
#[derive(Debug)]
pub struct GatewayReply {
    pub response: CanonicalResponse,
    /// Mode label for metrics; `unsupported` for modes outside the set
    pub mode: &'static str,
    /// Execution outcome label for metrics
    pub outcome: &'static str,
}

/// Mode router plus fallback executor
pub struct Gateway {
    router: ModeRouter,
    executor: FallbackExecutor,
}

impl Gateway {
    pub fn new(catalog: Arc<CandidateCatalog>, executor: FallbackExecutor) -> Self {
        Self {
            router: ModeRouter::new(catalog),
            executor,
        }
    }

    pub fn catalog(&self) -> &CandidateCatalog {
        self.router.catalog()
    }

    /// Serve one request envelope
    ///
    /// Errors only for invalid input or an unconfigured mode; every upstream
    /// failure is folded into the returned canonical response.
    pub async fn handle(
        &self,
        envelope: RequestEnvelope,
        cancel: CancellationToken,
    ) -> AppResult<GatewayReply> {
        let route = match self.router.route(&envelope) {
            Ok(route) => route,
            Err(unsupported) => {
                warn!(mode = %unsupported.0, "Unsupported mode, replying with goodwill text");
                return Ok(GatewayReply {
                    response: normalizer::unsupported_mode(),
                    mode: "unsupported",
                    outcome: "unsupported",
                });
            }
        };

        envelope
            .validate_for(route.mode)
            .map_err(AppError::InvalidRequest)?;

        if route.candidates.is_empty() {
            let missing = self.catalog().missing_credentials(route.served_by);
            let message = if missing.is_empty() {
                format!("No providers configured for mode '{}'", route.mode)
            } else {
                format!(
                    "No providers configured for mode '{}': set {}",
                    route.mode,
                    missing.join(", ")
                )
            };
            return Err(AppError::Configuration(message));
        }

        let ctx = RequestContext::new(route.mode.as_str());
        ctx.log_request_start(route.candidates.len(), route.downgraded());

        let envelope = match route.mode {
            Mode::Title => prompts::shape_title_request(&envelope),
            _ => envelope,
        };

        let result = self
            .executor
            .execute(route.mode, &envelope, route.candidates, &cancel, &ctx)
            .instrument(ctx.create_span())
            .await;
        let outcome = result.label();

        Ok(GatewayReply {
            response: normalizer::normalize(route.mode, result),
            mode: route.mode.as_str(),
            outcome,
        })
    }
}
