//! Mode routing
//!
//! Maps a request's declared mode to the ordered candidate list that should
//! serve it.

use std::sync::Arc;

use tracing::debug;

use super::candidate::ProviderCandidate;
use super::catalog::CandidateCatalog;
use super::types::{Mode, ModeUnsupported, RequestEnvelope};

/// Result of routing a request
#[derive(Debug)]
pub struct Route<'a> {
    /// Mode whose response shape the caller receives
    pub mode: Mode,
    /// Mode whose candidate list is used
    pub served_by: Mode,
    pub candidates: &'a [ProviderCandidate],
}

impl Route<'_> {
    /// Vision request without an image, served by the text chain
    pub fn downgraded(&self) -> bool {
        self.mode != self.served_by
    }
}

/// Mode router over the process-wide catalog
pub struct ModeRouter {
    catalog: Arc<CandidateCatalog>,
}

impl ModeRouter {
    pub fn new(catalog: Arc<CandidateCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &CandidateCatalog {
        &self.catalog
    }

    /// Pick the candidate list for an envelope
    ///
    /// Vision requests whose history carries no image fall back to the text
    /// list, so clients need not track whether a conversation still has one.
    pub fn route(&self, envelope: &RequestEnvelope) -> Result<Route<'_>, ModeUnsupported> {
        let mode: Mode = envelope.mode.parse()?;

        let served_by = match mode {
            Mode::Vision if !envelope.has_image() => {
                debug!("Vision request without image, downgrading to text candidates");
                Mode::Text
            }
            other => other,
        };

        Ok(Route {
            mode,
            served_by,
            candidates: self.catalog.candidates(served_by),
        })
    }
}
