//! Setu - multi-provider LLM gateway
//!
//! One normalized request in, one canonical envelope out. Each mode owns an
//! ordered list of provider candidates; the fallback executor walks that list
//! until one answers, and every upstream quirk stays behind the adapters.

pub mod config;
pub mod error;
pub mod gateway;
pub mod providers;
pub mod routes;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

pub use crate::config::Config;
pub use crate::gateway::{CandidateCatalog, FallbackExecutor, Gateway};
pub use crate::providers::{HttpTransport, UpstreamTransport};

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    /// Read-only candidate lists, built once from the configured credentials
    pub catalog: Arc<CandidateCatalog>,
    pub gateway: Arc<Gateway>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        // Pooled client shared by every adapter; the timeout mirrors the
        // executor's per-attempt time box
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(32)
            .timeout(config.candidate_timeout())
            .build()?;
        let transport: Arc<dyn UpstreamTransport> = Arc::new(HttpTransport::with_client(http_client));

        let catalog = Arc::new(CandidateCatalog::from_config(&config));

        Ok(Self::assemble(config, catalog, transport))
    }

    /// Create an application state with an injected catalog and transport
    ///
    /// Integration tests point the catalog's adapters at wiremock servers.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn new_for_testing(
        config: Config,
        catalog: CandidateCatalog,
        transport: Arc<dyn UpstreamTransport>,
    ) -> Self {
        Self::assemble(config, Arc::new(catalog), transport)
    }

    fn assemble(
        config: Config,
        catalog: Arc<CandidateCatalog>,
        transport: Arc<dyn UpstreamTransport>,
    ) -> Self {
        let executor = FallbackExecutor::new(transport, config.candidate_timeout());
        let gateway = Arc::new(Gateway::new(catalog.clone(), executor));

        Self {
            config,
            start_time: Instant::now(),
            catalog,
            gateway,
        }
    }
}
