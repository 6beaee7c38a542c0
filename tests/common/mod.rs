//! Common test utilities for Setu
//!
//! Builds configs and test servers wired to the mock upstreams.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum_test::TestServer;
use setu::{routes, AppState, CandidateCatalog, Config, HttpTransport};

use crate::mocks::upstreams::{
    MockUpstreams, TEST_GEMINI_KEY, TEST_HF_TOKEN, TEST_SILICONFLOW_KEY,
};

/// Which provider credentials a test config carries
#[derive(Debug, Clone, Copy)]
pub struct Keys {
    pub siliconflow: bool,
    pub huggingface: bool,
    pub gemini: bool,
}

impl Keys {
    pub const ALL: Keys = Keys {
        siliconflow: true,
        huggingface: true,
        gemini: true,
    };

    pub const NONE: Keys = Keys {
        siliconflow: false,
        huggingface: false,
        gemini: false,
    };
}

/// Config pointing every provider at its mock server
pub fn test_config(upstreams: &MockUpstreams, keys: Keys) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        siliconflow_api_url: upstreams.siliconflow.uri(),
        siliconflow_api_key: keys.siliconflow.then(|| TEST_SILICONFLOW_KEY.to_string()),
        hf_api_url: upstreams.huggingface.uri(),
        hf_token: keys.huggingface.then(|| TEST_HF_TOKEN.to_string()),
        gemini_api_url: upstreams.gemini.uri(),
        gemini_api_key: keys.gemini.then(|| TEST_GEMINI_KEY.to_string()),
        candidate_timeout_secs: 5,
        log_json: false,
    }
}

/// Test server over the default catalog built from `keys`
pub fn create_test_server(upstreams: &MockUpstreams, keys: Keys) -> TestServer {
    let state = AppState::new(test_config(upstreams, keys)).expect("Failed to build app state");
    TestServer::new(routes::create_router(Arc::new(state))).expect("Failed to create test server")
}

/// Test server over a hand-built catalog and a short per-attempt timeout
pub fn create_test_server_with_catalog(
    config: Config,
    catalog: CandidateCatalog,
    attempt_timeout: Duration,
) -> TestServer {
    let transport =
        Arc::new(HttpTransport::new(attempt_timeout).expect("Failed to build transport"));
    let state = AppState::new_for_testing(config, catalog, transport);
    TestServer::new(routes::create_router(Arc::new(state))).expect("Failed to create test server")
}
