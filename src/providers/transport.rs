//! Upstream HTTP transport
//!
//! The fallback executor sends every built request through
//! [`UpstreamTransport`]; production uses [`HttpTransport`] over a pooled
//! reqwest client, tests plug in doubles.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, instrument};

use super::{headers::build_upstream_headers, UpstreamRequest};

/// Raw upstream response, status and body only
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failures below the HTTP status level
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Upstream request timed out")]
    Timeout,

    #[error("Connection to upstream failed: {0}")]
    Connect(String),

    #[error("Credential contains characters not allowed in a header")]
    InvalidCredential,

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Sends built requests to upstream providers
#[async_trait]
pub trait UpstreamTransport: Send + Sync {
    async fn send(&self, request: &UpstreamRequest) -> Result<UpstreamResponse, TransportError>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport with connection pooling and a per-request timeout
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(16)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UpstreamTransport for HttpTransport {
    #[instrument(skip(self, request), fields(url = %request.url))]
    async fn send(&self, request: &UpstreamRequest) -> Result<UpstreamResponse, TransportError> {
        let headers = build_upstream_headers(&request.auth)?;

        let response = self
            .client
            .post(&request.url)
            .headers(headers)
            .json(&request.body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout
                } else if e.is_connect() {
                    TransportError::Connect(e.to_string())
                } else {
                    TransportError::Http(e)
                }
            })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Http(e)
            }
        })?;

        debug!(status = %status, body_len = body.len(), "Received upstream response");

        Ok(UpstreamResponse { status, body })
    }
}
