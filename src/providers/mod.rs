//! Provider adapters
//!
//! Each adapter knows how to turn a [`RequestView`] into the JSON one upstream
//! API expects and how to pull a plain answer back out of its response. The
//! fallback loop only ever talks to the [`ProviderAdapter`] trait, so adding a
//! provider means registering a new adapter in the catalog.

pub mod gemini;
pub mod headers;
pub mod huggingface;
pub mod image_ref;
pub mod openai_compat;
pub mod transport;

use std::borrow::Cow;

use thiserror::Error;

use crate::gateway::types::{GenerationOptions, HistoryEntry};

pub use gemini::{GeminiAdapter, ImagenAdapter};
pub use huggingface::HuggingFaceAdapter;
pub use openai_compat::OpenAiCompatAdapter;
pub use transport::{HttpTransport, TransportError, UpstreamResponse, UpstreamTransport};

/// How an upstream request authenticates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamAuth {
    /// `Authorization: Bearer <token>`
    Bearer(String),
    /// A provider-specific key header such as `x-goog-api-key`
    ApiKeyHeader { name: &'static str, value: String },
}

/// Fully-built upstream call, ready for the transport
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    pub url: String,
    pub auth: UpstreamAuth,
    pub body: serde_json::Value,
}

/// What a candidate sees of the request after capability filtering
#[derive(Debug, Clone)]
pub struct RequestView<'a> {
    pub conversation: Cow<'a, [HistoryEntry]>,
    /// Already dropped when the candidate cannot take one
    pub system_instruction: Option<&'a str>,
    pub image_prompt: Option<&'a str>,
    pub generation: &'a GenerationOptions,
}

/// Answer extracted from a successful upstream response
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerPayload {
    Text(String),
    Image(Vec<u8>),
}

/// Why an otherwise successful response could not be used
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    #[error("Response body is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Missing field in response: {0}")]
    MissingField(&'static str),

    #[error("Upstream returned an empty answer")]
    Empty,

    #[error("Invalid image payload: {0}")]
    InvalidImage(String),
}

/// Classification of a non-success upstream status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Worth retrying shortly (model warming up, rate limited)
    Transient { retry_after_secs: Option<u64> },
    /// Move on to the next candidate
    Hard,
}

/// Translation layer for one upstream provider family
pub trait ProviderAdapter: Send + Sync {
    /// Provider identifier for logs and metrics
    fn provider_id(&self) -> &'static str;

    /// Build the upstream request for `model`
    ///
    /// Pure translation; never fails for a well-formed envelope.
    fn build_request(&self, model: &str, view: &RequestView<'_>) -> UpstreamRequest;

    /// Extract the answer from a 2xx response body
    fn extract_answer(&self, body: &[u8]) -> Result<AnswerPayload, ExtractionError>;

    /// Decide whether a non-2xx response is transient
    fn classify_failure(&self, status: u16, _body: &[u8]) -> FailureClass {
        if status == 429 {
            FailureClass::Transient {
                retry_after_secs: None,
            }
        } else {
            FailureClass::Hard
        }
    }
}

/// Parse a response body as JSON
pub(crate) fn parse_json(body: &[u8]) -> Result<serde_json::Value, ExtractionError> {
    serde_json::from_slice(body).map_err(|e| ExtractionError::InvalidJson(e.to_string()))
}

/// Require non-blank extracted text
pub(crate) fn non_empty_text(text: Option<String>) -> Result<AnswerPayload, ExtractionError> {
    match text {
        Some(t) if !t.trim().is_empty() => Ok(AnswerPayload::Text(t)),
        _ => Err(ExtractionError::Empty),
    }
}

/// First `max` characters of a body, for failure reasons
pub fn body_snippet(body: &[u8], max: usize) -> String {
    String::from_utf8_lossy(body).chars().take(max).collect()
}
