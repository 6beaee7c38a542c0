//! Configuration management for Setu
//!
//! Configuration is loaded from environment variables once at startup and
//! passed by reference into the candidate catalog and the HTTP transport.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Environment variable holding the SiliconFlow API key
pub const SILICONFLOW_KEY_VAR: &str = "SILICONFLOW_KEY";
/// Environment variable holding the Hugging Face inference token
pub const HF_TOKEN_VAR: &str = "HF_TOKEN";
/// Environment variable holding the Google Gemini API key
pub const GEMINI_KEY_VAR: &str = "GEMINI_API_KEY";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// SiliconFlow OpenAI-compatible API base URL
    pub siliconflow_api_url: String,
    /// SiliconFlow API key
    pub siliconflow_api_key: Option<String>,

    /// Hugging Face inference API base URL
    pub hf_api_url: String,
    /// Hugging Face inference token
    pub hf_token: Option<String>,

    /// Gemini API base URL
    pub gemini_api_url: String,
    /// Gemini API key
    pub gemini_api_key: Option<String>,

    /// Upper bound on a single upstream attempt (in seconds)
    pub candidate_timeout_secs: u64,

    /// Emit JSON log lines instead of human-readable ones
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("SETU_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SETU_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid SETU_PORT")?,

            siliconflow_api_url: base_url("SILICONFLOW_API_URL", "https://api.siliconflow.cn/v1"),
            siliconflow_api_key: secret(SILICONFLOW_KEY_VAR),

            hf_api_url: base_url("HF_API_URL", "https://api-inference.huggingface.co"),
            hf_token: secret(HF_TOKEN_VAR),

            gemini_api_url: base_url(
                "GEMINI_API_URL",
                "https://generativelanguage.googleapis.com/v1beta",
            ),
            gemini_api_key: secret(GEMINI_KEY_VAR),

            candidate_timeout_secs: env::var("CANDIDATE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "25".to_string())
                .parse()
                .context("Invalid CANDIDATE_TIMEOUT_SECS")?,

            log_json: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }

    /// Per-attempt time box
    pub fn candidate_timeout(&self) -> Duration {
        Duration::from_secs(self.candidate_timeout_secs.max(1))
    }

    /// Names of the credential variables that are missing or blank
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.siliconflow_api_key.is_none() {
            missing.push(SILICONFLOW_KEY_VAR);
        }
        if self.hf_token.is_none() {
            missing.push(HF_TOKEN_VAR);
        }
        if self.gemini_api_key.is_none() {
            missing.push(GEMINI_KEY_VAR);
        }
        missing
    }
}

/// Read a base URL without its trailing slash
fn base_url(name: &str, default: &str) -> String {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .trim()
        .trim_end_matches('/')
        .to_string()
}

/// Read a secret, trimming whitespace picked up from copy-paste.
/// Blank values count as missing.
fn secret(name: &str) -> Option<String> {
    env::var(name).ok().and_then(|v| clean_secret(&v))
}

fn clean_secret(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
