//! Hugging Face inference adapter
//!
//! Legacy text-generation endpoint. Takes one prompt string, so the
//! conversation is flattened into labelled turns.

use serde_json::{json, Value};

use super::{
    non_empty_text, parse_json, AnswerPayload, ExtractionError, FailureClass, ProviderAdapter,
    RequestView, UpstreamAuth, UpstreamRequest,
};
use crate::gateway::types::Role;

const DEFAULT_MAX_NEW_TOKENS: u32 = 512;

/// Adapter for `POST /models/{model}` text generation
pub struct HuggingFaceAdapter {
    base_url: String,
    token: String,
}

impl HuggingFaceAdapter {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Flatten the conversation into a single prompt
    pub fn flatten_prompt(view: &RequestView<'_>) -> String {
        let mut prompt = String::new();
        if let Some(instruction) = view.system_instruction {
            prompt.push_str("System: ");
            prompt.push_str(instruction);
            prompt.push('\n');
        }
        for entry in view.conversation.iter() {
            if entry.text.trim().is_empty() {
                continue;
            }
            let label = match entry.role {
                Role::User => "User",
                Role::Assistant => "Assistant",
                Role::System => "System",
            };
            prompt.push_str(label);
            prompt.push_str(": ");
            prompt.push_str(entry.text.trim());
            prompt.push('\n');
        }
        prompt.push_str("Assistant:");
        prompt
    }
}

impl ProviderAdapter for HuggingFaceAdapter {
    fn provider_id(&self) -> &'static str {
        "huggingface"
    }

    fn build_request(&self, model: &str, view: &RequestView<'_>) -> UpstreamRequest {
        let mut parameters = json!({
            "max_new_tokens": view.generation.max_output_tokens.unwrap_or(DEFAULT_MAX_NEW_TOKENS),
            "temperature": view.generation.temperature_or_default(),
            "return_full_text": false,
        });
        if let Some(top_p) = view.generation.top_p {
            parameters["top_p"] = json!(top_p);
        }

        UpstreamRequest {
            url: format!("{}/models/{}", self.base_url, model),
            auth: UpstreamAuth::Bearer(self.token.clone()),
            body: json!({
                "inputs": Self::flatten_prompt(view),
                "parameters": parameters,
            }),
        }
    }

    fn extract_answer(&self, body: &[u8]) -> Result<AnswerPayload, ExtractionError> {
        let value = parse_json(body)?;
        let generated = match &value {
            Value::Array(items) => items.first().and_then(|i| i.get("generated_text")),
            other => other.get("generated_text"),
        }
        .and_then(Value::as_str)
        .ok_or(ExtractionError::MissingField("generated_text"))?;

        non_empty_text(Some(generated.trim().to_string()))
    }

    fn classify_failure(&self, status: u16, body: &[u8]) -> FailureClass {
        match status {
            429 => FailureClass::Transient {
                retry_after_secs: None,
            },
            503 => {
                let Ok(value) = serde_json::from_slice::<Value>(body) else {
                    return FailureClass::Hard;
                };
                let loading = value
                    .get("error")
                    .and_then(Value::as_str)
                    .map(|e| e.to_ascii_lowercase().contains("loading"))
                    .unwrap_or(false);
                if !loading {
                    return FailureClass::Hard;
                }
                let retry_after_secs = value
                    .get("estimated_time")
                    .and_then(Value::as_f64)
                    .filter(|t| t.is_finite() && *t >= 0.0)
                    .map(|t| t.ceil() as u64);
                FailureClass::Transient { retry_after_secs }
            }
            _ => FailureClass::Hard,
        }
    }
}
