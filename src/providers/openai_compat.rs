//! OpenAI-compatible chat adapter
//!
//! Used for SiliconFlow, which exposes `/chat/completions` with the OpenAI
//! message format. Vision turns become multimodal content parts.

use serde_json::{json, Value};

use super::{
    image_ref::to_image_url, non_empty_text, parse_json, AnswerPayload, ExtractionError,
    ProviderAdapter, RequestView, UpstreamAuth, UpstreamRequest,
};
use crate::gateway::types::{HistoryEntry, Role};

/// Adapter for any `/chat/completions` endpoint
pub struct OpenAiCompatAdapter {
    provider_id: &'static str,
    base_url: String,
    api_key: String,
}

impl OpenAiCompatAdapter {
    pub fn new(
        provider_id: &'static str,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            provider_id,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn message(entry: &HistoryEntry) -> Value {
        let role = match entry.role {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        };
        match entry.image_ref.as_deref().filter(|r| !r.trim().is_empty()) {
            None => json!({ "role": role, "content": entry.text }),
            Some(image_ref) => {
                let mut parts = Vec::new();
                if !entry.text.trim().is_empty() {
                    parts.push(json!({ "type": "text", "text": entry.text }));
                }
                parts.push(json!({
                    "type": "image_url",
                    "image_url": { "url": to_image_url(image_ref) }
                }));
                json!({ "role": role, "content": parts })
            }
        }
    }
}

impl ProviderAdapter for OpenAiCompatAdapter {
    fn provider_id(&self) -> &'static str {
        self.provider_id
    }

    fn build_request(&self, model: &str, view: &RequestView<'_>) -> UpstreamRequest {
        let mut messages = Vec::with_capacity(view.conversation.len() + 1);
        if let Some(instruction) = view.system_instruction {
            messages.push(json!({ "role": "system", "content": instruction }));
        }
        messages.extend(view.conversation.iter().map(Self::message));

        let mut body = json!({
            "model": model,
            "messages": messages,
            "stream": false,
            "temperature": view.generation.temperature_or_default(),
        });
        if let Some(max) = view.generation.max_output_tokens {
            body["max_tokens"] = json!(max);
        }
        if let Some(top_p) = view.generation.top_p {
            body["top_p"] = json!(top_p);
        }

        UpstreamRequest {
            url: format!("{}/chat/completions", self.base_url),
            auth: UpstreamAuth::Bearer(self.api_key.clone()),
            body,
        }
    }

    fn extract_answer(&self, body: &[u8]) -> Result<AnswerPayload, ExtractionError> {
        let value = parse_json(body)?;
        let message = value
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .ok_or(ExtractionError::MissingField("choices[0].message"))?;

        let content = message
            .get("content")
            .and_then(Value::as_str)
            .filter(|c| !c.trim().is_empty())
            // Reasoning models can put everything in reasoning_content
            .or_else(|| message.get("reasoning_content").and_then(Value::as_str))
            .map(str::to_string);
        non_empty_text(content)
    }
}
