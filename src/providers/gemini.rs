//! Google Gemini adapters
//!
//! `GeminiAdapter` speaks `generateContent` for chat-style modes and
//! `ImagenAdapter` speaks the Imagen `predict` endpoint for image generation.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};

use super::{
    image_ref::{is_remote_url, remote_mime_type, InlineImage},
    non_empty_text, parse_json, AnswerPayload, ExtractionError, FailureClass, ProviderAdapter,
    RequestView, UpstreamAuth, UpstreamRequest,
};
use crate::gateway::types::Role;

/// Header Gemini reads the API key from
pub const GEMINI_KEY_HEADER: &str = "x-goog-api-key";

/// Prompt used if an image request somehow reaches the adapter without one
const FALLBACK_IMAGE_PROMPT: &str = "Educational diagram";

/// Gemini `generateContent` adapter
pub struct GeminiAdapter {
    base_url: String,
    api_key: String,
}

impl GeminiAdapter {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn contents(view: &RequestView<'_>) -> Vec<Value> {
        view.conversation
            .iter()
            .filter_map(|entry| {
                let mut parts = Vec::new();
                if !entry.text.trim().is_empty() {
                    parts.push(json!({ "text": entry.text }));
                }
                if let Some(image_ref) = entry.image_ref.as_deref().filter(|r| !r.trim().is_empty()) {
                    if is_remote_url(image_ref) {
                        let uri = image_ref.trim();
                        parts.push(json!({
                            "fileData": { "mimeType": remote_mime_type(uri), "fileUri": uri }
                        }));
                    } else {
                        let image = InlineImage::parse(image_ref);
                        parts.push(json!({
                            "inlineData": { "mimeType": image.mime_type, "data": image.data }
                        }));
                    }
                }
                if parts.is_empty() {
                    return None;
                }
                // Gemini has no system role inside contents
                let role = match entry.role {
                    Role::Assistant => "model",
                    Role::User | Role::System => "user",
                };
                Some(json!({ "role": role, "parts": parts }))
            })
            .collect()
    }
}

impl ProviderAdapter for GeminiAdapter {
    fn provider_id(&self) -> &'static str {
        "gemini"
    }

    fn build_request(&self, model: &str, view: &RequestView<'_>) -> UpstreamRequest {
        let mut generation_config = json!({ "temperature": view.generation.temperature_or_default() });
        if let Some(max) = view.generation.max_output_tokens {
            generation_config["maxOutputTokens"] = json!(max);
        }
        if let Some(top_p) = view.generation.top_p {
            generation_config["topP"] = json!(top_p);
        }

        let mut body = json!({
            "contents": Self::contents(view),
            "generationConfig": generation_config,
        });
        if let Some(instruction) = view.system_instruction {
            body["systemInstruction"] = json!({ "parts": [{ "text": instruction }] });
        }

        UpstreamRequest {
            url: format!("{}/models/{}:generateContent", self.base_url, model),
            auth: UpstreamAuth::ApiKeyHeader {
                name: GEMINI_KEY_HEADER,
                value: self.api_key.clone(),
            },
            body,
        }
    }

    fn extract_answer(&self, body: &[u8]) -> Result<AnswerPayload, ExtractionError> {
        let value = parse_json(body)?;
        let parts = value
            .get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(Value::as_array)
            .ok_or(ExtractionError::MissingField("candidates[0].content.parts"))?;

        let text: String = parts
            .iter()
            .filter_map(|p| p.get("text").and_then(Value::as_str))
            .collect();
        non_empty_text(Some(text))
    }

    fn classify_failure(&self, status: u16, _body: &[u8]) -> FailureClass {
        match status {
            // 503 is Gemini's "model is overloaded"
            429 | 503 => FailureClass::Transient {
                retry_after_secs: None,
            },
            _ => FailureClass::Hard,
        }
    }
}

/// Imagen `predict` adapter
pub struct ImagenAdapter {
    base_url: String,
    api_key: String,
}

impl ImagenAdapter {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

impl ProviderAdapter for ImagenAdapter {
    fn provider_id(&self) -> &'static str {
        "gemini"
    }

    fn build_request(&self, model: &str, view: &RequestView<'_>) -> UpstreamRequest {
        let prompt = view.image_prompt.unwrap_or(FALLBACK_IMAGE_PROMPT);
        UpstreamRequest {
            url: format!("{}/models/{}:predict", self.base_url, model),
            auth: UpstreamAuth::ApiKeyHeader {
                name: GEMINI_KEY_HEADER,
                value: self.api_key.clone(),
            },
            body: json!({
                "instances": [{ "prompt": prompt }],
                "parameters": { "sampleCount": 1, "aspectRatio": "1:1" },
            }),
        }
    }

    fn extract_answer(&self, body: &[u8]) -> Result<AnswerPayload, ExtractionError> {
        let value = parse_json(body)?;
        let prediction = value
            .get("predictions")
            .and_then(|p| p.get(0))
            .ok_or(ExtractionError::MissingField("predictions[0]"))?;

        let encoded = prediction
            .get("bytesBase64Encoded")
            .or_else(|| prediction.get("image").and_then(|i| i.get("bytesBase64Encoded")))
            .and_then(Value::as_str)
            .ok_or(ExtractionError::MissingField("predictions[0].bytesBase64Encoded"))?;

        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| ExtractionError::InvalidImage(e.to_string()))?;
        if bytes.is_empty() {
            return Err(ExtractionError::Empty);
        }
        Ok(AnswerPayload::Image(bytes))
    }
}
