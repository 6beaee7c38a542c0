//! Inbound request body
//!
//! Accepts the structured `messages` history as well as the Gemini-shaped
//! `contents` array older clients still send, and folds both into a
//! [`RequestEnvelope`].

use serde::Deserialize;

use super::types::{GenerationOptions, HistoryEntry, RequestEnvelope, Role};

/// JSON body posted by the client
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayRequest {
    /// Declared mode (required)
    #[serde(default)]
    pub mode: Option<String>,
    /// Structured conversation history
    #[serde(default)]
    pub messages: Option<Vec<WireMessage>>,
    /// Gemini-shaped history, used when `messages` is absent
    #[serde(default)]
    pub contents: Option<Vec<LegacyContent>>,
    /// Flat prompt string
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub system_instruction: Option<SystemInstruction>,
    #[serde(default, alias = "generationOptions")]
    pub generation_config: Option<GenerationOptions>,
}

/// A message in the structured history
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMessage {
    pub role: Role,
    #[serde(default, alias = "content")]
    pub text: String,
    #[serde(default)]
    pub image_ref: Option<String>,
}

/// A Gemini `contents` entry
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyContent {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub parts: Vec<LegacyPart>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// System instruction as a plain string or Gemini's `{parts:[{text}]}` object
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SystemInstruction {
    Text(String),
    Parts { parts: Vec<LegacyPart> },
}

impl SystemInstruction {
    fn into_text(self) -> String {
        match self {
            SystemInstruction::Text(text) => text,
            SystemInstruction::Parts { parts } => join_text(&parts),
        }
    }
}

impl LegacyContent {
    fn into_entry(self) -> HistoryEntry {
        let image_ref = self
            .parts
            .iter()
            .find_map(|p| p.inline_data.as_ref())
            .map(|d| format!("data:{};base64,{}", d.mime_type, d.data));
        HistoryEntry {
            role: self.role.unwrap_or(Role::User),
            text: join_text(&self.parts),
            image_ref,
        }
    }
}

fn join_text(parts: &[LegacyPart]) -> String {
    parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect::<Vec<_>>()
        .join("\n")
}

impl GatewayRequest {
    /// Convert the wire body into an envelope
    ///
    /// Fails only when `mode` is missing or blank; whether the mode is
    /// supported is the router's decision.
    pub fn into_envelope(self) -> Result<RequestEnvelope, String> {
        let mode = self
            .mode
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .ok_or_else(|| "mode is required".to_string())?;

        let history = match (self.messages, self.contents) {
            (Some(messages), _) => messages
                .into_iter()
                .map(|m| HistoryEntry {
                    role: m.role,
                    text: m.text,
                    image_ref: m.image_ref,
                })
                .collect(),
            (None, Some(contents)) => contents.into_iter().map(LegacyContent::into_entry).collect(),
            (None, None) => Vec::new(),
        };

        Ok(RequestEnvelope {
            mode,
            history,
            prompt: self.prompt,
            system_instruction: self.system_instruction.map(SystemInstruction::into_text),
            generation: self.generation_config.unwrap_or_default(),
        })
    }
}
