//! Core types for the gateway
//!
//! Defines the request envelope every provider adapter translates from, and
//! the closed set of modes the client may declare.

use std::borrow::Cow;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Client-declared intent selecting which capability class serves a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Plain chat
    Text,
    /// Step-by-step reasoning
    Reasoning,
    /// Image-conditioned chat
    Vision,
    /// Image generation
    Image,
    /// Short conversation title
    Title,
}

impl Mode {
    /// Every mode, in catalog order
    pub const ALL: [Mode; 5] = [
        Mode::Text,
        Mode::Reasoning,
        Mode::Vision,
        Mode::Image,
        Mode::Title,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Text => "text",
            Mode::Reasoning => "reasoning",
            Mode::Vision => "vision",
            Mode::Image => "image",
            Mode::Title => "title",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a declared mode falls outside the closed set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported mode: {0}")]
pub struct ModeUnsupported(pub String);

impl FromStr for Mode {
    type Err = ModeUnsupported;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Mode::Text),
            "reasoning" => Ok(Mode::Reasoning),
            "vision" => Ok(Mode::Vision),
            "image" => Ok(Mode::Image),
            "title" => Ok(Mode::Title),
            _ => Err(ModeUnsupported(s.to_string())),
        }
    }
}

/// Role of a conversation participant
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The learner
    User,
    /// A prior model answer replayed by the caller
    #[serde(alias = "model")]
    Assistant,
    /// Instructions embedded in the history
    System,
}

/// One turn in the caller-owned conversation history
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub role: Role,
    pub text: String,
    /// Data URL or raw base64 image attached to this turn
    pub image_ref: Option<String>,
}

impl HistoryEntry {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            image_ref: None,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            image_ref: None,
        }
    }

    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    fn has_image(&self) -> bool {
        self.image_ref
            .as_deref()
            .map(|r| !r.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Sampling knobs forwarded to providers that understand them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, alias = "maxTokens", skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
}

/// Default sampling temperature when the caller sends none
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

impl GenerationOptions {
    pub fn temperature_or_default(&self) -> f64 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }
}

/// Normalized request accepted from the client
///
/// `mode` keeps the raw declared value; the mode router decides whether it
/// belongs to the supported set.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEnvelope {
    pub mode: String,
    pub history: Vec<HistoryEntry>,
    pub prompt: Option<String>,
    pub system_instruction: Option<String>,
    pub generation: GenerationOptions,
}

impl RequestEnvelope {
    pub fn new(mode: impl Into<String>) -> Self {
        Self {
            mode: mode.into(),
            history: Vec::new(),
            prompt: None,
            system_instruction: None,
            generation: GenerationOptions::default(),
        }
    }

    pub fn with_history(mut self, history: Vec<HistoryEntry>) -> Self {
        self.history = history;
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Whether any history turn carries an image
    pub fn has_image(&self) -> bool {
        self.history.iter().any(HistoryEntry::has_image)
    }

    /// History followed by the free-text prompt as a final user turn
    pub fn conversation(&self) -> Cow<'_, [HistoryEntry]> {
        match non_blank(self.prompt.as_deref()) {
            None => Cow::Borrowed(&self.history),
            Some(prompt) => {
                let mut turns = self.history.clone();
                turns.push(HistoryEntry::user(prompt));
                Cow::Owned(turns)
            }
        }
    }

    /// Prompt for image generation: the free-text prompt, else the last turn's text
    pub fn image_prompt(&self) -> Option<&str> {
        non_blank(self.prompt.as_deref())
            .or_else(|| non_blank(self.history.last().map(|e| e.text.as_str())))
    }

    /// System instruction, if non-blank
    pub fn system_instruction(&self) -> Option<&str> {
        non_blank(self.system_instruction.as_deref())
    }

    /// Check the content invariants that depend on the resolved mode
    pub fn validate_for(&self, mode: Mode) -> Result<(), String> {
        match mode {
            Mode::Image => {
                if self.image_prompt().is_none() {
                    return Err(
                        "image mode requires a non-empty prompt or final message text".to_string(),
                    );
                }
            }
            // The title transcript is built from text alone
            Mode::Title => {
                let has_text = self
                    .conversation()
                    .iter()
                    .any(|e| e.role != Role::System && !e.text.trim().is_empty());
                if !has_text {
                    return Err("title mode requires conversation text".to_string());
                }
            }
            _ => {
                let has_content = self
                    .conversation()
                    .iter()
                    .any(|e| !e.text.trim().is_empty() || e.has_image());
                if !has_content {
                    return Err("request must contain messages or a prompt".to_string());
                }
            }
        }
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
