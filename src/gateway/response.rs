//! Canonical response envelope
//!
//! The single outward-facing shape the client is coded against. Exactly one
//! variant is produced per request, chosen by mode, never by provider.

use serde::Serialize;

/// Response returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CanonicalResponse {
    Text(TextAnswer),
    Image(ImageAnswer),
    Title(TitleAnswer),
}

/// Answer for text, reasoning and vision modes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnswer {
    pub answer_text: String,
    /// Set when the caller should try again shortly
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

/// Answer for image mode
///
/// `image_base64` is null when generation failed; `advisory` then explains why
/// in a displayable form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnswer {
    pub image_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub retryable: bool,
}

/// Answer for title mode
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleAnswer {
    pub short_title: String,
}

impl CanonicalResponse {
    pub fn text(answer: impl Into<String>) -> Self {
        CanonicalResponse::Text(TextAnswer {
            answer_text: answer.into(),
            retryable: false,
            retry_after_secs: None,
        })
    }

    pub fn image(image_base64: String) -> Self {
        CanonicalResponse::Image(ImageAnswer {
            image_base64: Some(image_base64),
            advisory: None,
            retryable: false,
        })
    }

    pub fn title(short_title: impl Into<String>) -> Self {
        CanonicalResponse::Title(TitleAnswer {
            short_title: short_title.into(),
        })
    }

    /// Shape name, used for logs and metrics labels
    pub fn shape(&self) -> &'static str {
        match self {
            CanonicalResponse::Text(_) => "text",
            CanonicalResponse::Image(_) => "image",
            CanonicalResponse::Title(_) => "title",
        }
    }
}
