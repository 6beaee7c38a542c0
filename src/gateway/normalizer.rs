//! Response normalization
//!
//! Maps an [`ExecutionResult`] onto the canonical envelope for the requested
//! mode. The mapping depends only on the mode and the result kind, never on
//! which provider answered.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::providers::AnswerPayload;

use super::executor::{AttemptStatus, ExecutionResult};
use super::response::{CanonicalResponse, ImageAnswer, TextAnswer};
use super::types::Mode;

/// Reply for every text-shaped mode when no candidate could answer
pub const GOODWILL_TEXT: &str = "Maaf kijiye, abhi hamare saare AI tutors busy hain. \
Thodi der baad phir se poochiye. (Sorry, all our tutors are busy right now. Please ask again in a little while.)";

/// Reply for a mode outside the supported set
pub const UNSUPPORTED_MODE_TEXT: &str = "Yeh option abhi available nahi hai. \
Aap apna sawaal text mein pooch sakte hain. (This option is not available yet. You can ask your question as text.)";

/// Advisory when image generation fails
pub const IMAGE_ADVISORY: &str =
    "Diagram abhi nahi ban paaya. Kripya thodi der baad try karein. (The diagram could not be generated right now. Please try again later.)";

/// Title used when no candidate produced one
pub const DEFAULT_TITLE: &str = "New Chat";

/// Wait suggested when a transient upstream gave no estimate
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 20;

/// Upper bound on a cleaned title
const MAX_TITLE_CHARS: usize = 60;

const WRAPPING_QUOTES: &[char] = &['"', '\'', '`', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}'];

/// Build the canonical response for `mode` from an execution result
pub fn normalize(mode: Mode, result: ExecutionResult) -> CanonicalResponse {
    match result {
        ExecutionResult::Succeeded { outcome, .. } => match outcome.status {
            AttemptStatus::Succeeded(payload) => from_payload(mode, payload),
            // Succeeded always carries a successful outcome
            _ => exhausted(mode),
        },
        ExecutionResult::Transient {
            retry_after_secs, ..
        } => transient(mode, retry_after_secs.unwrap_or(DEFAULT_RETRY_AFTER_SECS)),
        ExecutionResult::Exhausted { .. } | ExecutionResult::Cancelled { .. } => exhausted(mode),
    }
}

/// Goodwill reply for an unrecognized mode
pub fn unsupported_mode() -> CanonicalResponse {
    CanonicalResponse::text(UNSUPPORTED_MODE_TEXT)
}

fn from_payload(mode: Mode, payload: AnswerPayload) -> CanonicalResponse {
    match (mode, payload) {
        (Mode::Image, AnswerPayload::Image(bytes)) => CanonicalResponse::image(STANDARD.encode(bytes)),
        (Mode::Image, AnswerPayload::Text(_)) => exhausted(Mode::Image),
        (Mode::Title, AnswerPayload::Text(text)) => {
            let title = clean_title(&text);
            if title.is_empty() {
                CanonicalResponse::title(DEFAULT_TITLE)
            } else {
                CanonicalResponse::title(title)
            }
        }
        (_, AnswerPayload::Text(text)) => CanonicalResponse::text(text.trim()),
        (mode, AnswerPayload::Image(_)) => exhausted(mode),
    }
}

fn exhausted(mode: Mode) -> CanonicalResponse {
    match mode {
        Mode::Image => CanonicalResponse::Image(ImageAnswer {
            image_base64: None,
            advisory: Some(IMAGE_ADVISORY.to_string()),
            retryable: false,
        }),
        Mode::Title => CanonicalResponse::title(DEFAULT_TITLE),
        Mode::Text | Mode::Reasoning | Mode::Vision => CanonicalResponse::text(GOODWILL_TEXT),
    }
}

fn transient(mode: Mode, wait_secs: u64) -> CanonicalResponse {
    match mode {
        Mode::Image => CanonicalResponse::Image(ImageAnswer {
            image_base64: None,
            advisory: Some(format!(
                "Image model abhi load ho raha hai. {} second baad phir try karein. (The image model is warming up, please retry in about {} seconds.)",
                wait_secs, wait_secs
            )),
            retryable: true,
        }),
        Mode::Title => CanonicalResponse::title(DEFAULT_TITLE),
        Mode::Text | Mode::Reasoning | Mode::Vision => CanonicalResponse::Text(TextAnswer {
            answer_text: format!(
                "AI tutor abhi taiyaar ho raha hai. Lagbhag {} second baad phir se poochiye. (The tutor is warming up, please ask again in about {} seconds.)",
                wait_secs, wait_secs
            ),
            retryable: true,
            retry_after_secs: Some(wait_secs),
        }),
    }
}

/// Reduce a model's title answer to a bare, single-line title
///
/// Takes the first non-blank line, then strips whitespace and wrapping quote
/// characters until the value stops changing.
pub fn clean_title(raw: &str) -> String {
    let first_line = raw
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");

    let mut current = first_line;
    loop {
        let next = current
            .trim()
            .trim_start_matches(WRAPPING_QUOTES)
            .trim_end_matches(WRAPPING_QUOTES)
            .trim()
            .trim_end_matches('.');
        if next == current {
            break;
        }
        current = next;
    }

    current.chars().take(MAX_TITLE_CHARS).collect::<String>().trim_end().to_string()
}
