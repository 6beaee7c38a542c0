//! Request shaping for title mode
//!
//! A title request carries the conversation to be named. It is rewritten into a
//! single instruction turn so every candidate, including ones without system
//! instruction support, sees the same task.

use super::types::{GenerationOptions, HistoryEntry, RequestEnvelope, Role};

pub const TITLE_INSTRUCTION: &str = "You name study conversations. Reply with a short title of at most \
six words that captures the topic. Reply with the title only: no quotes, no punctuation at the end, \
no explanation.";

const TITLE_TEMPERATURE: f64 = 0.3;
const TITLE_MAX_TOKENS: u32 = 24;

/// Characters of transcript fed to the title model
const MAX_TRANSCRIPT_CHARS: usize = 2000;

/// Rewrite a title request into a single user turn with tight sampling
pub fn shape_title_request(envelope: &RequestEnvelope) -> RequestEnvelope {
    let transcript: String = envelope
        .conversation()
        .iter()
        .filter(|turn| turn.role != Role::System && !turn.text.trim().is_empty())
        .map(|turn| {
            let speaker = match turn.role {
                Role::Assistant => "Tutor",
                _ => "Student",
            };
            format!("{}: {}", speaker, turn.text.trim())
        })
        .collect::<Vec<_>>()
        .join("\n");
    let transcript: String = transcript.chars().take(MAX_TRANSCRIPT_CHARS).collect();

    RequestEnvelope {
        mode: envelope.mode.clone(),
        history: vec![HistoryEntry::user(format!(
            "{}\n\nConversation:\n{}\n\nTitle:",
            TITLE_INSTRUCTION, transcript
        ))],
        prompt: None,
        system_instruction: None,
        generation: GenerationOptions {
            temperature: Some(TITLE_TEMPERATURE),
            max_output_tokens: Some(TITLE_MAX_TOKENS),
            top_p: None,
        },
    }
}
