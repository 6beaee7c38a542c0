//! Provider candidates
//!
//! A candidate is one concrete (provider, model) pairing with a fixed
//! capability set. Candidates are built once at startup and never mutated.

use std::sync::Arc;

use crate::providers::{ProviderAdapter, RequestView, UpstreamRequest};

use super::types::RequestEnvelope;

/// What a candidate can accept and produce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub supports_system_instruction: bool,
    pub supports_image_input: bool,
    pub supports_image_output: bool,
}

impl Capabilities {
    /// Text-only chat that cannot take a system instruction
    pub const fn plain() -> Self {
        Self {
            supports_system_instruction: false,
            supports_image_input: false,
            supports_image_output: false,
        }
    }

    /// Text chat with a system instruction
    pub const fn chat() -> Self {
        Self {
            supports_system_instruction: true,
            supports_image_input: false,
            supports_image_output: false,
        }
    }

    /// Chat that also accepts images
    pub const fn multimodal() -> Self {
        Self {
            supports_system_instruction: true,
            supports_image_input: true,
            supports_image_output: false,
        }
    }

    /// Image generation
    pub const fn image_generation() -> Self {
        Self {
            supports_system_instruction: false,
            supports_image_input: false,
            supports_image_output: true,
        }
    }
}

/// One (provider, model) pairing eligible to serve a mode
pub struct ProviderCandidate {
    pub model_id: String,
    pub capabilities: Capabilities,
    adapter: Arc<dyn ProviderAdapter>,
}

impl ProviderCandidate {
    pub fn new(
        adapter: Arc<dyn ProviderAdapter>,
        model_id: impl Into<String>,
        capabilities: Capabilities,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            capabilities,
            adapter,
        }
    }

    pub fn provider_id(&self) -> &'static str {
        self.adapter.provider_id()
    }

    pub fn adapter(&self) -> &dyn ProviderAdapter {
        self.adapter.as_ref()
    }

    /// Capability-filtered view of the envelope
    pub fn view<'a>(&self, envelope: &'a RequestEnvelope) -> RequestView<'a> {
        RequestView {
            conversation: envelope.conversation(),
            system_instruction: if self.capabilities.supports_system_instruction {
                envelope.system_instruction()
            } else {
                None
            },
            image_prompt: envelope.image_prompt(),
            generation: &envelope.generation,
        }
    }

    /// Build the upstream request for this candidate
    ///
    /// The system instruction is dropped, not rejected, when the model cannot
    /// take one.
    pub fn build_request(&self, envelope: &RequestEnvelope) -> UpstreamRequest {
        self.adapter.build_request(&self.model_id, &self.view(envelope))
    }
}

impl std::fmt::Debug for ProviderCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCandidate")
            .field("provider_id", &self.provider_id())
            .field("model_id", &self.model_id)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}
