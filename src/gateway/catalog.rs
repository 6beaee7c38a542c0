//! Candidate catalog
//!
//! Each mode owns an ordered candidate list: cheaper and faster models first,
//! more capable ones next, legacy fallbacks last. Candidates whose provider
//! has no credential are left out at startup, and the missing variable is
//! remembered so requests for an empty mode can report it.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{Config, GEMINI_KEY_VAR, HF_TOKEN_VAR, SILICONFLOW_KEY_VAR};
use crate::providers::{
    GeminiAdapter, HuggingFaceAdapter, ImagenAdapter, OpenAiCompatAdapter, ProviderAdapter,
};

use super::candidate::{Capabilities, ProviderCandidate};
use super::types::Mode;

/// Upstream families known to the default catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Upstream {
    SiliconFlow,
    Gemini,
    Imagen,
    HuggingFace,
}

impl Upstream {
    fn credential_var(self) -> &'static str {
        match self {
            Upstream::SiliconFlow => SILICONFLOW_KEY_VAR,
            Upstream::Gemini | Upstream::Imagen => GEMINI_KEY_VAR,
            Upstream::HuggingFace => HF_TOKEN_VAR,
        }
    }
}

type Entry = (Upstream, &'static str, Capabilities);

const TEXT: &[Entry] = &[
    (Upstream::SiliconFlow, "Qwen/Qwen2.5-7B-Instruct", Capabilities::chat()),
    (Upstream::Gemini, "gemini-1.5-flash", Capabilities::multimodal()),
    (Upstream::Gemini, "gemini-1.5-pro", Capabilities::multimodal()),
    (Upstream::Gemini, "gemini-pro", Capabilities::plain()),
    (Upstream::HuggingFace, "mistralai/Mistral-7B-Instruct-v0.2", Capabilities::plain()),
];

const REASONING: &[Entry] = &[
    (Upstream::SiliconFlow, "deepseek-ai/DeepSeek-R1-Distill-Qwen-7B", Capabilities::chat()),
    (Upstream::Gemini, "gemini-1.5-pro", Capabilities::multimodal()),
    (Upstream::SiliconFlow, "deepseek-ai/DeepSeek-R1", Capabilities::chat()),
    (Upstream::Gemini, "gemini-pro", Capabilities::plain()),
];

const VISION: &[Entry] = &[
    (Upstream::Gemini, "gemini-1.5-flash", Capabilities::multimodal()),
    (Upstream::SiliconFlow, "Qwen/Qwen2-VL-72B-Instruct", Capabilities::multimodal()),
    (Upstream::Gemini, "gemini-1.5-pro", Capabilities::multimodal()),
];

const IMAGE: &[Entry] = &[(
    Upstream::Imagen,
    "imagen-3.0-generate-001",
    Capabilities::image_generation(),
)];

const TITLE: &[Entry] = &[
    (Upstream::SiliconFlow, "Qwen/Qwen2.5-7B-Instruct", Capabilities::chat()),
    (Upstream::Gemini, "gemini-1.5-flash", Capabilities::multimodal()),
    (Upstream::Gemini, "gemini-pro", Capabilities::plain()),
];

fn default_entries(mode: Mode) -> &'static [Entry] {
    match mode {
        Mode::Text => TEXT,
        Mode::Reasoning => REASONING,
        Mode::Vision => VISION,
        Mode::Image => IMAGE,
        Mode::Title => TITLE,
    }
}

/// Process-wide, read-only candidate configuration
#[derive(Debug, Default)]
pub struct CandidateCatalog {
    lists: HashMap<Mode, Vec<ProviderCandidate>>,
    missing: HashMap<Mode, Vec<&'static str>>,
}

impl CandidateCatalog {
    /// An empty catalog, filled with [`CandidateCatalog::with_candidates`]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the default catalog from configured credentials
    pub fn from_config(config: &Config) -> Self {
        let siliconflow: Option<Arc<dyn ProviderAdapter>> =
            config.siliconflow_api_key.as_ref().map(|key| {
                Arc::new(OpenAiCompatAdapter::new(
                    "siliconflow",
                    config.siliconflow_api_url.clone(),
                    key.clone(),
                )) as Arc<dyn ProviderAdapter>
            });
        let gemini: Option<Arc<dyn ProviderAdapter>> = config.gemini_api_key.as_ref().map(|key| {
            Arc::new(GeminiAdapter::new(config.gemini_api_url.clone(), key.clone()))
                as Arc<dyn ProviderAdapter>
        });
        let imagen: Option<Arc<dyn ProviderAdapter>> = config.gemini_api_key.as_ref().map(|key| {
            Arc::new(ImagenAdapter::new(config.gemini_api_url.clone(), key.clone()))
                as Arc<dyn ProviderAdapter>
        });
        let huggingface: Option<Arc<dyn ProviderAdapter>> = config.hf_token.as_ref().map(|token| {
            Arc::new(HuggingFaceAdapter::new(config.hf_api_url.clone(), token.clone()))
                as Arc<dyn ProviderAdapter>
        });

        let adapter_for = |upstream: Upstream| -> Option<Arc<dyn ProviderAdapter>> {
            match upstream {
                Upstream::SiliconFlow => siliconflow.clone(),
                Upstream::Gemini => gemini.clone(),
                Upstream::Imagen => imagen.clone(),
                Upstream::HuggingFace => huggingface.clone(),
            }
        };

        for var in config.missing_credentials() {
            warn!(variable = %var, "Provider credential not set, its candidates are disabled");
        }

        let mut catalog = Self::empty();
        for mode in Mode::ALL {
            let mut candidates = Vec::new();
            let mut missing = Vec::new();
            for (upstream, model, capabilities) in default_entries(mode) {
                match adapter_for(*upstream) {
                    Some(adapter) => {
                        candidates.push(ProviderCandidate::new(adapter, *model, *capabilities))
                    }
                    None => {
                        let var = upstream.credential_var();
                        if !missing.contains(&var) {
                            missing.push(var);
                        }
                    }
                }
            }
            info!(mode = %mode, candidates = candidates.len(), "Candidate list configured");
            catalog.lists.insert(mode, candidates);
            catalog.missing.insert(mode, missing);
        }
        catalog
    }

    /// Replace the candidate list for a mode
    pub fn with_candidates(mut self, mode: Mode, candidates: Vec<ProviderCandidate>) -> Self {
        self.lists.insert(mode, candidates);
        self
    }

    /// Ordered candidates for a mode
    pub fn candidates(&self, mode: Mode) -> &[ProviderCandidate] {
        self.lists.get(&mode).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Credential variables whose absence removed candidates from a mode
    pub fn missing_credentials(&self, mode: Mode) -> &[&'static str] {
        self.missing.get(&mode).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Modes left without any candidate
    pub fn unconfigured_modes(&self) -> Vec<Mode> {
        Mode::ALL
            .into_iter()
            .filter(|mode| self.candidates(*mode).is_empty())
            .collect()
    }
}
