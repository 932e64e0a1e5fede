//! Language-model providers for KICAI.
//!
//! The only production provider is a local Ollama server; anything that
//! implements [`kicai_core::inference::InferenceProvider`] plugs into the
//! session the same way.

pub mod ollama;

pub use ollama::OllamaProvider;

use kicai_config::AssistantConfig;
use kicai_core::error::InferenceError;
use kicai_core::inference::InferenceProvider;
use std::sync::Arc;

/// Build the provider described by the configuration.
pub fn from_config(config: &AssistantConfig) -> Result<Arc<dyn InferenceProvider>, InferenceError> {
    let provider = OllamaProvider::new(config.ollama_url.clone(), config.model.clone())?;
    Ok(Arc::new(provider))
}
