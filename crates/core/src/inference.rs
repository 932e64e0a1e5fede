//! InferenceProvider trait — the abstraction over the language-model backend.
//!
//! The orchestrator hands the provider a compiled system prompt and the
//! conversation window and gets text back. Everything about how the model is
//! reached (local Ollama server, remote API, a stub in tests) lives behind
//! this trait.

use crate::error::InferenceError;
use crate::turn::Turn;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One inference call's inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceRequest {
    /// The compiled system prompt for this turn.
    pub system_prompt: String,

    /// Conversation window, oldest first, ending with the user's latest turn.
    pub history: Vec<Turn>,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Optional generation cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.6
}

impl InferenceRequest {
    pub fn new(system_prompt: impl Into<String>, history: Vec<Turn>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            history,
            temperature: default_temperature(),
            max_tokens: None,
        }
    }
}

/// A completed inference response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceResponse {
    /// The generated reply text.
    pub content: String,

    /// Which model produced it.
    pub model: String,
}

/// The language-model seam.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// A human-readable name for this provider (e.g. "ollama").
    fn name(&self) -> &str;

    /// Run one inference call.
    async fn infer(
        &self,
        request: InferenceRequest,
    ) -> std::result::Result<InferenceResponse, InferenceError>;

    /// Health check — can we reach the backend?
    async fn health_check(&self) -> std::result::Result<bool, InferenceError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoProvider;

    #[async_trait]
    impl InferenceProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn infer(
            &self,
            request: InferenceRequest,
        ) -> std::result::Result<InferenceResponse, InferenceError> {
            let last = request
                .history
                .last()
                .map(|t| t.content.clone())
                .unwrap_or_default();
            Ok(InferenceResponse {
                content: last,
                model: "echo".into(),
            })
        }
    }

    #[tokio::test]
    async fn provider_trait_object_is_usable() {
        let provider: Box<dyn InferenceProvider> = Box::new(EchoProvider);
        let request =
            InferenceRequest::new("system", vec![Turn::user("hello")]);
        let response = provider.infer(request).await.unwrap();
        assert_eq!(response.content, "hello");
        assert!(provider.health_check().await.unwrap());
    }

    #[test]
    fn request_defaults() {
        let request = InferenceRequest::new("sys", vec![]);
        assert!((request.temperature - 0.6).abs() < f32::EPSILON);
        assert!(request.max_tokens.is_none());
    }
}
