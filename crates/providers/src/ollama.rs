//! Ollama provider — local model inference over the `/api/generate` endpoint.

use async_trait::async_trait;
use kicai_core::error::InferenceError;
use kicai_core::inference::{InferenceProvider, InferenceRequest, InferenceResponse};
use kicai_core::turn::Role;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Context window, in tokens, requested from the model. Sized for small
/// local models like llama3.2:3b.
const NUM_CTX: u32 = 4096;

/// Hard cap on one generate round trip. Local generation on CPU can be slow,
/// so this is generous; the session applies its own tighter deadline.
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Provider backed by a local Ollama server.
pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_ctx: u32,
    top_p: f32,
    repeat_penalty: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    model: String,
}

impl OllamaProvider {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, InferenceError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                InferenceError::ConnectionRefused(format!("failed to build HTTP client: {e}"))
            })?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    pub fn with_default_url(model: impl Into<String>) -> Result<Self, InferenceError> {
        Self::new(DEFAULT_BASE_URL, model)
    }

    /// Flatten the request into Ollama's single-prompt shape: the compiled
    /// system prompt (which already carries the conversation recap) followed
    /// by the user's latest question.
    fn render_prompt(request: &InferenceRequest) -> String {
        let question = request
            .history
            .iter()
            .rev()
            .find(|turn| turn.role == Role::User)
            .map(|turn| turn.content.as_str())
            .unwrap_or("");
        format!(
            "{}\n\n## User question\n{}\n\nAnswer:",
            request.system_prompt, question
        )
    }

    fn map_request_error(&self, e: reqwest::Error) -> InferenceError {
        if e.is_connect() {
            InferenceError::ConnectionRefused(format!(
                "is Ollama running at {}? ({e})",
                self.base_url
            ))
        } else if e.is_timeout() {
            InferenceError::Timeout {
                timeout_secs: REQUEST_TIMEOUT_SECS,
            }
        } else {
            InferenceError::MalformedResponse(e.to_string())
        }
    }
}

#[async_trait]
impl InferenceProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn infer(
        &self,
        request: InferenceRequest,
    ) -> std::result::Result<InferenceResponse, InferenceError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt: Self::render_prompt(&request),
            stream: false,
            options: GenerateOptions {
                temperature: request.temperature,
                num_ctx: NUM_CTX,
                top_p: 0.9,
                repeat_penalty: 1.1,
                num_predict: request.max_tokens,
            },
        };

        tracing::debug!(model = %self.model, "Sending generate request to Ollama");

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(InferenceError::Api {
                status_code: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::MalformedResponse(e.to_string()))?;

        Ok(InferenceResponse {
            content: parsed.response,
            model: if parsed.model.is_empty() {
                self.model.clone()
            } else {
                parsed.model
            },
        })
    }

    async fn health_check(&self) -> std::result::Result<bool, InferenceError> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;
        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kicai_core::turn::Turn;

    #[test]
    fn prompt_ends_with_latest_user_question() {
        let request = InferenceRequest::new(
            "You are a PCB assistant.",
            vec![
                Turn::user("first question"),
                Turn::assistant("first answer"),
                Turn::user("what about decoupling?"),
            ],
        );
        let prompt = OllamaProvider::render_prompt(&request);
        assert!(prompt.starts_with("You are a PCB assistant."));
        assert!(prompt.contains("## User question\nwhat about decoupling?"));
        assert!(prompt.ends_with("Answer:"));
    }

    #[test]
    fn generate_request_shape() {
        let body = GenerateRequest {
            model: "llama3.2:3b",
            prompt: "hello".into(),
            stream: false,
            options: GenerateOptions {
                temperature: 0.6,
                num_ctx: NUM_CTX,
                top_p: 0.9,
                repeat_penalty: 1.1,
                num_predict: None,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "llama3.2:3b");
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["num_ctx"], 4096);
        assert!(json["options"].get("num_predict").is_none());
    }

    #[test]
    fn provider_construction_succeeds() {
        let provider = OllamaProvider::new("http://localhost:11434", "llama3.2:3b").unwrap();
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.base_url, "http://localhost:11434");
    }

    #[test]
    fn empty_history_renders_empty_question() {
        let request = InferenceRequest::new("system", vec![]);
        let prompt = OllamaProvider::render_prompt(&request);
        assert!(prompt.contains("## User question\n\n"));
    }
}
