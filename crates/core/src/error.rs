//! Error types for the KICAI domain.
//!
//! Uses `thiserror` for ergonomic error definitions. The taxonomy encodes the
//! propagation policy: pricing errors are recovered inside the pricing client
//! (degrade to demo data, never chat-visible), while inference errors are the
//! one class allowed to reach the caller. Config persistence errors live in
//! `kicai-config` next to the code that produces them.

use thiserror::Error;

/// Failures of the external language-model call.
#[derive(Debug, Clone, Error)]
pub enum InferenceError {
    #[error("Cannot connect to the model server: {0}")]
    ConnectionRefused(String),

    #[error("Model call timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Model server error: {message} (status: {status_code})")]
    Api { status_code: u16, message: String },

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),
}

/// Failures of the external pricing tool protocol.
///
/// `Transport` and `Timeout` are transient and worth one retry;
/// `Protocol` and `Unauthorized` describe a well-formed refusal and are not.
#[derive(Debug, Clone, Error)]
pub enum PricingError {
    #[error("Pricing transport failure: {0}")]
    Transport(String),

    #[error("Pricing call timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Malformed pricing response: {0}")]
    Protocol(String),

    #[error("Pricing service rejected credentials: {0}")]
    Unauthorized(String),
}

impl PricingError {
    /// Whether a single retry is warranted.
    pub fn is_transient(&self) -> bool {
        matches!(self, PricingError::Transport(_) | PricingError::Timeout { .. })
    }
}
