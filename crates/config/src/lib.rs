//! Configuration resolution and persistence for KICAI.
//!
//! Settings live in `~/.kicai/config.toml`. Resolution order for the pricing
//! credential, first match wins:
//!
//! 1. `api_key` persisted in the config file
//! 2. the `KICAI_NEXAR_TOKEN` / `NEXAR_TOKEN` environment variables
//! 3. demo mode (no credential)
//!
//! The config is resolved once at session start and cached by the caller for
//! the session's lifetime. Saving is atomic: write to a temp file, then
//! rename over the old one, so a crash mid-write cannot corrupt the previous
//! valid configuration.

use kicai_core::mode::{InteractionMode, Language};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.kicai/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Pricing service credential. Never logged in cleartext.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Force synthetic pricing data even when a credential is present.
    #[serde(default = "default_true")]
    pub demo_mode: bool,

    /// Reply language.
    #[serde(default)]
    pub language: Language,

    /// Default interaction mode for new sessions.
    #[serde(default)]
    pub ai_mode: InteractionMode,

    /// Local model server base URL.
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    /// Model to run.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Conversation window capacity in turns.
    #[serde(default = "default_context_capacity")]
    pub context_capacity: usize,

    /// Pricing tool protocol endpoint.
    #[serde(default = "default_pricing_endpoint")]
    pub pricing_endpoint: String,

    /// Hard timeout for one pricing round trip, in seconds.
    #[serde(default = "default_pricing_timeout")]
    pub pricing_timeout_secs: u64,

    /// Distributor ordering used to break price ties, highest priority first.
    #[serde(default = "default_distributor_priority")]
    pub distributor_priority: Vec<String>,
}

fn default_true() -> bool {
    true
}
fn default_ollama_url() -> String {
    "http://localhost:11434".into()
}
fn default_model() -> String {
    "llama3.2:3b".into()
}
fn default_temperature() -> f32 {
    0.6
}
fn default_context_capacity() -> usize {
    20
}
fn default_pricing_endpoint() -> String {
    "https://api.nexar.com/rpc".into()
}
fn default_pricing_timeout() -> u64 {
    5
}
fn default_distributor_priority() -> Vec<String> {
    vec![
        "Digi-Key".into(),
        "Mouser".into(),
        "Farnell".into(),
        "Newark".into(),
        "Arrow".into(),
    ]
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            demo_mode: true,
            language: Language::default(),
            ai_mode: InteractionMode::default(),
            ollama_url: default_ollama_url(),
            model: default_model(),
            temperature: default_temperature(),
            context_capacity: default_context_capacity(),
            pricing_endpoint: default_pricing_endpoint(),
            pricing_timeout_secs: default_pricing_timeout(),
            distributor_priority: default_distributor_priority(),
        }
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("api_key", &redact(&self.api_key))
            .field("demo_mode", &self.demo_mode)
            .field("language", &self.language)
            .field("ai_mode", &self.ai_mode)
            .field("ollama_url", &self.ollama_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("context_capacity", &self.context_capacity)
            .field("pricing_endpoint", &self.pricing_endpoint)
            .field("pricing_timeout_secs", &self.pricing_timeout_secs)
            .field("distributor_priority", &self.distributor_priority)
            .finish()
    }
}

impl AssistantConfig {
    /// Resolve configuration from the default path plus environment fallback.
    pub fn resolve() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path())?;

        // Environment credential fallback, only when the file carries no key
        if config.api_key.is_none() {
            config.api_key = std::env::var("KICAI_NEXAR_TOKEN")
                .ok()
                .or_else(|| std::env::var("NEXAR_TOKEN").ok())
                .filter(|v| !v.trim().is_empty());
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save to the default path. See [`AssistantConfig::save_to`].
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    /// Atomically persist this configuration.
    ///
    /// Write-to-temp then rename: either the whole new file lands, or the
    /// previous file survives untouched. On failure the in-memory config is
    /// unchanged and the error is returned to the caller.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        let io_err = |e: std::io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        let dir = path.parent().ok_or_else(|| ConfigError::Write {
            path: path.to_path_buf(),
            reason: "config path has no parent directory".into(),
        })?;
        std::fs::create_dir_all(dir).map_err(io_err)?;

        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Write {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, content).map_err(io_err)?;
        std::fs::rename(&tmp, path).map_err(io_err)?;

        tracing::debug!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Whether pricing runs on synthetic data: demo mode is forced on, or no
    /// credential resolved at all.
    pub fn is_demo(&self) -> bool {
        self.demo_mode || self.api_key.as_deref().map_or(true, |k| k.trim().is_empty())
    }

    /// Set or clear the credential; demo mode follows the key's presence.
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        let key = api_key.into();
        self.demo_mode = key.trim().is_empty();
        self.api_key = if key.trim().is_empty() { None } else { Some(key) };
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".kicai")
    }

    /// Get the configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::Validation(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.context_capacity == 0 {
            return Err(ConfigError::Validation(
                "context_capacity must be at least 1".into(),
            ));
        }
        if self.distributor_priority.is_empty() {
            return Err(ConfigError::Validation(
                "distributor_priority must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Generate a default config TOML string (for the `onboard` command).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Failed to write config file at {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    Validation(String),
}
