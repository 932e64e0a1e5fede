//! Interaction mode, language, and analysis context configuration.
//!
//! `InteractionMode` is a closed variant set: the prompt compiler matches it
//! exhaustively, so adding a mode is a compile-time-checked extension point
//! rather than a string comparison scattered through the codebase.

use serde::{Deserialize, Serialize};

/// How directive the assistant is allowed to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Purely advisory: observations and options only, no edit proposals.
    Analysis,
    /// Step-guided: numbered steps, explicit confirmation before action.
    Advisory,
    /// Interactive: may name concrete UI elements, still never acts itself.
    Assistant,
}

impl InteractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionMode::Analysis => "analysis",
            InteractionMode::Advisory => "advisory",
            InteractionMode::Assistant => "assistant",
        }
    }

    /// Parse a mode name as stored in config files.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "analysis" => Some(InteractionMode::Analysis),
            "advisory" => Some(InteractionMode::Advisory),
            "assistant" => Some(InteractionMode::Assistant),
            _ => None,
        }
    }
}

impl Default for InteractionMode {
    /// Analysis is the safest mode and the default for new sessions.
    fn default() -> Self {
        InteractionMode::Analysis
    }
}

impl std::fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reply language for the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Dutch,
    German,
    French,
    Spanish,
    Italian,
}

impl Language {
    /// BCP-47-style tag declared in the compiled prompt.
    pub fn tag(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Dutch => "nl",
            Language::German => "de",
            Language::French => "fr",
            Language::Spanish => "es",
            Language::Italian => "it",
        }
    }

    /// The language's own name for itself, shown in config UIs.
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Dutch => "Nederlands",
            Language::German => "Deutsch",
            Language::French => "Français",
            Language::Spanish => "Español",
            Language::Italian => "Italiano",
        }
    }

    /// Parse either a tag ("nl") or a native name ("Nederlands").
    pub fn parse(s: &str) -> Option<Self> {
        let all = [
            Language::English,
            Language::Dutch,
            Language::German,
            Language::French,
            Language::Spanish,
            Language::Italian,
        ];
        let needle = s.trim().to_lowercase();
        all.into_iter().find(|l| {
            l.tag() == needle || l.native_name().to_lowercase() == needle
        })
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.native_name())
    }
}

/// Which side of the design the assistant is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisContext {
    /// Circuit topology: symbols, values, connectivity.
    Schematic,
    /// Physical board: placement, routing, stackup.
    PcbLayout,
}

impl Default for AnalysisContext {
    fn default() -> Self {
        AnalysisContext::PcbLayout
    }
}

/// Per-session mode configuration.
///
/// Immutable unless explicitly changed by the user; changing it does not
/// clear the conversation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModeConfig {
    pub mode: InteractionMode,
    pub language: Language,
    pub context: AnalysisContext,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_is_analysis() {
        assert_eq!(ModeConfig::default().mode, InteractionMode::Analysis);
    }

    #[test]
    fn mode_parse_roundtrip() {
        for mode in [
            InteractionMode::Analysis,
            InteractionMode::Advisory,
            InteractionMode::Assistant,
        ] {
            assert_eq!(InteractionMode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(InteractionMode::parse("expert"), None);
    }

    #[test]
    fn language_parse_accepts_tag_and_native_name() {
        assert_eq!(Language::parse("nl"), Some(Language::Dutch));
        assert_eq!(Language::parse("Nederlands"), Some(Language::Dutch));
        assert_eq!(Language::parse("ESPAÑOL"), Some(Language::Spanish));
        assert_eq!(Language::parse("klingon"), None);
    }

    #[test]
    fn six_languages_supported() {
        let tags = ["en", "nl", "de", "fr", "es", "it"];
        for tag in tags {
            assert!(Language::parse(tag).is_some(), "missing language {tag}");
        }
    }
}
