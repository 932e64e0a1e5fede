//! Turn — the conversational exchange unit.
//!
//! A turn is one message in the session, from either the user or the
//! assistant. Turns are immutable value objects: once created they are never
//! edited, only appended to (and eventually evicted from) the context window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user (the designer at the keyboard).
    User,
    /// The AI assistant.
    Assistant,
}

impl Role {
    /// Transcript label for this role.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// A single conversational turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Who sent this turn.
    pub role: Role,

    /// The text content.
    pub content: String,

    /// When the turn was created.
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Create a new user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_turn() {
        let turn = Turn::user("Check R1 for me");
        assert_eq!(turn.role, Role::User);
        assert_eq!(turn.content, "Check R1 for me");
    }

    #[test]
    fn turn_serialization_roundtrip() {
        let turn = Turn::assistant("R1 is a 10K pull-up.");
        let json = serde_json::to_string(&turn).unwrap();
        let parsed: Turn = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, turn);
        assert_eq!(parsed.role, Role::Assistant);
    }

    #[test]
    fn role_labels() {
        assert_eq!(Role::User.label(), "User");
        assert_eq!(Role::Assistant.label(), "Assistant");
    }
}
