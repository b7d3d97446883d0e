//! Conversation turns.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The browser client asking questions
    User,
    /// The multimodal model
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One message in a session's conversation history.
///
/// Ordering is significant: the full history is replayed to the AI
/// gateway on every chat continuation. A non-empty history always
/// starts with a `Model` turn (the initial video summary).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub parts: Vec<String>,
}

impl Turn {
    /// Create a user turn with a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![text.into()],
        }
    }

    /// Create a model turn with a single text part.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![text.into()],
        }
    }

    /// Concatenated text content of this turn.
    pub fn text(&self) -> String {
        self.parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Model).unwrap(), "\"model\"");
    }

    #[test]
    fn test_turn_helpers() {
        let t = Turn::user("what happens at 0:30?");
        assert_eq!(t.role, Role::User);
        assert_eq!(t.text(), "what happens at 0:30?");

        let t = Turn::model("A summary.");
        assert_eq!(t.role, Role::Model);
    }
}
