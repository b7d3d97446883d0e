//! Per-session conversation state machine.
//!
//! A conversation starts empty (no analysis yet) and moves to the
//! summarized state when an upload produces its initial model turn.
//! From there it only grows by complete user/model exchanges; a
//! failed chat continuation must never leave a dangling user turn.

use vchat_models::{Role, Turn};

/// Fixed response for a chat request before any video was analyzed.
pub const NO_ANALYSIS_SENTINEL: &str = "Please analyze a video first before asking questions.";

/// Fixed response when the chat continuation call fails.
pub const CHAT_APOLOGY: &str =
    "I'm sorry, I encountered an error processing your question. Please try again.";

/// Ordered turn history for one session.
#[derive(Debug, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an initial summary exists.
    pub fn has_summary(&self) -> bool {
        !self.turns.is_empty()
    }

    /// The ordered history, replayed to the gateway on continuation.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Commit a fresh summary, discarding any prior conversation.
    ///
    /// Every successful upload resets the session to a single-entry
    /// history; there is no merging across uploads.
    pub fn begin_summary(&mut self, summary: impl Into<String>) {
        self.turns.clear();
        self.turns.push(Turn::model(summary));
        debug_assert_eq!(self.turns[0].role, Role::Model);
    }

    /// Append a completed question/answer pair.
    ///
    /// The pair goes in together or not at all; callers that fail to
    /// obtain an answer simply never call this.
    pub fn append_exchange(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.turns.push(Turn::user(question));
        self.turns.push(Turn::model(answer));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_without_summary() {
        let conv = Conversation::new();
        assert!(!conv.has_summary());
        assert!(conv.is_empty());
    }

    #[test]
    fn test_begin_summary_sets_single_model_turn() {
        let mut conv = Conversation::new();
        conv.begin_summary("the video shows a cat");

        assert!(conv.has_summary());
        assert_eq!(conv.len(), 1);
        assert_eq!(conv.turns()[0].role, Role::Model);
        assert_eq!(conv.turns()[0].text(), "the video shows a cat");
    }

    #[test]
    fn test_new_upload_discards_prior_conversation() {
        let mut conv = Conversation::new();
        conv.begin_summary("first summary");
        conv.append_exchange("what color?", "orange");
        assert_eq!(conv.len(), 3);

        conv.begin_summary("second summary");
        assert_eq!(conv.len(), 1);
        assert_eq!(conv.turns()[0].text(), "second summary");
    }

    #[test]
    fn test_append_exchange_order() {
        let mut conv = Conversation::new();
        conv.begin_summary("summary");
        conv.append_exchange("q1", "a1");
        conv.append_exchange("q2", "a2");

        let roles: Vec<Role> = conv.turns().iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![Role::Model, Role::User, Role::Model, Role::User, Role::Model]
        );
        assert_eq!(conv.turns()[3].text(), "q2");
    }
}
