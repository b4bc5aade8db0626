//! Per-session chat bookkeeping
//!
//! Append-only while the app runs, cleared together on explicit user action.
//! Nothing here touches the disk; chat content is never persisted.

use crate::types::{AskResponse, ChatMessage, ChatRole, HistoryEntry};
use tracing::info;

#[derive(Default)]
pub struct Session {
    pub messages: Vec<ChatMessage>,
    pub history: Vec<HistoryEntry>,
}

impl Session {
    /// Append the user's question to the transcript.
    pub fn push_user(&mut self, question: &str) {
        self.messages.push(ChatMessage::user(question));
    }

    /// Append the assistant's answer and record the question in the history.
    /// Only called for `success: true` responses; errors stay out of the
    /// transcript and are shown as banners instead.
    pub fn apply_success(&mut self, question: &str, response: &AskResponse) {
        self.messages.push(ChatMessage::assistant(response));
        self.history.push(HistoryEntry {
            question: question.to_string(),
            sql: response.sql_query.clone(),
            timestamp: chrono::Local::now(),
        });
    }

    pub fn clear(&mut self) {
        info!(
            messages = self.messages.len(),
            history = self.history.len(),
            "Clearing chat session"
        );
        self.messages.clear();
        self.history.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of assistant answers in the transcript
    pub fn answer_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == ChatRole::Assistant)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success_response() -> AskResponse {
        serde_json::from_str(
            r#"{"success": true, "answer": "3 abnormal tests found.",
                "sql_query": "SELECT * FROM tests", "data": [{"id": 1}],
                "execution_time_ms": 10.0, "row_count": 1}"#,
        )
        .unwrap()
    }

    #[test]
    fn success_appends_one_message_and_one_history_entry() {
        let mut session = Session::default();
        session.push_user("Show abnormal tests");
        session.apply_success("Show abnormal tests", &success_response());

        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.answer_count(), 1);
        let answer = session.messages.last().unwrap();
        assert_eq!(answer.content, "3 abnormal tests found.");
        assert_eq!(answer.sql_query, "SELECT * FROM tests");

        assert_eq!(session.history.len(), 1);
        assert_eq!(session.history[0].question, "Show abnormal tests");
        assert_eq!(session.history[0].sql, "SELECT * FROM tests");
    }

    #[test]
    fn errors_do_not_touch_the_transcript() {
        let mut session = Session::default();
        session.push_user("question");
        // Timeout / failure path: the app never calls apply_success.
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.answer_count(), 0);
        assert!(session.history.is_empty());
    }

    #[test]
    fn clear_wipes_messages_and_history_together() {
        let mut session = Session::default();
        session.push_user("q");
        session.apply_success("q", &success_response());
        session.clear();
        assert!(session.is_empty());
        assert!(session.history.is_empty());
    }
}
