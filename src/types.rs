//! Common types and data structures

use chrono::{DateTime, Local};

/// One result row as returned by the backend. Key order is the backend's
/// column order (serde_json preserve_order).
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Response body of `POST /ask`
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub sql_query: String,
    #[serde(default)]
    pub data: Vec<Row>,
    #[serde(default)]
    pub execution_time_ms: f64,
    #[serde(default)]
    pub row_count: u64,
    #[serde(default)]
    pub error: String,
}

/// Who authored a chat message
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One entry in the chat transcript
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub sql_query: String,
    pub rows: Vec<Row>,
    pub execution_time_ms: f64,
    // Per-message expander state
    pub sql_open: bool,
    pub charts_open: bool,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            sql_query: String::new(),
            rows: Vec::new(),
            execution_time_ms: 0.0,
            sql_open: false,
            charts_open: false,
        }
    }

    pub fn assistant(response: &AskResponse) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: if response.answer.is_empty() {
                "Query executed successfully.".to_string()
            } else {
                response.answer.clone()
            },
            sql_query: response.sql_query.clone(),
            rows: response.data.clone(),
            execution_time_ms: response.execution_time_ms,
            sql_open: false,
            charts_open: false,
        }
    }

    /// Column names, taken from the first row
    pub fn columns(&self) -> Vec<&str> {
        self.rows
            .first()
            .map(|r| r.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Past question record shown in the sidebar
pub struct HistoryEntry {
    pub question: String,
    pub sql: String,
    pub timestamp: DateTime<Local>,
}

/// Progress of the in-flight /ask request, shared with the background task
#[derive(Clone)]
pub enum AskStatus {
    Idle,
    Pending,
    Done(AskResponse),
    Failed(String),
    Cancelled,
}

/// Shared state between the UI thread and the ask task
pub struct AskState {
    pub status: AskStatus,
    pub question: String,
    pub started: Option<std::time::Instant>,
}

impl Default for AskState {
    fn default() -> Self {
        Self {
            status: AskStatus::Idle,
            question: String::new(),
            started: None,
        }
    }
}

/// Result of the last /health probe
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Unknown,
    Checking,
    Connected,
    Unavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ask_response_full_body() {
        let json = r#"{
            "success": true,
            "answer": "Found 2 abnormal tests.",
            "sql_query": "SELECT * FROM tests WHERE abnormal = 1",
            "data": [
                {"test_name": "HbA1c", "result": 9.1},
                {"test_name": "TSH", "result": 11.4}
            ],
            "execution_time_ms": 152.3,
            "row_count": 2
        }"#;
        let resp: AskResponse = serde_json::from_str(json).unwrap();
        assert!(resp.success);
        assert_eq!(resp.data.len(), 2);
        assert_eq!(resp.row_count, 2);
        assert!(resp.error.is_empty());
    }

    #[test]
    fn ask_response_tolerates_missing_fields() {
        let resp: AskResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(resp.success);
        assert!(resp.answer.is_empty());
        assert!(resp.data.is_empty());
        assert_eq!(resp.execution_time_ms, 0.0);
    }

    #[test]
    fn ask_response_failure_body() {
        let json = r#"{"success": false, "error": "table 'reportz' does not exist"}"#;
        let resp: AskResponse = serde_json::from_str(json).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.error, "table 'reportz' does not exist");
    }

    #[test]
    fn assistant_message_defaults_content_when_answer_empty() {
        let resp = AskResponse {
            success: true,
            ..Default::default()
        };
        let msg = ChatMessage::assistant(&resp);
        assert_eq!(msg.content, "Query executed successfully.");
    }

    #[test]
    fn columns_follow_first_row_key_order() {
        let json = r#"{"data": [{"b_col": 1, "a_col": 2, "date": "2024-01-01"}]}"#;
        let resp: AskResponse = serde_json::from_str(json).unwrap();
        let msg = ChatMessage::assistant(&resp);
        assert_eq!(msg.columns(), vec!["b_col", "a_col", "date"]);
    }
}
