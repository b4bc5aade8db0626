//! HTTP client for the lab intelligence backend
//!
//! Two endpoints: `POST /ask` forwards a natural-language question and
//! `GET /health` reports backend availability. No retries, no backoff;
//! failures map onto a small taxonomy surfaced as banner text.

use crate::constants::HEALTH_TIMEOUT_SECS;
use crate::types::AskResponse;
use std::time::Duration;
use tracing::{debug, warn};

/// Failure modes of the /ask call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskError {
    /// The request exceeded the configured timeout
    Timeout(u64),
    /// Transport or HTTP-level failure
    Request(String),
    /// The backend answered but flagged the query as failed
    Backend(String),
}

impl std::fmt::Display for AskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AskError::Timeout(secs) => write!(
                f,
                "API Timeout: request took longer than {} seconds. Try increasing the timeout in the sidebar.",
                secs
            ),
            AskError::Request(e) => write!(f, "API Error: {}", e),
            AskError::Backend(e) => write!(f, "Query failed: {}", e),
        }
    }
}

/// POST the question to `{base_url}/ask` and decode the response.
///
/// Returns `Ok` only for `success: true` bodies; a `success: false` body
/// becomes `AskError::Backend` carrying the backend's error string verbatim.
pub async fn ask(
    client: &reqwest::Client,
    base_url: &str,
    question: &str,
    timeout: Duration,
) -> Result<AskResponse, AskError> {
    let url = format!("{}/ask", base_url.trim_end_matches('/'));
    debug!(url = %url, timeout_secs = timeout.as_secs(), "Sending /ask request");

    let result = client
        .post(&url)
        .json(&serde_json::json!({ "question": question }))
        .timeout(timeout)
        .send()
        .await;

    let response = match result {
        Ok(response) if response.status().is_success() => response,
        Ok(response) => {
            return Err(AskError::Request(format!("HTTP {}", response.status())));
        }
        Err(e) if e.is_timeout() => {
            return Err(AskError::Timeout(timeout.as_secs()));
        }
        Err(e) => {
            return Err(AskError::Request(e.to_string()));
        }
    };

    let body: AskResponse = response
        .json()
        .await
        .map_err(|e| AskError::Request(e.to_string()))?;

    if body.success {
        Ok(body)
    } else if body.error.is_empty() {
        Err(AskError::Backend("Unknown error".to_string()))
    } else {
        Err(AskError::Backend(body.error))
    }
}

/// Probe `{base_url}/health`, healthy iff HTTP 200. Blocking; callers run
/// this on a worker thread.
pub fn check_health(base_url: &str) -> bool {
    let url = format!("{}/health", base_url.trim_end_matches('/'));
    let client = match reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(HEALTH_TIMEOUT_SECS))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "Failed to build health check client");
            return false;
        }
    };
    match client.get(&url).send() {
        Ok(response) => response.status() == reqwest::StatusCode::OK,
        Err(e) => {
            debug!(error = %e, "Health check failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ask_posts_question_and_decodes_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/ask")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "question": "How many reports this month?"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"success": true, "answer": "128 reports.", "sql_query": "SELECT COUNT(*) FROM reports",
                    "data": [{"count": 128}], "execution_time_ms": 41.0, "row_count": 1}"#,
            )
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let resp = ask(
            &client,
            &server.url(),
            "How many reports this month?",
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        mock.assert_async().await;
        assert_eq!(resp.answer, "128 reports.");
        assert_eq!(resp.data.len(), 1);
    }

    #[tokio::test]
    async fn ask_surfaces_backend_error_verbatim() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/ask")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": false, "error": "column 'genderz' not found"}"#)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let err = ask(&client, &server.url(), "bad question", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert_eq!(err, AskError::Backend("column 'genderz' not found".to_string()));
    }

    #[tokio::test]
    async fn ask_maps_http_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/ask")
            .with_status(502)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let err = ask(&client, &server.url(), "q", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, AskError::Request(ref s) if s.contains("502")));
    }

    #[tokio::test]
    async fn ask_classifies_timeout() {
        // A listener that never answers: connect succeeds, response never comes.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let client = reqwest::Client::new();
        let err = ask(
            &client,
            &format!("http://{}", addr),
            "q",
            Duration::from_millis(200),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AskError::Timeout(_)));
    }

    #[test]
    fn health_ok_on_200() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/health").with_status(200).create();
        assert!(check_health(&server.url()));
    }

    #[test]
    fn health_fails_on_500() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/health").with_status(500).create();
        assert!(!check_health(&server.url()));
    }

    #[test]
    fn health_fails_when_unreachable() {
        // Port from a dropped listener, nothing is accepting.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        assert!(!check_health(&format!("http://127.0.0.1:{}", port)));
    }
}
