//! The `/chat` client — turns a question into an answer.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::traits::{AnswerClient, ClientError};

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

/// Request body for `POST /chat`.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    query: &'a str,
}

/// Success body from `POST /chat`.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    answer: String,
}

/// Error body the service attaches to non-success statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub(crate) detail: String,
}

// ─────────────────────────────────────────────
// HttpAnswerClient
// ─────────────────────────────────────────────

/// HTTP implementation of [`AnswerClient`].
pub struct HttpAnswerClient {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// Service base URL (e.g. `"http://127.0.0.1:8000"`).
    api_base: String,
}

impl std::fmt::Debug for HttpAnswerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAnswerClient")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl HttpAnswerClient {
    /// Create a new answer client with a per-request timeout.
    pub fn new(api_base: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        HttpAnswerClient {
            client,
            api_base: api_base.to_string(),
        }
    }

    /// Build the full chat URL.
    fn chat_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/chat", base)
    }
}

/// Read the `detail` out of a non-success response, falling back to a
/// status-line message when the body isn't the expected shape.
pub(crate) async fn error_detail(response: reqwest::Response) -> (u16, String) {
    let status = response.status();
    let detail = match response.json::<ApiErrorBody>().await {
        Ok(body) => body.detail,
        Err(_) => format!("request failed with status {}", status),
    };
    (status.as_u16(), detail)
}

#[async_trait]
impl AnswerClient for HttpAnswerClient {
    async fn ask(&self, query: &str) -> Result<String, ClientError> {
        let url = self.chat_url();
        debug!(chars = query.len(), "asking the answering service");

        let response = self
            .client
            .post(&url)
            .json(&ChatRequest { query })
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "chat request failed");
                ClientError::Network(e)
            })?;

        if !response.status().is_success() {
            let (status, detail) = error_detail(response).await;
            error!(status, detail = %detail, "chat API error");
            return Err(ClientError::Api { status, detail });
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            error!(error = %e, "failed to parse chat response");
            ClientError::MalformedBody(e)
        })?;

        debug!(chars = body.answer.len(), "answer received");
        Ok(body.answer)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
