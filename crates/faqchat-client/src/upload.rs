//! The `/upload` client — streams a FAQ document to the service's knowledge
//! base, reporting transfer progress along the way.
//!
//! The file goes out as the multipart field `file`. The body is chunked so
//! the progress callback ticks as the HTTP stack drains it.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error};

use crate::answer::error_detail;
use crate::traits::{ClientError, ProgressFn, UploadClient};

/// Body chunk size; one progress tick per chunk.
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Success body from `POST /upload`.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    message: String,
}

/// Whether a path has an extension the service can ingest.
pub fn is_knowledge_file(path: &str) -> bool {
    let lower = path.to_lowercase();
    lower.ends_with(".json") || lower.ends_with(".csv")
}

/// MIME type for the multipart file part, by extension.
fn guess_mime(file_name: &str) -> &'static str {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".json") {
        "application/json"
    } else if lower.ends_with(".csv") {
        "text/csv"
    } else {
        "application/octet-stream"
    }
}

// ─────────────────────────────────────────────
// HttpUploadClient
// ─────────────────────────────────────────────

/// HTTP implementation of [`UploadClient`].
pub struct HttpUploadClient {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// Service base URL (e.g. `"http://127.0.0.1:8000"`).
    api_base: String,
}

impl HttpUploadClient {
    /// Create a new upload client with a per-request timeout.
    pub fn new(api_base: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        HttpUploadClient {
            client,
            api_base: api_base.to_string(),
        }
    }

    /// Build the full upload URL.
    fn upload_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/upload", base)
    }
}

/// Chunked request body that reports the fraction handed off so far.
fn progress_body(bytes: Vec<u8>, progress: ProgressFn) -> reqwest::Body {
    let total = bytes.len().max(1) as f64;
    let chunks: Vec<bytes::Bytes> = bytes
        .chunks(UPLOAD_CHUNK_SIZE)
        .map(bytes::Bytes::copy_from_slice)
        .collect();

    let mut sent = 0usize;
    let stream = futures_util::stream::iter(chunks.into_iter().map(move |chunk| {
        sent += chunk.len();
        progress(sent as f64 / total);
        Ok::<bytes::Bytes, std::io::Error>(chunk)
    }));

    reqwest::Body::wrap_stream(stream)
}

#[async_trait]
impl UploadClient for HttpUploadClient {
    async fn upload(&self, file: &Path, progress: ProgressFn) -> Result<String, ClientError> {
        let bytes = tokio::fs::read(file).await.map_err(|e| ClientError::File {
            path: file.display().to_string(),
            source: e,
        })?;

        let file_name = file
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let total = bytes.len() as u64;

        debug!(file = %file_name, bytes = total, "uploading knowledge document");

        let part = reqwest::multipart::Part::stream_with_length(
            progress_body(bytes, progress),
            total,
        )
        .file_name(file_name.clone())
        .mime_str(guess_mime(&file_name))
        .map_err(ClientError::Network)?;

        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "upload request failed");
                ClientError::Network(e)
            })?;

        if !response.status().is_success() {
            let (status, detail) = error_detail(response).await;
            error!(status, detail = %detail, "upload API error");
            return Err(ClientError::Api { status, detail });
        }

        let body: UploadResponse = response.json().await.map_err(|e| {
            error!(error = %e, "failed to parse upload response");
            ClientError::MalformedBody(e)
        })?;

        debug!("upload complete");
        Ok(body.message)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
