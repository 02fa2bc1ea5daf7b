//! Client traits — the remote operations the front end depends on.
//!
//! Controllers hold `Arc<dyn AnswerClient>` / `Arc<dyn UploadClient>` so
//! tests can substitute canned implementations without a network.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

/// Callback receiving the upload progress fraction in `[0, 1]`.
pub type ProgressFn = Arc<dyn Fn(f64) + Send + Sync>;

/// Failures talking to the remote service.
///
/// `Display` is the user-facing text: API failures surface the service's
/// `detail` verbatim, everything else reads as a generic connection problem.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Non-success status with a parsable `detail` (or a status fallback).
    #[error("{detail}")]
    Api { status: u16, detail: String },

    /// The request never completed (DNS, refused connection, timeout).
    #[error("could not connect to the assistant service")]
    Network(#[source] reqwest::Error),

    /// Success status but the body wasn't the expected shape.
    #[error("received an unexpected response from the assistant service")]
    MalformedBody(#[source] reqwest::Error),

    /// A local file could not be read (uploads only).
    #[error("could not read {path}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One-question-in, one-answer-out exchange with the answering service.
#[async_trait]
pub trait AnswerClient: Send + Sync {
    /// Ask the service a question.
    ///
    /// Exactly one request is issued; no retries. Every failure mode comes
    /// back as a [`ClientError`], never a panic.
    async fn ask(&self, query: &str) -> Result<String, ClientError>;
}

/// Knowledge-document upload with progress feedback.
#[async_trait]
pub trait UploadClient: Send + Sync {
    /// Upload one file, invoking `progress` with fractions in `[0, 1]` as
    /// the transfer advances.
    ///
    /// Returns the service's confirmation message on success.
    async fn upload(&self, file: &Path, progress: ProgressFn) -> Result<String, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_displays_detail_verbatim() {
        let err = ClientError::Api {
            status: 500,
            detail: "index unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "index unavailable");
    }

    #[test]
    fn test_file_error_names_the_path() {
        let err = ClientError::File {
            path: "/tmp/faqs.json".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "could not read /tmp/faqs.json");
    }
}
