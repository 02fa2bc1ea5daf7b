//! HTTP client layer for Faqchat.
//!
//! The remote service is an opaque HTTP endpoint with two operations:
//! `POST /chat` (answer a question) and `POST /upload` (extend the knowledge
//! base with a FAQ document).
//!
//! # Architecture
//!
//! - [`traits::AnswerClient`] / [`traits::UploadClient`] — traits the
//!   controllers consume via `Arc<dyn …>`
//! - [`answer::HttpAnswerClient`] — `reqwest`-based `/chat` client
//! - [`upload::HttpUploadClient`] — multipart `/upload` client with
//!   progress reporting

pub mod answer;
pub mod traits;
pub mod upload;

// Re-export main types for convenience
pub use answer::HttpAnswerClient;
pub use traits::{AnswerClient, ClientError, ProgressFn, UploadClient};
pub use upload::{is_knowledge_file, HttpUploadClient};
