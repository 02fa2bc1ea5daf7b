//! Upload controller — an independent fire-and-forget operation.
//!
//! Completely decoupled from conversation state: its only outputs are the
//! progress indicator and a success/error notification. Progress is not a
//! durable property of anything; the indicator is parked back at zero when
//! the transfer ends, however it ends.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use faqchat_client::{ProgressFn, UploadClient};

use crate::presenter::Presenter;

/// Drives one knowledge-document upload per invocation.
pub struct UploadController {
    client: Arc<dyn UploadClient>,
    presenter: Arc<dyn Presenter>,
}

impl UploadController {
    /// Create a new upload controller.
    pub fn new(client: Arc<dyn UploadClient>, presenter: Arc<dyn Presenter>) -> Self {
        Self { client, presenter }
    }

    /// Upload one file. `None` is a no-op.
    ///
    /// Progress fractions stream to the presenter while the transfer runs;
    /// completion notifies with the service's message (success) or the
    /// error's display text (failure). No error escapes this method.
    pub async fn upload(&self, file: Option<&Path>) {
        let Some(path) = file else {
            return;
        };

        debug!(file = %path.display(), "starting upload");

        let sink = self.presenter.clone();
        let progress: ProgressFn = Arc::new(move |fraction| sink.report_upload_progress(fraction));

        let result = self.client.upload(path, progress).await;
        self.presenter.report_upload_progress(0.0);

        match result {
            Ok(message) => self.presenter.notify(&message, false),
            Err(e) => {
                warn!(error = %e, file = %path.display(), "upload failed");
                self.presenter.notify(&e.to_string(), true);
            }
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
