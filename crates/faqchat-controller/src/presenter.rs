//! Presenter trait — the interface every presentation layer must implement.
//!
//! The controllers render *through* this trait and never know how messages
//! reach the screen. Implementations must be cheap and non-blocking; all
//! calls happen inline on the controllers' execution path.

use faqchat_core::types::{Sender, Session};

/// Handle for a rendered element that may be removed again (the typing
/// indicator). Ephemeral by construction: handles never enter the data
/// model and are meaningless after removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EphemeralHandle(pub u64);

/// Every presentation layer implements this trait.
pub trait Presenter: Send + Sync {
    /// Redraw the session list with the active session marked.
    fn render_session_list(&self, sessions: &[Session], active_id: &str);

    /// Render one message and return a handle for possible removal.
    fn render_message(&self, sender: Sender, text: &str) -> EphemeralHandle;

    /// Remove a previously rendered element.
    fn remove_ephemeral(&self, handle: EphemeralHandle);

    /// Show a transient notification banner.
    fn notify(&self, message: &str, is_error: bool);

    /// Update the upload progress indicator; `0.0` clears it.
    fn report_upload_progress(&self, fraction: f64);
}
