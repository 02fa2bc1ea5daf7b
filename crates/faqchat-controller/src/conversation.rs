//! Conversation controller — one chat exchange per submission.
//!
//! A submission runs: optimistic user append → typing indicator → exactly
//! one remote call → reconcile into the session that was active *at
//! submission time*. The captured id is held by value across the await, so
//! a reply always lands in its originating session even when the user has
//! switched sessions mid-flight. In-flight requests are never canceled and
//! concurrent submissions stay independent.

use std::sync::Arc;

use tracing::{debug, warn};

use faqchat_client::AnswerClient;
use faqchat_core::session::{SessionError, SessionRepository};
use faqchat_core::types::{Message, Sender, Session};

use crate::presenter::Presenter;

/// Text rendered while a reply is pending. Never persisted.
pub const TYPING_INDICATOR: &str = "...";

// ─────────────────────────────────────────────
// ConversationController
// ─────────────────────────────────────────────

/// Drives chat submissions and the session-level user actions around them.
pub struct ConversationController {
    repository: Arc<SessionRepository>,
    client: Arc<dyn AnswerClient>,
    presenter: Arc<dyn Presenter>,
}

impl ConversationController {
    /// Create a new conversation controller.
    pub fn new(
        repository: Arc<SessionRepository>,
        client: Arc<dyn AnswerClient>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        Self {
            repository,
            client,
            presenter,
        }
    }

    /// Submit user text to the currently active session.
    ///
    /// Empty or whitespace-only input is rejected before any state change.
    /// Failures become a bot-authored `"Error: ..."` transcript entry; no
    /// error escapes this method.
    pub async fn submit(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        // The reply must land here even if the user switches away while
        // the request is in flight.
        let session_id = self.repository.active_id();

        if let Err(e) = self
            .repository
            .append_message(&session_id, Message::user(text))
        {
            warn!(error = %e, "failed to record user message");
            return;
        }
        self.presenter.render_message(Sender::User, text);

        let typing = self.presenter.render_message(Sender::Bot, TYPING_INDICATOR);

        debug!(session = %session_id, "sending query");
        let reply = match self.client.ask(text).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, session = %session_id, "chat request failed");
                format!("Error: {}", e)
            }
        };

        self.presenter.remove_ephemeral(typing);

        if let Err(e) = self
            .repository
            .append_message(&session_id, Message::bot(&reply))
        {
            warn!(error = %e, "failed to record reply");
            return;
        }
        self.presenter.render_message(Sender::Bot, &reply);
    }

    /// Create a fresh session, make it active, and redraw the list.
    pub fn new_session(&self) -> Session {
        let session = self.repository.create_session();
        self.render_list();
        session
    }

    /// Switch the active session. Returns whether `id` is active afterwards.
    ///
    /// Switching to the current session or an unknown id redraws nothing.
    pub fn switch_to(&self, id: &str) -> bool {
        let previous = self.repository.active_id();
        let known = self.repository.switch_session(id);
        if known && previous != id {
            self.render_list();
        }
        known
    }

    /// Reset the active session to a single greeting.
    pub fn clear_conversation(&self) {
        self.repository.clear_active();
    }

    /// Plain-text transcript of the active session.
    pub fn export_transcript(&self) -> Result<String, SessionError> {
        self.repository.export_active()
    }

    /// Redraw the session list without mutating anything.
    pub fn show_sessions(&self) {
        self.render_list();
    }

    /// Snapshot of every session, for callers that resolve list positions.
    pub fn sessions_snapshot(&self) -> Vec<Session> {
        self.repository.sessions()
    }

    fn render_list(&self) {
        let sessions = self.repository.sessions();
        self.presenter
            .render_session_list(&sessions, &self.repository.active_id());
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use faqchat_client::ClientError;
    use faqchat_core::store::StateStore;
    use faqchat_core::types::{Session, GREETING};
    use tempfile::tempdir;

    // ── Test doubles ──

    #[derive(Debug, PartialEq)]
    enum Event {
        List { titles: Vec<String>, active: String },
        Message { sender: Sender, text: String, handle: u64 },
        Removed(u64),
    }

    struct RecordingPresenter {
        events: Mutex<Vec<Event>>,
        next_handle: AtomicU64,
    }

    impl RecordingPresenter {
        fn new() -> Self {
            Self {
                events: Mutex::new(Vec::new()),
                next_handle: AtomicU64::new(1),
            }
        }

        fn events(&self) -> std::sync::MutexGuard<'_, Vec<Event>> {
            self.events.lock().unwrap()
        }
    }

    impl Presenter for RecordingPresenter {
        fn render_session_list(&self, sessions: &[Session], active_id: &str) {
            self.events().push(Event::List {
                titles: sessions.iter().map(|s| s.title.clone()).collect(),
                active: active_id.to_string(),
            });
        }

        fn render_message(&self, sender: Sender, text: &str) -> crate::EphemeralHandle {
            let handle = self.next_handle.fetch_add(1, Ordering::Relaxed);
            self.events().push(Event::Message {
                sender,
                text: text.to_string(),
                handle,
            });
            crate::EphemeralHandle(handle)
        }

        fn remove_ephemeral(&self, handle: crate::EphemeralHandle) {
            self.events().push(Event::Removed(handle.0));
        }

        fn notify(&self, _message: &str, _is_error: bool) {}

        fn report_upload_progress(&self, _fraction: f64) {}
    }

    /// Returns a canned reply (or error) and counts calls.
    struct CannedClient {
        reply: Result<String, (u16, String)>,
        calls: AtomicUsize,
    }

    impl CannedClient {
        fn ok(answer: &str) -> Self {
            Self {
                reply: Ok(answer.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn err(status: u16, detail: &str) -> Self {
            Self {
                reply: Err((status, detail.to_string())),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AnswerClient for CannedClient {
        async fn ask(&self, _query: &str) -> Result<String, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(answer) => Ok(answer.clone()),
                Err((status, detail)) => Err(ClientError::Api {
                    status: *status,
                    detail: detail.clone(),
                }),
            }
        }
    }

    /// Blocks inside `ask` until released, so a test can interleave user
    /// actions with an in-flight request.
    struct GatedClient {
        gate: Mutex<Option<tokio::sync::oneshot::Receiver<()>>>,
        answer: String,
    }

    #[async_trait]
    impl AnswerClient for GatedClient {
        async fn ask(&self, _query: &str) -> Result<String, ClientError> {
            let rx = self.gate.lock().unwrap().take();
            if let Some(rx) = rx {
                let _ = rx.await;
            }
            Ok(self.answer.clone())
        }
    }

    fn make_controller(
        client: Arc<dyn AnswerClient>,
    ) -> (
        ConversationController,
        Arc<SessionRepository>,
        Arc<RecordingPresenter>,
        tempfile::TempDir,
    ) {
        let dir = tempdir().unwrap();
        let store = StateStore::new(Some(dir.path().to_path_buf())).unwrap();
        let repository = Arc::new(SessionRepository::load(store));
        let presenter = Arc::new(RecordingPresenter::new());
        let controller =
            ConversationController::new(repository.clone(), client, presenter.clone());
        (controller, repository, presenter, dir)
    }

    // ── Submission ──

    #[tokio::test]
    async fn test_submit_appends_user_then_bot() {
        let client = Arc::new(CannedClient::ok("X is Y"));
        let (controller, repo, _, _dir) = make_controller(client);

        controller.submit("What is X?").await;

        let session = repo.active_session();
        assert_eq!(session.messages.len(), 3);
        assert_eq!(session.messages[0].text, GREETING);
        assert_eq!(session.messages[1], Message::user("What is X?"));
        assert_eq!(session.messages[2], Message::bot("X is Y"));
    }

    #[tokio::test]
    async fn test_submit_empty_input_is_rejected() {
        let client = Arc::new(CannedClient::ok("unused"));
        let calls = &client.calls;
        let (controller, repo, presenter, _dir) = make_controller(client.clone());

        controller.submit("").await;
        controller.submit("   \t\n").await;

        assert_eq!(repo.active_session().messages.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(presenter.events().is_empty());
    }

    #[tokio::test]
    async fn test_submit_trims_input() {
        let client = Arc::new(CannedClient::ok("ok"));
        let (controller, repo, _, _dir) = make_controller(client);

        controller.submit("  padded question  ").await;

        assert_eq!(repo.active_session().messages[1].text, "padded question");
    }

    #[tokio::test]
    async fn test_failed_request_appends_error_message() {
        let client = Arc::new(CannedClient::err(500, "index unavailable"));
        let (controller, repo, _, _dir) = make_controller(client);

        controller.submit("anything").await;

        let session = repo.active_session();
        assert_eq!(session.messages.len(), 3);
        assert_eq!(session.messages[2], Message::bot("Error: index unavailable"));
    }

    #[tokio::test]
    async fn test_typing_indicator_removed_before_reply_render() {
        let client = Arc::new(CannedClient::ok("done"));
        let (controller, _, presenter, _dir) = make_controller(client);

        controller.submit("hello").await;

        let events = presenter.events();
        let typing_handle = events
            .iter()
            .find_map(|e| match e {
                Event::Message { text, handle, .. } if text == TYPING_INDICATOR => Some(*handle),
                _ => None,
            })
            .expect("typing indicator rendered");

        let removed_at = events
            .iter()
            .position(|e| *e == Event::Removed(typing_handle))
            .expect("typing indicator removed");
        let reply_at = events
            .iter()
            .position(|e| {
                matches!(e, Event::Message { sender: Sender::Bot, text, .. } if text == "done")
            })
            .expect("reply rendered");

        assert!(removed_at < reply_at);
    }

    #[tokio::test]
    async fn test_reply_lands_in_captured_session_after_switch() {
        let (tx, rx) = tokio::sync::oneshot::channel();
        let client = Arc::new(GatedClient {
            gate: Mutex::new(Some(rx)),
            answer: "X is Y".to_string(),
        });
        let (controller, repo, _, _dir) = make_controller(client);
        let controller = Arc::new(controller);
        let first_id = repo.active_id();

        let task = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit("What is X?").await }
        });

        // Wait for the optimistic user append, then switch away mid-flight.
        for _ in 0..100 {
            if repo.session(&first_id).unwrap().messages.len() == 2 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        assert_eq!(repo.session(&first_id).unwrap().messages.len(), 2);

        let second = controller.new_session();
        assert_eq!(repo.active_id(), second.id);

        tx.send(()).unwrap();
        task.await.unwrap();

        // The reply went to the originating session, not the active one.
        let first = repo.session(&first_id).unwrap();
        assert_eq!(first.messages.len(), 3);
        assert_eq!(first.messages[2], Message::bot("X is Y"));
        assert_eq!(repo.session(&second.id).unwrap().messages.len(), 1);
        assert_eq!(repo.active_id(), second.id);
    }

    // ── Session actions ──

    #[tokio::test]
    async fn test_new_session_renders_list() {
        let client = Arc::new(CannedClient::ok("unused"));
        let (controller, repo, presenter, _dir) = make_controller(client);

        let created = controller.new_session();

        assert_eq!(repo.active_id(), created.id);
        let events = presenter.events();
        assert_eq!(
            *events.last().unwrap(),
            Event::List {
                titles: vec!["Chat 1".to_string(), "Chat 2".to_string()],
                active: created.id,
            }
        );
    }

    #[tokio::test]
    async fn test_switch_to_unknown_session() {
        let client = Arc::new(CannedClient::ok("unused"));
        let (controller, repo, presenter, _dir) = make_controller(client);
        let active = repo.active_id();

        assert!(!controller.switch_to("ghost"));

        assert_eq!(repo.active_id(), active);
        assert!(presenter.events().is_empty());
    }

    #[tokio::test]
    async fn test_switch_to_active_session_renders_nothing() {
        let client = Arc::new(CannedClient::ok("unused"));
        let (controller, repo, presenter, _dir) = make_controller(client);

        assert!(controller.switch_to(&repo.active_id()));
        assert!(presenter.events().is_empty());
    }

    #[tokio::test]
    async fn test_switch_between_sessions_renders_list() {
        let client = Arc::new(CannedClient::ok("unused"));
        let (controller, repo, presenter, _dir) = make_controller(client);
        let first = repo.active_id();
        controller.new_session();

        assert!(controller.switch_to(&first));

        assert_eq!(repo.active_id(), first);
        let events = presenter.events();
        match events.last().unwrap() {
            Event::List { active, .. } => assert_eq!(*active, first),
            other => panic!("expected list render, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_clear_conversation() {
        let client = Arc::new(CannedClient::ok("fine"));
        let (controller, repo, _, _dir) = make_controller(client);
        controller.submit("something").await;

        controller.clear_conversation();

        let session = repo.active_session();
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].text, GREETING);
    }
}
