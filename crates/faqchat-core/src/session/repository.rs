//! The session collection and active-session pointer.
//!
//! Invariants:
//! - the collection is never empty after [`SessionRepository::load`]
//! - the active id always references a member session
//! - sessions keep their creation order; ids are unique
//!
//! Thread-safe via `RwLock` — multiple readers, exclusive writer.

use std::fmt::Write as _;
use std::sync::RwLock;

use chrono::Utc;
use tracing::{debug, warn};

use crate::store::StateStore;
use crate::types::{Message, Session};

/// Errors reported by repository operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("unknown session: {0}")]
    UnknownSession(String),

    #[error("the active session has no messages to export")]
    EmptyTranscript,
}

struct RepoState {
    /// All sessions in creation order.
    sessions: Vec<Session>,
    /// Id of the active session. Always a member of `sessions`.
    active_id: String,
}

// ─────────────────────────────────────────────
// SessionRepository
// ─────────────────────────────────────────────

/// Owns every chat session plus the active-session pointer, and persists a
/// snapshot through the [`StateStore`] after each mutation.
pub struct SessionRepository {
    store: StateStore,
    state: RwLock<RepoState>,
}

impl SessionRepository {
    /// Load persisted state, repairing it into a usable shape.
    ///
    /// If storage is empty/corrupt, or the persisted active id doesn't
    /// reference a loaded session, a fresh session is created and becomes
    /// active.
    pub fn load(store: StateStore) -> Self {
        let (sessions, active_id) = store.load();
        let active_id = active_id
            .filter(|id| sessions.iter().any(|s| s.id == *id))
            .unwrap_or_default();

        let repo = SessionRepository {
            store,
            state: RwLock::new(RepoState {
                sessions,
                active_id,
            }),
        };

        if repo.state.read().unwrap().active_id.is_empty() {
            let session = repo.create_session();
            debug!(session = %session.id, "no usable active session, created a fresh one");
        }

        repo
    }

    /// Create a new session, make it active, and persist.
    ///
    /// Titles number sequentially (`"Chat {N}"`, N = session count + 1);
    /// numbers are never reused because sessions are never deleted.
    pub fn create_session(&self) -> Session {
        let mut state = self.state.write().unwrap();

        let id = next_session_id(&state.sessions);
        let title = format!("Chat {}", state.sessions.len() + 1);
        let session = Session::new(id.clone(), title);

        state.sessions.push(session.clone());
        state.active_id = id;
        self.persist(&state);

        debug!(session = %session.id, title = %session.title, "session created");
        session
    }

    /// Make `id` the active session.
    ///
    /// Switching to the already-active session is a no-op. Unknown ids are
    /// logged and ignored. Returns whether `id` is active afterwards.
    pub fn switch_session(&self, id: &str) -> bool {
        let mut state = self.state.write().unwrap();

        if state.active_id == id {
            return true;
        }
        if !state.sessions.iter().any(|s| s.id == id) {
            warn!(session = %id, "ignoring switch to unknown session");
            return false;
        }

        state.active_id = id.to_string();
        self.persist(&state);
        true
    }

    /// Append a message to a session and persist.
    pub fn append_message(&self, session_id: &str, message: Message) -> Result<(), SessionError> {
        let mut state = self.state.write().unwrap();

        let Some(session) = state.sessions.iter_mut().find(|s| s.id == session_id) else {
            return Err(SessionError::UnknownSession(session_id.to_string()));
        };
        session.messages.push(message);

        self.persist(&state);
        Ok(())
    }

    /// Replace the active session's transcript with a single fresh greeting.
    pub fn clear_active(&self) {
        let mut state = self.state.write().unwrap();

        let active_id = state.active_id.clone();
        if let Some(session) = state.sessions.iter_mut().find(|s| s.id == active_id) {
            session.reset();
            self.persist(&state);
        }
    }

    /// Render the active session as a plain-text transcript.
    ///
    /// Fails with [`SessionError::EmptyTranscript`] when the session has no
    /// messages; no state is touched either way.
    pub fn export_active(&self) -> Result<String, SessionError> {
        let state = self.state.read().unwrap();

        let session = state
            .sessions
            .iter()
            .find(|s| s.id == state.active_id)
            .ok_or_else(|| SessionError::UnknownSession(state.active_id.clone()))?;

        if session.messages.is_empty() {
            return Err(SessionError::EmptyTranscript);
        }

        let mut out = String::new();
        let _ = writeln!(out, "{}", session.title);
        let _ = writeln!(
            out,
            "Exported: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        let _ = writeln!(out);
        for message in &session.messages {
            let _ = writeln!(out, "[{}]: {}", message.sender.label(), message.text);
        }

        Ok(out)
    }

    /// Id of the active session.
    pub fn active_id(&self) -> String {
        self.state.read().unwrap().active_id.clone()
    }

    /// Snapshot of the active session.
    pub fn active_session(&self) -> Session {
        let state = self.state.read().unwrap();
        state
            .sessions
            .iter()
            .find(|s| s.id == state.active_id)
            .cloned()
            .expect("active id references a member session")
    }

    /// Snapshot of one session by id.
    pub fn session(&self, id: &str) -> Option<Session> {
        let state = self.state.read().unwrap();
        state.sessions.iter().find(|s| s.id == id).cloned()
    }

    /// Snapshot of every session in creation order.
    pub fn sessions(&self) -> Vec<Session> {
        self.state.read().unwrap().sessions.clone()
    }

    /// Number of sessions.
    pub fn len(&self) -> usize {
        self.state.read().unwrap().sessions.len()
    }

    /// Whether the repository holds no sessions. False after `load`.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Best-effort snapshot write. Failure keeps in-memory state as the
    /// source of truth; the next successful write reconciles.
    fn persist(&self, state: &RepoState) {
        if let Err(e) = self.store.save(&state.sessions, &state.active_id) {
            warn!(error = %e, "failed to persist session state");
        }
    }
}

/// Derive a fresh session id from the current time, bumping past any ids
/// already taken by a sub-millisecond creation burst.
fn next_session_id(sessions: &[Session]) -> String {
    let mut stamp = Utc::now().timestamp_millis();
    while sessions.iter().any(|s| s.id == stamp.to_string()) {
        stamp += 1;
    }
    stamp.to_string()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
