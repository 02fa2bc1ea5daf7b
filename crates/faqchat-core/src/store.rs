//! Durable session state — two slots on disk under the state directory.
//!
//! - `sessions.json` — every session as a JSON array in creation order
//! - `active_session` — the active session id as a bare string
//!
//! Loading never fails: missing or unreadable state degrades to "no prior
//! state" so startup always succeeds.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::types::Session;
use crate::utils;

const SESSIONS_FILE: &str = "sessions.json";
const ACTIVE_FILE: &str = "active_session";

/// File-backed snapshot of the session collection and active-session pointer.
pub struct StateStore {
    /// Directory holding both state files.
    state_dir: PathBuf,
}

impl StateStore {
    /// Create a new state store.
    ///
    /// `state_dir` defaults to `~/.faqchat/state/` if `None`.
    /// The directory is created if it doesn't exist.
    pub fn new(state_dir: Option<PathBuf>) -> std::io::Result<Self> {
        let dir = state_dir.unwrap_or_else(utils::get_state_path);
        std::fs::create_dir_all(&dir)?;

        Ok(StateStore { state_dir: dir })
    }

    /// Write both slots.
    pub fn save(&self, sessions: &[Session], active_id: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(sessions)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        std::fs::write(self.state_dir.join(SESSIONS_FILE), json)?;
        std::fs::write(self.state_dir.join(ACTIVE_FILE), active_id)?;

        debug!(
            sessions = sessions.len(),
            "state saved to {}",
            self.state_dir.display()
        );
        Ok(())
    }

    /// Read both slots.
    ///
    /// Returns `(empty, None)` when no sessions were saved or the sessions
    /// slot cannot be deserialized.
    pub fn load(&self) -> (Vec<Session>, Option<String>) {
        let sessions_path = self.state_dir.join(SESSIONS_FILE);
        if !sessions_path.exists() {
            return (Vec::new(), None);
        }

        let content = match std::fs::read_to_string(&sessions_path) {
            Ok(c) => c,
            Err(e) => {
                warn!("failed to read {}: {}", sessions_path.display(), e);
                return (Vec::new(), None);
            }
        };

        let sessions: Vec<Session> = match serde_json::from_str(&content) {
            Ok(s) => s,
            Err(e) => {
                warn!("discarding unreadable session state: {}", e);
                return (Vec::new(), None);
            }
        };

        let active_id = std::fs::read_to_string(self.state_dir.join(ACTIVE_FILE))
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        debug!(
            sessions = sessions.len(),
            active = active_id.as_deref().unwrap_or("-"),
            "state loaded from {}",
            self.state_dir.display()
        );
        (sessions, active_id)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
