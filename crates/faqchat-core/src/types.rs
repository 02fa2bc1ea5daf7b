//! Core types for Faqchat — the chat transcript data model.
//!
//! A transcript is an ordered sequence of [`Message`]s, each authored by one
//! of two [`Sender`]s. Messages are immutable once appended; ordering is
//! append order and carries no further identity.

use serde::{Deserialize, Serialize};

/// The greeting every fresh conversation starts with.
pub const GREETING: &str = "Hello! Ask me anything about our FAQs.";

// ─────────────────────────────────────────────
// Sender
// ─────────────────────────────────────────────

/// Who authored a message.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// Transcript label used in exports (`[You]:` / `[AI Assistant]:`).
    pub fn label(self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Bot => "AI Assistant",
        }
    }
}

// ─────────────────────────────────────────────
// Message
// ─────────────────────────────────────────────

/// One entry in a conversation transcript.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

impl Message {
    /// Create a user-authored message.
    pub fn user(text: impl Into<String>) -> Self {
        Message {
            sender: Sender::User,
            text: text.into(),
        }
    }

    /// Create a bot-authored message.
    pub fn bot(text: impl Into<String>) -> Self {
        Message {
            sender: Sender::Bot,
            text: text.into(),
        }
    }
}

// ─────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────

/// A named conversation with its full message history.
///
/// Sessions are only ever created or appended to — there is no deletion.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Opaque unique id, derived from the creation time.
    pub id: String,
    /// Display title (e.g. `"Chat 3"`).
    pub title: String,
    /// Transcript in append order. Never empty for a freshly created session.
    pub messages: Vec<Message>,
}

impl Session {
    /// Create a new session seeded with the greeting.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Session {
            id: id.into(),
            title: title.into(),
            messages: vec![Message::bot(GREETING)],
        }
    }

    /// Drop the transcript and start over from a fresh greeting.
    pub fn reset(&mut self) {
        self.messages = vec![Message::bot(GREETING)];
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
