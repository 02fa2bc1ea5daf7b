//! Session repository — the process-wide collection of conversations.
//!
//! One repository instance is created at startup from a [`crate::StateStore`]
//! and shared (via `Arc`) with every controller that mutates it. Each
//! mutation persists synchronously, best effort.

pub mod repository;

pub use repository::{SessionError, SessionRepository};
