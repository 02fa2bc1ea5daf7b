//! Faqchat controllers — the asynchronous request lifecycles.
//!
//! This crate provides:
//! - **presenter**: The `Presenter` trait the presentation layer implements
//! - **conversation**: `ConversationController` — one chat exchange at a
//!   time, applied to the session captured at submission time
//! - **upload**: `UploadController` — fire-and-forget knowledge upload with
//!   progress feedback

pub mod conversation;
pub mod presenter;
pub mod upload;

pub use conversation::ConversationController;
pub use presenter::{EphemeralHandle, Presenter};
pub use upload::UploadController;
