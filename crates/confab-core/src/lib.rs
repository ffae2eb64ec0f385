//! Core domain layer for the Confab chat widget.
//!
//! This crate holds everything the widget controller reasons about that is
//! independent of any particular host surface or transport:
//!
//! - `turn` / `conversation`: the ordered multi-turn conversation model with
//!   its message counter and session snapshot format
//! - `escape`: entity escaping for untrusted text
//! - `store`: the session-scoped key/value store seam and its in-memory
//!   implementation
//! - `service`: the answering-service seam and its outcome classification
//! - `announce`: the assistive-announcement seam
//!
//! Concrete transports and view layers live in `confab-transport` and
//! `confab-widget`.

pub mod announce;
pub mod conversation;
pub mod escape;
pub mod service;
pub mod store;
pub mod turn;

pub use announce::{Announcement, Announcer, Priority};
pub use conversation::{Conversation, ConversationSnapshot};
pub use escape::escape;
pub use service::{AnswerService, PageContext, TransportError};
pub use store::{
    CONVERSATION_KEY, MemorySessionStore, PERF_DISMISSED_KEY, SessionStore, StoreError,
};
pub use turn::{Role, Turn};
