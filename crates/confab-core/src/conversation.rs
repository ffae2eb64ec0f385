//! Conversation model.
//!
//! An ordered sequence of [`Turn`]s together with the session message
//! counter, plus the snapshot format mirrored into the session store on
//! every write. Restore is fail-open: a missing, unreadable, or malformed
//! snapshot yields an empty conversation and a logged warning, never an
//! error out of construction.

use crate::store::{CONVERSATION_KEY, SessionStore};
use crate::turn::{Role, Turn};
use serde::{Deserialize, Serialize};

/// Serialized form of a conversation, as written under
/// [`CONVERSATION_KEY`](crate::store::CONVERSATION_KEY).
///
/// Field names are part of the stored payload and must not change:
/// `{"conversation": [{"role", "content"}…], "messageCount": n}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSnapshot {
    #[serde(default)]
    pub conversation: Vec<Turn>,
    #[serde(rename = "messageCount", default)]
    pub message_count: u32,
}

/// The in-memory ordered sequence of turns for one widget instance.
///
/// The message counter counts user turns submitted this session; appending a
/// user turn increments it and splicing one back out decrements it, so the
/// retry path cannot let the two drift apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    turns: Vec<Turn>,
    message_count: u32,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn in submission/response order.
    pub fn append(&mut self, turn: Turn) {
        if turn.role == Role::User {
            self.message_count += 1;
        }
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Number of user turns submitted this session.
    pub fn message_count(&self) -> u32 {
        self.message_count
    }

    /// The most recent turns, newest last.
    ///
    /// `None` means the whole conversation; this is what gets sent to the
    /// answering service as context.
    pub fn tail(&self, limit: Option<usize>) -> &[Turn] {
        match limit {
            Some(n) if n < self.turns.len() => &self.turns[self.turns.len() - n..],
            _ => &self.turns,
        }
    }

    /// Index of the rightmost user turn with exactly this content.
    ///
    /// Used by the retry path to locate the optimistic turn of a failed
    /// exchange.
    pub fn find_last_user(&self, content: &str) -> Option<usize> {
        self.turns
            .iter()
            .rposition(|turn| turn.role == Role::User && turn.content == content)
    }

    /// Removes the user turn at `index`, decrementing the message counter.
    ///
    /// Returns `None` (and leaves the conversation untouched) when the index
    /// is out of bounds or does not hold a user turn.
    pub fn splice_user(&mut self, index: usize) -> Option<Turn> {
        if self.turns.get(index)?.role != Role::User {
            return None;
        }
        self.message_count = self.message_count.saturating_sub(1);
        Some(self.turns.remove(index))
    }

    /// Drops every turn and resets the counter.
    pub fn clear(&mut self) {
        self.turns.clear();
        self.message_count = 0;
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        ConversationSnapshot {
            conversation: self.turns.clone(),
            message_count: self.message_count,
        }
    }

    pub fn from_snapshot(snapshot: ConversationSnapshot) -> Self {
        Self {
            turns: snapshot.conversation,
            message_count: snapshot.message_count,
        }
    }

    /// Mirrors the current snapshot into the session store.
    ///
    /// Store failures are logged and dropped; the in-memory conversation
    /// stays authoritative for the rest of the session.
    pub async fn persist(&self, store: &dyn SessionStore) {
        let payload = match serde_json::to_string(&self.snapshot()) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!("could not serialize conversation snapshot: {err}");
                return;
            }
        };
        if let Err(err) = store.set(CONVERSATION_KEY, &payload).await {
            tracing::warn!("could not persist conversation snapshot: {err}");
        }
    }

    /// Loads the conversation persisted by a prior construction this session.
    ///
    /// A read error or malformed payload is treated as "no prior session".
    pub async fn restore(store: &dyn SessionStore) -> Self {
        let raw = match store.get(CONVERSATION_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::new(),
            Err(err) => {
                tracing::warn!("session store read failed, starting empty: {err}");
                return Self::new();
            }
        };
        match serde_json::from_str::<ConversationSnapshot>(&raw) {
            Ok(snapshot) => Self::from_snapshot(snapshot),
            Err(err) => {
                tracing::warn!("could not restore conversation from session store: {err}");
                Self::new()
            }
        }
    }
}
