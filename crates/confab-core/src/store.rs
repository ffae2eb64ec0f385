//! Session-scoped key/value store seam.
//!
//! The widget mirrors its conversation and advisory state into a store whose
//! contents live exactly as long as the browsing/application session. The
//! trait is narrow on purpose: hosts that embed the widget behind a real
//! `sessionStorage`-like facility implement these three operations and
//! nothing else.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::Mutex;

/// Store key holding the serialized conversation snapshot.
pub const CONVERSATION_KEY: &str = "chatbot-conversation";

/// Store key holding `"true"` iff the performance advisory was dismissed.
pub const PERF_DISMISSED_KEY: &str = "chatbot-perf-dismissed";

/// Error raised by a session store backend.
///
/// Callers treat every store failure as fail-open: a failed read is "no prior
/// session", a failed write is logged and dropped.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("session store backend error: {0}")]
    Backend(String),
}

/// A narrow get/set/remove interface over per-session key/value storage.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Reads a value, `None` when the key has never been written.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes a key; removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory [`SessionStore`].
///
/// This is the production store for process-hosted widgets: session scope and
/// process scope coincide, so the map is discarded exactly when the session
/// ends.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() {
        let store = MemorySessionStore::new();
        store.set("alpha", "1").await.unwrap();
        assert_eq!(store.get("alpha").await.unwrap(), Some("1".to_string()));
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = MemorySessionStore::new();
        store.set("alpha", "1").await.unwrap();
        store.set("alpha", "2").await.unwrap();
        assert_eq!(store.get("alpha").await.unwrap(), Some("2".to_string()));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let store = MemorySessionStore::new();
        store.set("alpha", "1").await.unwrap();
        store.remove("alpha").await.unwrap();
        store.remove("alpha").await.unwrap();
        assert_eq!(store.get("alpha").await.unwrap(), None);
    }
}
