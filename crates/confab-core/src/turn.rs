//! Conversation turn types.

use serde::{Deserialize, Serialize};

/// The author of a turn.
///
/// Serialized lowercase; the same spelling is used on the wire and in the
/// session snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person typing into the widget.
    User,
    /// The answering service.
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `{role, content}` message within a conversation.
///
/// Turns are immutable once appended to a [`Conversation`](crate::Conversation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            r#""assistant""#
        );
    }

    #[test]
    fn test_turn_wire_shape() {
        let turn = Turn::user("hello");
        assert_eq!(
            serde_json::to_string(&turn).unwrap(),
            r#"{"role":"user","content":"hello"}"#
        );
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let err = serde_json::from_str::<Turn>(r#"{"role":"ai","content":"x"}"#);
        assert!(err.is_err(), "legacy role spellings are not accepted");
    }
}
