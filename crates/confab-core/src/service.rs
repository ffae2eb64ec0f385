//! Answering-service seam.
//!
//! A single request/response exchange with the answering service, classified
//! into a closed set of outcomes the controller branches on. The HTTP
//! implementation lives in `confab-transport`; tests script this trait
//! directly.

use crate::turn::Turn;
use async_trait::async_trait;
use thiserror::Error;

/// Classified failure of one exchange with the answering service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The service signalled it is not currently answering (HTTP 503).
    /// Surfaced as a non-retryable error card.
    #[error("answering service unavailable")]
    ServiceUnavailable,

    /// The request did not complete, or completed with anything other than a
    /// well-formed 2xx answer. Surfaced as a retryable error card.
    #[error("transport failure: {reason}")]
    Failed { reason: String },
}

impl TransportError {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    /// Whether the widget offers an explicit retry for this failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Page context forwarded with every exchange so the service can ground its
/// answer in what the user is looking at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    /// Path of the hosting page, e.g. `/dashboard`.
    pub page: String,
}

impl PageContext {
    pub fn new(page: impl Into<String>) -> Self {
        Self { page: page.into() }
    }
}

/// One request/response exchange with the answering service.
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Sends `message` with the conversation tail and page context, returning
    /// the answer text or a classified failure.
    ///
    /// Implementations perform no retries of their own; retry is an explicit
    /// user action surfaced by the controller.
    async fn ask(
        &self,
        message: &str,
        conversation: &[Turn],
        context: &PageContext,
    ) -> Result<String, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_plain_failures_are_retryable() {
        assert!(!TransportError::ServiceUnavailable.is_retryable());
        assert!(TransportError::failed("connection refused").is_retryable());
    }
}
