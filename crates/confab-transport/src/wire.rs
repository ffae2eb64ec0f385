//! Request and response bodies for the answering service endpoint.
//!
//! The shapes here are part of the service contract and must not change:
//! the request is `{"message", "conversation", "context": {"page"}}` and a
//! successful response is `{"response": "..."}`.

use confab_core::Turn;
use serde::{Deserialize, Serialize};

/// Body of a `POST` to the answering service.
///
/// `conversation` carries the prior turns in order, including the user turn
/// being asked about, so the service sees the same history the widget shows.
#[derive(Debug, Serialize)]
pub struct AskRequest<'a> {
    pub message: &'a str,
    pub conversation: &'a [Turn],
    pub context: WireContext<'a>,
}

/// Page context forwarded with every question.
#[derive(Debug, Serialize)]
pub struct WireContext<'a> {
    pub page: &'a str,
}

/// Successful answer payload. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub struct AskResponse {
    pub response: String,
}
