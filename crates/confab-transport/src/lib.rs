//! HTTP transport for the Confab answering service.
//!
//! [`HttpAnswerClient`] implements the [`AnswerService`] seam from
//! `confab-core` against the service's JSON endpoint. Hosts that answer
//! locally (tests, offline demos) skip this crate entirely and provide
//! their own [`AnswerService`].
//!
//! [`AnswerService`]: confab_core::AnswerService

mod client;
mod wire;

pub use client::HttpAnswerClient;
pub use wire::{AskRequest, AskResponse, WireContext};
