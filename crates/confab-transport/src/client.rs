//! HTTP implementation of the [`AnswerService`] seam.

use std::time::Duration;

use async_trait::async_trait;
use confab_core::{AnswerService, PageContext, TransportError, Turn};
use reqwest::{Client, StatusCode};

use crate::wire::{AskRequest, AskResponse, WireContext};

const ANSWER_PATH: &str = "/api/chatbot";
const CSRF_HEADER: &str = "X-CSRFToken";

/// Client for the answering service's JSON endpoint.
///
/// A `503` from the service maps to [`TransportError::ServiceUnavailable`];
/// every other failure (connect, timeout, non-2xx, malformed body) maps to
/// [`TransportError::Failed`], which the widget treats as retryable.
#[derive(Clone)]
pub struct HttpAnswerClient {
    client: Client,
    endpoint: String,
    csrf_token: Option<String>,
    timeout: Option<Duration>,
}

impl HttpAnswerClient {
    /// Creates a client for the service hosted at `base_url`.
    ///
    /// The answer path is fixed; only the origin varies per deployment.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base = base_url.into();
        Self {
            client: Client::new(),
            endpoint: format!("{}{ANSWER_PATH}", base.trim_end_matches('/')),
            csrf_token: None,
            timeout: None,
        }
    }

    /// Adds a CSRF token sent as `X-CSRFToken` on every request.
    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    /// Bounds each request; an elapsed timeout surfaces as a retryable
    /// transport failure.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AnswerService for HttpAnswerClient {
    async fn ask(
        &self,
        message: &str,
        conversation: &[Turn],
        context: &PageContext,
    ) -> Result<String, TransportError> {
        let body = AskRequest {
            message,
            conversation,
            context: WireContext {
                page: &context.page,
            },
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.csrf_token {
            request = request.header(CSRF_HEADER, token);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|err| TransportError::failed(describe_send_error(&err)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("answering service returned {status}");
            return Err(classify_status(status));
        }

        let parsed: AskResponse = response
            .json()
            .await
            .map_err(|err| TransportError::failed(format!("malformed answer payload: {err}")))?;
        Ok(parsed.response)
    }
}

fn classify_status(status: StatusCode) -> TransportError {
    if status == StatusCode::SERVICE_UNAVAILABLE {
        TransportError::ServiceUnavailable
    } else {
        TransportError::failed(format!("answering service returned {status}"))
    }
}

fn describe_send_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        "could not connect to the answering service".to_string()
    } else {
        format!("request failed: {err}")
    }
}
