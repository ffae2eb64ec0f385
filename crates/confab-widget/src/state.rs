//! Controller state enums and the host-facing event types.

/// Panel lifecycle. Opening and Closing cover the animation window during
/// which further toggles are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetState {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

impl WidgetState {
    pub fn is_transitioning(&self) -> bool {
        matches!(self, Self::Opening | Self::Closing)
    }
}

/// Whether a submission is currently waiting on the answering service.
/// At most one request is in flight per widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    AwaitingResponse,
}

impl RequestState {
    pub fn is_awaiting(&self) -> bool {
        matches!(self, Self::AwaitingResponse)
    }
}

/// Long-conversation advisory lifecycle. Shown at most once per session;
/// Dismissed persists for the rest of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdvisoryState {
    #[default]
    Hidden,
    Shown,
    Dismissed,
}

/// Where the host should move keyboard focus after a transition settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Launcher,
    Input,
}

/// Key events the host routes to the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    /// Submits the input buffer.
    Enter,
    /// Inserts a newline instead of submitting.
    ShiftEnter,
    /// Closes the panel while it is open.
    Escape,
}

/// How a submission resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty input, unknown retry handle, or a non-retryable card.
    Ignored,
    /// A request was already in flight; nothing changed.
    Busy,
    /// The assistant answered and the reply was appended.
    Answered,
    /// The service reported itself down; a terminal error card was shown.
    ServiceUnavailable,
    /// The service could not be reached; a retryable error card was shown.
    Failed,
    /// The conversation was cleared while the request was in flight; the
    /// reply was discarded.
    Stale,
}
