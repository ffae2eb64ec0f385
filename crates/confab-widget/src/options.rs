//! Behavior knobs for the widget. Tests shrink the timing values instead of
//! patching time; hosts mostly take the defaults.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct WidgetOptions {
    /// How long the open/close animation runs before the state settles.
    pub transition_window: Duration,
    /// User-turn count at which the long-conversation advisory appears.
    pub advisory_threshold: u32,
    /// Cap on the trailing turns sent to the service as context; `None`
    /// sends the whole conversation.
    pub context_tail: Option<usize>,
    /// Render assistant turns as sanitized markdown instead of escaped text.
    pub render_assistant_markdown: bool,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            transition_window: Duration::from_millis(250),
            advisory_threshold: 30,
            context_tail: None,
            render_assistant_markdown: false,
        }
    }
}

impl WidgetOptions {
    pub fn with_transition_window(mut self, window: Duration) -> Self {
        self.transition_window = window;
        self
    }

    pub fn with_advisory_threshold(mut self, threshold: u32) -> Self {
        self.advisory_threshold = threshold;
        self
    }

    pub fn with_context_tail(mut self, limit: usize) -> Self {
        self.context_tail = Some(limit);
        self
    }

    pub fn with_markdown(mut self) -> Self {
        self.render_assistant_markdown = true;
        self
    }
}
