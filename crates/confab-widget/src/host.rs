//! Mount description handed over by the embedding host.

/// Anchor points the host found for the widget.
///
/// `launcher` and `panel` name the host's toggle control and panel container;
/// both must be present or the widget refuses to mount and the page keeps
/// working without it. `page` is the host location forwarded to the
/// answering service with every question.
#[derive(Debug, Clone)]
pub struct HostMount {
    pub launcher: Option<String>,
    pub panel: Option<String>,
    pub page: String,
}

impl HostMount {
    pub fn new(page: impl Into<String>) -> Self {
        Self {
            launcher: None,
            panel: None,
            page: page.into(),
        }
    }

    pub fn with_launcher(mut self, id: impl Into<String>) -> Self {
        self.launcher = Some(id.into());
        self
    }

    pub fn with_panel(mut self, id: impl Into<String>) -> Self {
        self.panel = Some(id.into());
        self
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.launcher.is_some() && self.panel.is_some()
    }
}
