//! Assistive-announcement seam.

/// Live-region priority: polite announcements wait for the reader to pause,
/// assertive ones interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Polite,
    Assertive,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Polite => "polite",
            Priority::Assertive => "assertive",
        }
    }
}

/// A single transient announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub text: String,
    pub priority: Priority,
}

impl Announcement {
    pub fn new(text: impl Into<String>, priority: Priority) -> Self {
        Self {
            text: text.into(),
            priority,
        }
    }
}

/// Emits transient assistive-technology announcements.
///
/// The widget announces every state change through this seam; the production
/// implementation is the live region in `confab-widget`, tests install a
/// recording double.
pub trait Announcer: Send + Sync {
    fn announce(&self, text: &str, priority: Priority);
}
