//! Typed view tree the embedding host paints.
//!
//! The widget never touches a real document. It maintains a [`MessagePane`]
//! node list plus a [`WidgetChrome`] flag set, and the host mirrors both into
//! whatever surface it renders. Turn markup is produced by the controller
//! (escaped, or sanitized markdown for assistant turns) before it lands here.

use confab_core::Role;
use uuid::Uuid;

use crate::state::FocusTarget;

/// Handle for one error card, used to target a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCardId(Uuid);

impl ErrorCardId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ErrorCardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Icon slot on an error card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorIcon {
    /// The answering service reported itself down.
    ServiceDown,
    /// The service could not be reached.
    Warning,
}

impl ErrorIcon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ServiceDown => "🤖",
            Self::Warning => "⚠️",
        }
    }
}

/// One rendered node in the message pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaneNode {
    /// A conversation turn; `markup` is ready to paint.
    Turn { role: Role, markup: String },
    /// The animated typing indicator, labelled "AI is typing".
    Typing,
    /// An error card; retryable cards render a "Try Again" control.
    ErrorCard {
        id: ErrorCardId,
        text: String,
        retryable: bool,
        icon: ErrorIcon,
    },
}

/// The scrollable message list.
#[derive(Debug, Clone)]
pub struct MessagePane {
    nodes: Vec<PaneNode>,
    empty_state_visible: bool,
    scroll_token: u64,
}

impl Default for MessagePane {
    fn default() -> Self {
        Self::new()
    }
}

impl MessagePane {
    /// Greeting shown while the pane has no nodes.
    pub const EMPTY_STATE_TEXT: &'static str =
        "Hello! How can I help you understand the markets today?";

    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            empty_state_visible: true,
            scroll_token: 0,
        }
    }

    pub fn nodes(&self) -> &[PaneNode] {
        &self.nodes
    }

    pub fn empty_state_visible(&self) -> bool {
        self.empty_state_visible
    }

    /// Monotonic counter bumped whenever the host should pin the pane to its
    /// bottom edge.
    pub fn scroll_token(&self) -> u64 {
        self.scroll_token
    }

    pub fn append_turn(&mut self, role: Role, markup: impl Into<String>) {
        self.empty_state_visible = false;
        self.nodes.push(PaneNode::Turn {
            role,
            markup: markup.into(),
        });
        self.scroll_to_bottom();
    }

    /// Shows the typing indicator. Returns `false` (and changes nothing)
    /// when one is already visible.
    pub fn show_typing(&mut self) -> bool {
        if self.typing_visible() {
            return false;
        }
        self.nodes.push(PaneNode::Typing);
        self.scroll_to_bottom();
        true
    }

    pub fn hide_typing(&mut self) {
        self.nodes.retain(|node| !matches!(node, PaneNode::Typing));
    }

    pub fn typing_visible(&self) -> bool {
        self.nodes.iter().any(|node| matches!(node, PaneNode::Typing))
    }

    pub fn push_error_card(
        &mut self,
        text: impl Into<String>,
        retryable: bool,
        icon: ErrorIcon,
    ) -> ErrorCardId {
        let id = ErrorCardId::new();
        self.nodes.push(PaneNode::ErrorCard {
            id,
            text: text.into(),
            retryable,
            icon,
        });
        self.scroll_to_bottom();
        id
    }

    /// Looks up a card's text and retryability.
    pub fn error_card(&self, id: ErrorCardId) -> Option<(&str, bool)> {
        self.nodes.iter().find_map(|node| match node {
            PaneNode::ErrorCard {
                id: card,
                text,
                retryable,
                ..
            } if *card == id => Some((text.as_str(), *retryable)),
            _ => None,
        })
    }

    /// Removes the card; unknown handles change nothing.
    pub fn remove_error_card(&mut self, id: ErrorCardId) -> bool {
        let before = self.nodes.len();
        self.nodes
            .retain(|node| !matches!(node, PaneNode::ErrorCard { id: card, .. } if *card == id));
        self.nodes.len() != before
    }

    /// Removes the rightmost user turn matching `markup`, mirroring a model
    /// splice; unknown markup changes nothing.
    pub fn remove_user_turn(&mut self, markup: &str) -> bool {
        let index = self.nodes.iter().rposition(|node| {
            matches!(node, PaneNode::Turn { role: Role::User, markup: m } if m == markup)
        });
        match index {
            Some(index) => {
                self.nodes.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_token += 1;
    }

    /// Drops every node and brings the greeting back.
    pub fn repaint_empty_state(&mut self) {
        self.nodes.clear();
        self.empty_state_visible = true;
    }
}

/// The message input and its lock flag. Locked while a request is in
/// flight; the controller drops editing keys during that window.
#[derive(Debug, Clone, Default)]
pub struct InputControl {
    pub value: String,
    pub disabled: bool,
}

impl InputControl {
    pub fn clear(&mut self) {
        self.value.clear();
    }
}

/// Panel chrome mirrored by the host: ARIA flags, unread badge, advisory
/// banner, clear affordance, input, and the pending focus move.
#[derive(Debug, Clone)]
pub struct WidgetChrome {
    /// `aria-hidden` on the panel.
    pub panel_hidden: bool,
    /// `aria-expanded` on the launcher.
    pub launcher_expanded: bool,
    /// Unread marker on the launcher; set when a reply lands while closed.
    pub unread_badge: bool,
    /// Long-conversation advisory banner.
    pub advisory_visible: bool,
    /// Clear-conversation affordance, shown once any turn exists.
    pub clear_visible: bool,
    pub input: InputControl,
    pub submit_disabled: bool,
    /// Where the host should move focus after the latest settle.
    pub focus: Option<FocusTarget>,
}

impl WidgetChrome {
    /// Badge glyph and its accessible label.
    pub const BADGE_TEXT: &'static str = "1";
    pub const BADGE_LABEL: &'static str = "1 new message";
    /// Advisory banner copy, also spoken when the banner appears.
    pub const ADVISORY_TEXT: &'static str = "Long conversation may affect performance";

    pub fn new() -> Self {
        Self {
            panel_hidden: true,
            launcher_expanded: false,
            unread_badge: false,
            advisory_visible: false,
            clear_visible: false,
            input: InputControl::default(),
            submit_disabled: false,
            focus: None,
        }
    }
}

impl Default for WidgetChrome {
    fn default() -> Self {
        Self::new()
    }
}
