//! Widget controller: panel lifecycle, submission, retry, advisory, clear.
//!
//! All mutable state sits behind one async mutex; every operation takes the
//! lock, applies its whole step, and releases it, so hosts may call in from
//! any task. Submissions are serialized: while one is in flight, further
//! submits return [`SubmitOutcome::Busy`] without touching anything.

use std::sync::Arc;

use confab_core::{
    AnswerService, Announcer, CONVERSATION_KEY, Conversation, PERF_DISMISSED_KEY, PageContext,
    Priority, Role, SessionStore, TransportError, Turn, escape,
};
use tokio::sync::Mutex;

use crate::host::HostMount;
use crate::markdown::render_assistant_markup;
use crate::options::WidgetOptions;
use crate::state::{AdvisoryState, FocusTarget, Key, RequestState, SubmitOutcome, WidgetState};
use crate::view::{ErrorCardId, ErrorIcon, MessagePane, WidgetChrome};

/// Spoken texts for assistive announcements.
pub const OPENED_ANNOUNCEMENT: &str = "AI Chatbot opened";
pub const MINIMIZED_ANNOUNCEMENT: &str = "AI Chatbot minimized";
pub const TYPING_ANNOUNCEMENT: &str = "AI is typing";
pub const CLEARED_ANNOUNCEMENT: &str = "Conversation cleared";

/// Error-card copy.
pub const SERVICE_DOWN_TEXT: &str = "AI Temporarily Unavailable. Please try again later.";
pub const CONNECTION_ERROR_TEXT: &str =
    "Connection Error. Could not reach the AI. Check your internet connection.";

/// The conversation widget.
///
/// Built with [`mount`](Self::mount); operations that run a timer (`open`,
/// `close`, `toggle`, `clear`) take `self: &Arc<Self>` and finish on a
/// spawned task after the transition window elapses.
pub struct ChatbotWidget {
    service: Arc<dyn AnswerService>,
    store: Arc<dyn SessionStore>,
    announcer: Arc<dyn Announcer>,
    options: WidgetOptions,
    context: PageContext,
    inner: Mutex<WidgetInner>,
}

struct WidgetInner {
    widget_state: WidgetState,
    request: RequestState,
    advisory: AdvisoryState,
    conversation: Conversation,
    last_user_message: Option<String>,
    /// Bumped by `clear`; a reply whose submission captured an older value
    /// is discarded when it lands.
    generation: u64,
    /// Bumped at each transition start so a superseded settle task no-ops.
    transition_epoch: u64,
    pane: MessagePane,
    chrome: WidgetChrome,
}

/// Point-in-time copy of everything the host paints.
#[derive(Debug, Clone)]
pub struct WidgetView {
    pub widget_state: WidgetState,
    pub request: RequestState,
    pub advisory: AdvisoryState,
    pub pane: MessagePane,
    pub chrome: WidgetChrome,
    pub conversation: Vec<Turn>,
    pub message_count: u32,
}

impl ChatbotWidget {
    /// Builds a widget over the host's anchor points, restoring any
    /// conversation persisted earlier this session.
    ///
    /// Returns `None` (after a logged warning) when the mount is missing its
    /// launcher or panel; the embedding page keeps working without the
    /// widget. Restored turns are rendered without announcements, and the
    /// long-conversation advisory reappears when the restored count is at or
    /// past the threshold and was not dismissed.
    pub async fn mount(
        mount: HostMount,
        service: Arc<dyn AnswerService>,
        store: Arc<dyn SessionStore>,
        announcer: Arc<dyn Announcer>,
        options: WidgetOptions,
    ) -> Option<Arc<Self>> {
        if !mount.is_complete() {
            tracing::warn!("widget mount is missing its launcher or panel anchor");
            return None;
        }

        let dismissed = match store.get(PERF_DISMISSED_KEY).await {
            Ok(flag) => flag.as_deref() == Some("true"),
            Err(err) => {
                tracing::warn!("could not read advisory dismissal flag: {err}");
                false
            }
        };
        let conversation = Conversation::restore(store.as_ref()).await;

        let mut pane = MessagePane::new();
        let mut chrome = WidgetChrome::new();
        for turn in conversation.turns() {
            pane.append_turn(turn.role, turn_markup(turn, &options));
        }
        chrome.clear_visible = !conversation.is_empty();

        let advisory = if dismissed {
            AdvisoryState::Dismissed
        } else if conversation.message_count() >= options.advisory_threshold {
            chrome.advisory_visible = true;
            AdvisoryState::Shown
        } else {
            AdvisoryState::Hidden
        };

        let context = PageContext::new(mount.page.clone());
        Some(Arc::new(Self {
            service,
            store,
            announcer,
            options,
            context,
            inner: Mutex::new(WidgetInner {
                widget_state: WidgetState::Closed,
                request: RequestState::Idle,
                advisory,
                conversation,
                last_user_message: None,
                generation: 0,
                transition_epoch: 0,
                pane,
                chrome,
            }),
        }))
    }

    /// Opens the panel unless it is already open or mid-transition.
    ///
    /// ARIA flags flip and the unread badge clears immediately; the state
    /// settles to `Open` (moving focus to the input) once the transition
    /// window elapses.
    pub async fn open(self: &Arc<Self>) {
        let epoch = {
            let mut inner = self.inner.lock().await;
            if inner.widget_state != WidgetState::Closed {
                return;
            }
            inner.widget_state = WidgetState::Opening;
            inner.chrome.panel_hidden = false;
            inner.chrome.launcher_expanded = true;
            inner.chrome.unread_badge = false;
            inner.transition_epoch += 1;
            inner.transition_epoch
        };

        tracing::debug!("widget opening");
        self.announcer.announce(OPENED_ANNOUNCEMENT, Priority::Polite);
        self.settle_after_window(epoch);
    }

    /// Closes the panel unless it is already closed or mid-transition. The
    /// state settles to `Closed` (returning focus to the launcher) once the
    /// transition window elapses.
    pub async fn close(self: &Arc<Self>) {
        let epoch = {
            let mut inner = self.inner.lock().await;
            if inner.widget_state != WidgetState::Open {
                return;
            }
            inner.widget_state = WidgetState::Closing;
            inner.chrome.panel_hidden = true;
            inner.chrome.launcher_expanded = false;
            inner.transition_epoch += 1;
            inner.transition_epoch
        };

        tracing::debug!("widget closing");
        self.announcer
            .announce(MINIMIZED_ANNOUNCEMENT, Priority::Polite);
        self.settle_after_window(epoch);
    }

    /// Launcher click: open when closed, close when open, ignored while a
    /// transition window is running.
    pub async fn toggle(self: &Arc<Self>) {
        let state = self.inner.lock().await.widget_state;
        match state {
            WidgetState::Closed => self.open().await,
            WidgetState::Open => self.close().await,
            WidgetState::Opening | WidgetState::Closing => {}
        }
    }

    fn settle_after_window(self: &Arc<Self>, epoch: u64) {
        let widget = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(widget.options.transition_window).await;
            widget.settle_transition(epoch).await;
        });
    }

    async fn settle_transition(&self, epoch: u64) {
        let mut inner = self.inner.lock().await;
        if inner.transition_epoch != epoch {
            return;
        }
        match inner.widget_state {
            WidgetState::Opening => {
                inner.widget_state = WidgetState::Open;
                inner.chrome.focus = Some(FocusTarget::Input);
            }
            WidgetState::Closing => {
                inner.widget_state = WidgetState::Closed;
                inner.chrome.focus = Some(FocusTarget::Launcher);
            }
            WidgetState::Open | WidgetState::Closed => {}
        }
    }

    /// Submits whatever is in the input control.
    pub async fn submit_input(&self) -> SubmitOutcome {
        let text = self.inner.lock().await.chrome.input.value.clone();
        self.submit(&text).await
    }

    /// Sends `message` to the answering service.
    ///
    /// The user turn is appended (and persisted) optimistically before the
    /// request goes out; the typing indicator shows and the input locks
    /// until the exchange resolves. Transport failures surface as error
    /// cards in the pane, never as an error out of this method. Empty input
    /// is ignored, and a submission while one is in flight returns
    /// [`SubmitOutcome::Busy`] without touching anything.
    pub async fn submit(&self, message: &str) -> SubmitOutcome {
        let message = message.trim();
        if message.is_empty() {
            return SubmitOutcome::Ignored;
        }

        let (generation, context_turns) = {
            let mut inner = self.inner.lock().await;
            if inner.request.is_awaiting() {
                tracing::debug!("submission ignored while a request is in flight");
                return SubmitOutcome::Busy;
            }
            inner.request = RequestState::AwaitingResponse;
            self.stage_exchange(&mut inner, message).await
        };

        self.finish_exchange(message, generation, context_turns).await
    }

    /// Appends the optimistic user turn, shows the typing indicator, locks
    /// the composer, and persists. The caller holds the lock and has already
    /// claimed the in-flight slot.
    async fn stage_exchange(&self, inner: &mut WidgetInner, message: &str) -> (u64, Vec<Turn>) {
        inner.conversation.append(Turn::user(message));
        inner.last_user_message = Some(message.to_string());
        inner.pane.append_turn(Role::User, escape(message));
        inner.chrome.input.clear();
        inner.chrome.clear_visible = true;

        if inner.conversation.message_count() == self.options.advisory_threshold
            && inner.advisory == AdvisoryState::Hidden
        {
            inner.advisory = AdvisoryState::Shown;
            inner.chrome.advisory_visible = true;
            self.announcer
                .announce(WidgetChrome::ADVISORY_TEXT, Priority::Polite);
        }

        if inner.pane.show_typing() {
            self.announcer.announce(TYPING_ANNOUNCEMENT, Priority::Polite);
        }
        inner.chrome.input.disabled = true;
        inner.chrome.submit_disabled = true;

        inner.conversation.persist(self.store.as_ref()).await;
        (
            inner.generation,
            inner.conversation.tail(self.options.context_tail).to_vec(),
        )
    }

    /// Runs the staged exchange to its resolution and releases the claim.
    async fn finish_exchange(
        &self,
        message: &str,
        generation: u64,
        context_turns: Vec<Turn>,
    ) -> SubmitOutcome {
        let answer = self.service.ask(message, &context_turns, &self.context).await;

        let mut inner = self.inner.lock().await;
        inner.pane.hide_typing();
        inner.request = RequestState::Idle;
        inner.chrome.input.disabled = false;
        inner.chrome.submit_disabled = false;

        if inner.generation != generation {
            tracing::debug!("discarding a reply for a cleared conversation");
            return SubmitOutcome::Stale;
        }

        match answer {
            Ok(text) => {
                inner.conversation.append(Turn::assistant(&text));
                inner
                    .pane
                    .append_turn(Role::Assistant, self.assistant_markup(&text));
                if inner.widget_state == WidgetState::Closed {
                    inner.chrome.unread_badge = true;
                }
                inner.conversation.persist(self.store.as_ref()).await;
                self.announcer
                    .announce(&format!("AI says: {text}"), Priority::Polite);
                SubmitOutcome::Answered
            }
            Err(TransportError::ServiceUnavailable) => {
                tracing::error!("answering service unavailable");
                self.push_error(&mut inner, SERVICE_DOWN_TEXT, false, ErrorIcon::ServiceDown);
                SubmitOutcome::ServiceUnavailable
            }
            Err(TransportError::Failed { reason }) => {
                tracing::error!("transport failure: {reason}");
                self.push_error(&mut inner, CONNECTION_ERROR_TEXT, true, ErrorIcon::Warning);
                SubmitOutcome::Failed
            }
        }
    }

    /// Host reaction to a card's "Try Again" control.
    ///
    /// Valid only for a retryable card while nothing is in flight: the card
    /// is removed, the optimistic turn of the failed exchange is spliced out
    /// of both the model and the pane, and the same text goes out again.
    /// The in-flight slot is claimed in the same locked step as the splice,
    /// so no other submission can interleave and orphan the message.
    pub async fn retry(&self, card: ErrorCardId) -> SubmitOutcome {
        let (message, generation, context_turns) = {
            let mut inner = self.inner.lock().await;
            if inner.request.is_awaiting() {
                return SubmitOutcome::Busy;
            }
            let Some((_, retryable)) = inner.pane.error_card(card) else {
                tracing::debug!("retry for an unknown error card");
                return SubmitOutcome::Ignored;
            };
            if !retryable {
                return SubmitOutcome::Ignored;
            }
            let Some(message) = inner.last_user_message.clone() else {
                return SubmitOutcome::Ignored;
            };

            inner.request = RequestState::AwaitingResponse;
            inner.pane.remove_error_card(card);
            if let Some(index) = inner.conversation.find_last_user(&message) {
                inner.conversation.splice_user(index);
                inner.pane.remove_user_turn(&escape(&message));
            }
            let (generation, context_turns) = self.stage_exchange(&mut inner, &message).await;
            (message, generation, context_turns)
        };

        self.finish_exchange(&message, generation, context_turns).await
    }

    /// Empties the conversation, the pane, and both session keys, re-arms
    /// the advisory, and requests a close.
    ///
    /// A reply still in flight when this runs is discarded when it lands.
    /// Confirmation is the host's concern; calling this clears immediately.
    pub async fn clear(self: &Arc<Self>) {
        {
            let mut inner = self.inner.lock().await;
            inner.generation += 1;
            inner.conversation.clear();
            inner.last_user_message = None;
            inner.pane.repaint_empty_state();
            inner.advisory = AdvisoryState::Hidden;
            inner.chrome.advisory_visible = false;
            inner.chrome.clear_visible = false;

            if let Err(err) = self.store.remove(CONVERSATION_KEY).await {
                tracing::warn!("could not remove the persisted conversation: {err}");
            }
            if let Err(err) = self.store.remove(PERF_DISMISSED_KEY).await {
                tracing::warn!("could not remove the advisory dismissal flag: {err}");
            }
        }
        self.close().await;
        self.announcer.announce(CLEARED_ANNOUNCEMENT, Priority::Polite);
    }

    /// Host reaction to the advisory banner's dismiss control. Persists for
    /// the rest of the session.
    pub async fn dismiss_advisory(&self) {
        let mut inner = self.inner.lock().await;
        inner.advisory = AdvisoryState::Dismissed;
        inner.chrome.advisory_visible = false;
        if let Err(err) = self.store.set(PERF_DISMISSED_KEY, "true").await {
            tracing::warn!("could not persist the advisory dismissal: {err}");
        }
    }

    /// Routes a key event from the host.
    ///
    /// Enter submits the input buffer, Shift+Enter inserts a newline, and
    /// Escape closes the open panel. Editing keys are dropped while the
    /// input is locked.
    pub async fn handle_key(self: &Arc<Self>, key: Key) -> Option<SubmitOutcome> {
        match key {
            Key::Enter => Some(self.submit_input().await),
            Key::Escape => {
                let open = self.inner.lock().await.widget_state == WidgetState::Open;
                if open {
                    self.close().await;
                }
                None
            }
            Key::Char(ch) => {
                let mut inner = self.inner.lock().await;
                if !inner.chrome.input.disabled {
                    inner.chrome.input.value.push(ch);
                }
                None
            }
            Key::ShiftEnter => {
                let mut inner = self.inner.lock().await;
                if !inner.chrome.input.disabled {
                    inner.chrome.input.value.push('\n');
                }
                None
            }
            Key::Backspace => {
                let mut inner = self.inner.lock().await;
                if !inner.chrome.input.disabled {
                    inner.chrome.input.value.pop();
                }
                None
            }
        }
    }

    /// Point-in-time snapshot for painting and assertions.
    pub async fn view(&self) -> WidgetView {
        let inner = self.inner.lock().await;
        WidgetView {
            widget_state: inner.widget_state,
            request: inner.request,
            advisory: inner.advisory,
            pane: inner.pane.clone(),
            chrome: inner.chrome.clone(),
            conversation: inner.conversation.turns().to_vec(),
            message_count: inner.conversation.message_count(),
        }
    }

    fn push_error(&self, inner: &mut WidgetInner, text: &str, retryable: bool, icon: ErrorIcon) {
        inner.pane.push_error_card(text, retryable, icon);
        self.announcer
            .announce(&format!("Error: {text}"), Priority::Assertive);
    }

    fn assistant_markup(&self, text: &str) -> String {
        if self.options.render_assistant_markdown {
            render_assistant_markup(text)
        } else {
            escape(text)
        }
    }
}

fn turn_markup(turn: &Turn, options: &WidgetOptions) -> String {
    match turn.role {
        Role::Assistant if options.render_assistant_markdown => {
            render_assistant_markup(&turn.content)
        }
        Role::User | Role::Assistant => escape(&turn.content),
    }
}
