//! Widget layer for Confab: the controller state machine, the typed view
//! tree the host paints, the live-region announcer, and the sanitizing
//! markdown renderer for assistant turns.
//!
//! The widget never touches a real document: hosts hand in a [`HostMount`]
//! plus the seams from `confab-core` (answer service, session store,
//! announcer) and paint from [`controller::WidgetView`] snapshots.

pub mod announcer;
pub mod controller;
pub mod host;
pub mod markdown;
pub mod options;
pub mod state;
pub mod view;

pub use announcer::LiveRegion;
pub use controller::{ChatbotWidget, WidgetView};
pub use host::HostMount;
pub use options::WidgetOptions;
pub use state::{AdvisoryState, FocusTarget, Key, RequestState, SubmitOutcome, WidgetState};
pub use view::{ErrorCardId, ErrorIcon, InputControl, MessagePane, PaneNode, WidgetChrome};
