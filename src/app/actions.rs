//! Side effects requested by the event handler.
//!
//! The handler never talks to Zellij directly. It returns a `Vec<Action>`
//! after every event and the plugin shim carries them out in order:
//!
//! - [`Action::Http`] → `web_request`, answered later by
//!   `Event::HttpResponse`
//! - [`Action::ScheduleTimer`] → `set_timeout`, answered by `Event::Timer`
//! - [`Action::CloseFocus`] → `hide_self`

use crate::gateway::HttpRequest;
use std::time::Duration;

/// Commands for the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hides the plugin pane.
    CloseFocus,

    /// Sends a request. The response must come back carrying the same
    /// request id.
    Http(HttpRequest),

    /// Asks for an `Event::Timer` after the given delay.
    ///
    /// Used for debounce deadlines and notice expiry. Timers cannot be
    /// cancelled; a timer that fires early is simply a no-op.
    ScheduleTimer(Duration),
}
