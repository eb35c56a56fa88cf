//! Trailing-edge debounce driven by deadlines.
//!
//! Zellij timers cannot be cancelled, so instead of cancelling we move the
//! deadline. Every timer that fires calls [`Debouncer::poll`]; only a poll at
//! or after the latest deadline reports [`DebouncePoll::Ready`].

use std::time::{Duration, Instant};

/// Default quiet period before input settles.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(500);

/// Result of polling a [`Debouncer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebouncePoll {
    /// Nothing armed.
    Idle,
    /// Armed, with this much quiet time still to go.
    Waiting(Duration),
    /// The quiet period elapsed. The debouncer is disarmed again.
    Ready,
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl Debouncer {
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// (Re)arms the deadline to `now + window` and returns the delay to wait.
    pub fn arm(&mut self, now: Instant) -> Duration {
        self.deadline = Some(now + self.window);
        self.window
    }

    pub fn poll(&mut self, now: Instant) -> DebouncePoll {
        match self.deadline {
            None => DebouncePoll::Idle,
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                DebouncePoll::Ready
            }
            Some(deadline) => DebouncePoll::Waiting(deadline - now),
        }
    }

    /// Disarms without firing. Returns whether anything was armed.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }
}
