//! Transient one-line notices shown above the footer.
//!
//! Every mutation outcome and every new fetch failure becomes one notice.
//! Notices expire after [`NOTICE_TTL`], the queue keeps at most
//! [`MAX_NOTICES`], and re-posting a message that is still visible only
//! extends its lifetime.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How long a notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Upper bound on queued notices.
pub const MAX_NOTICES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub expires_at: Instant,
}

#[derive(Debug, Clone)]
pub struct Notices {
    queue: VecDeque<Notice>,
    ttl: Duration,
}

impl Default for Notices {
    fn default() -> Self {
        Self::new(NOTICE_TTL)
    }
}

impl Notices {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            queue: VecDeque::with_capacity(MAX_NOTICES),
            ttl,
        }
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Queues a notice, dropping the oldest one when full.
    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>, now: Instant) {
        let message = message.into();
        let expires_at = now + self.ttl;

        if let Some(existing) = self
            .queue
            .iter_mut()
            .find(|n| n.level == level && n.message == message)
        {
            existing.expires_at = expires_at;
            return;
        }

        tracing::debug!(?level, message = %message, "notice");
        if self.queue.len() == MAX_NOTICES {
            self.queue.pop_front();
        }
        self.queue.push_back(Notice {
            level,
            message,
            expires_at,
        });
    }

    /// Drops expired notices. Returns whether anything was removed.
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.queue.len();
        self.queue.retain(|n| n.expires_at > now);
        before != self.queue.len()
    }

    /// Removes every error notice.
    pub fn clear_errors(&mut self) {
        self.queue.retain(|n| n.level != NoticeLevel::Error);
    }

    /// The newest notice, shown in the status line.
    #[must_use]
    pub fn latest(&self) -> Option<&Notice> {
        self.queue.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.queue.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_message_is_not_duplicated() {
        let now = Instant::now();
        let mut notices = Notices::default();
        notices.push(NoticeLevel::Error, "offline", now);
        notices.push(NoticeLevel::Error, "offline", now + Duration::from_secs(3));

        assert_eq!(notices.len(), 1);
        assert!(!notices.prune(now + Duration::from_secs(5)));
        assert!(notices.prune(now + Duration::from_secs(8)));
    }

    #[test]
    fn queue_is_bounded() {
        let now = Instant::now();
        let mut notices = Notices::default();
        for n in 0..5 {
            notices.push(NoticeLevel::Info, format!("notice {n}"), now);
        }

        assert_eq!(notices.len(), MAX_NOTICES);
        assert_eq!(notices.latest().map(|n| n.message.as_str()), Some("notice 4"));
        assert_eq!(notices.iter().next().map(|n| n.message.as_str()), Some("notice 2"));
    }

    #[test]
    fn clear_errors_keeps_other_levels() {
        let now = Instant::now();
        let mut notices = Notices::default();
        notices.push(NoticeLevel::Success, "Note deleted", now);
        notices.push(NoticeLevel::Error, "offline", now);

        notices.clear_errors();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices.latest().map(|n| n.level), Some(NoticeLevel::Success));
    }
}
