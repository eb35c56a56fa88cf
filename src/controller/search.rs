//! Search text and current page for the visible list.

use super::debounce::{DebouncePoll, Debouncer};
use crate::cache::{normalize_search, QueryKey};
use crate::domain::ResourceKind;
use std::time::{Duration, Instant};

/// Why the active query changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCause {
    /// A new search term settled.
    Search,
    /// The user moved to another page.
    Page,
    /// The user switched collections.
    Resource,
    /// The search was cleared.
    Reset,
}

/// Events the controller emits for the rest of the app to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// The active cache key is now `key`.
    QueryChanged { key: QueryKey, cause: ChangeCause },
    /// The list should scroll back to its first row.
    ScrollToTop,
}

/// Owns the search input, the settled term and the current page.
///
/// `settled_term` lags `raw_input` by the debounce window. A change of the
/// settled term always sends the page back to 1; nothing else does.
#[derive(Debug, Clone)]
pub struct SearchController {
    resource: ResourceKind,
    raw_input: String,
    settled_term: String,
    current_page: u32,
    total_pages: u32,
    debouncer: Debouncer,
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new(ResourceKind::Notes, Debouncer::default().window())
    }
}

impl SearchController {
    #[must_use]
    pub const fn new(resource: ResourceKind, window: Duration) -> Self {
        Self {
            resource,
            raw_input: String::new(),
            settled_term: String::new(),
            current_page: 1,
            total_pages: 0,
            debouncer: Debouncer::new(window),
        }
    }

    #[must_use]
    pub const fn resource(&self) -> ResourceKind {
        self.resource
    }

    #[must_use]
    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    #[must_use]
    pub fn settled_term(&self) -> &str {
        &self.settled_term
    }

    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Whether typed input is still waiting to settle.
    #[must_use]
    pub const fn is_settling(&self) -> bool {
        self.debouncer.is_armed()
    }

    /// The cache key for what should be on screen right now.
    #[must_use]
    pub fn query_key(&self) -> QueryKey {
        QueryKey::new(self.resource, self.current_page, &self.settled_term)
    }

    /// Records new input and re-arms the debounce deadline.
    ///
    /// Returns how long to wait before calling [`Self::poll`].
    pub fn on_search_input(&mut self, text: impl Into<String>, now: Instant) -> Duration {
        self.raw_input = text.into();
        tracing::trace!(input = %self.raw_input, "search input");
        self.debouncer.arm(now)
    }

    /// Settles the latest input once the quiet period is over.
    pub fn poll(&mut self, now: Instant) -> Option<ControllerEvent> {
        match self.debouncer.poll(now) {
            DebouncePoll::Ready => {
                let term = self.raw_input.clone();
                self.on_settle(&term)
            }
            DebouncePoll::Idle | DebouncePoll::Waiting(_) => None,
        }
    }

    /// Time left before pending input settles, if any.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        let mut probe = self.debouncer.clone();
        match probe.poll(now) {
            DebouncePoll::Waiting(left) => Some(left),
            DebouncePoll::Ready => Some(Duration::ZERO),
            DebouncePoll::Idle => None,
        }
    }

    /// Settles pending input right away.
    pub fn flush(&mut self) -> Option<ControllerEvent> {
        if !self.debouncer.cancel() {
            return None;
        }
        let term = self.raw_input.clone();
        self.on_settle(&term)
    }

    /// Applies a settled term. Unchanged terms are ignored.
    pub fn on_settle(&mut self, term: &str) -> Option<ControllerEvent> {
        let term = normalize_search(term);
        if term == self.settled_term {
            tracing::debug!(term = %term, "settled term unchanged");
            return None;
        }

        tracing::debug!(from = %self.settled_term, to = %term, page = self.current_page, "search settled");
        self.settled_term = term;
        self.current_page = 1;
        Some(ControllerEvent::QueryChanged {
            key: self.query_key(),
            cause: ChangeCause::Search,
        })
    }

    /// Moves to `page` if it exists and differs from the current page.
    ///
    /// Out-of-range requests leave everything as it was.
    pub fn on_page_change(&mut self, page: u32) -> Vec<ControllerEvent> {
        if page == 0 || page > self.total_pages || page == self.current_page {
            tracing::debug!(page, current = self.current_page, total = self.total_pages, "page change ignored");
            return Vec::new();
        }

        self.current_page = page;
        vec![
            ControllerEvent::QueryChanged {
                key: self.query_key(),
                cause: ChangeCause::Page,
            },
            ControllerEvent::ScrollToTop,
        ]
    }

    pub fn next_page(&mut self) -> Vec<ControllerEvent> {
        self.on_page_change(self.current_page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> Vec<ControllerEvent> {
        self.on_page_change(self.current_page.saturating_sub(1))
    }

    /// Updates the known page count from the latest view.
    pub fn set_total_pages(&mut self, total: u32) {
        self.total_pages = total;
    }

    /// Empties the search and returns to page 1.
    pub fn clear(&mut self) -> Option<ControllerEvent> {
        let was_settling = self.debouncer.cancel();
        self.raw_input.clear();
        if self.settled_term.is_empty() && self.current_page == 1 {
            if was_settling {
                tracing::debug!("pending search discarded");
            }
            return None;
        }

        self.settled_term.clear();
        self.current_page = 1;
        Some(ControllerEvent::QueryChanged {
            key: self.query_key(),
            cause: ChangeCause::Reset,
        })
    }

    /// Switches collections, starting over with an empty search on page 1.
    pub fn set_resource(&mut self, resource: ResourceKind) -> Vec<ControllerEvent> {
        if resource == self.resource {
            return Vec::new();
        }

        self.debouncer.cancel();
        self.resource = resource;
        self.raw_input.clear();
        self.settled_term.clear();
        self.current_page = 1;
        self.total_pages = 0;
        vec![
            ControllerEvent::QueryChanged {
                key: self.query_key(),
                cause: ChangeCause::Resource,
            },
            ControllerEvent::ScrollToTop,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const WINDOW: Duration = Duration::from_millis(500);

    fn controller() -> SearchController {
        SearchController::new(ResourceKind::Notes, WINDOW)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn rapid_input_settles_once_with_last_value() {
        let mut search = controller();
        search.set_total_pages(4);
        search.on_page_change(3);
        let start = Instant::now();

        search.on_search_input("abc", start);
        search.on_search_input("abcd", start + ms(200));

        assert_eq!(search.poll(start + ms(500)), None, "first timer is superseded");
        let settled = search.poll(start + ms(700));
        assert_eq!(
            settled,
            Some(ControllerEvent::QueryChanged {
                key: QueryKey::new(ResourceKind::Notes, 1, "abcd"),
                cause: ChangeCause::Search,
            })
        );
        assert_eq!(search.current_page(), 1);
        assert_eq!(search.poll(start + ms(2000)), None);
    }

    #[test]
    fn unchanged_term_keeps_page() {
        let mut search = controller();
        search.set_total_pages(5);
        search.on_page_change(2);

        assert_eq!(search.on_settle("  "), None);
        assert_eq!(search.current_page(), 2);
    }

    #[rstest]
    #[case(6)]
    #[case(0)]
    #[case(2)]
    fn invalid_page_changes_are_ignored(#[case] target: u32) {
        let mut search = controller();
        search.set_total_pages(5);
        search.on_page_change(2);

        assert!(search.on_page_change(target).is_empty());
        assert_eq!(search.current_page(), 2);
    }

    #[test]
    fn page_change_scrolls_to_top() {
        let mut search = controller();
        search.set_total_pages(3);

        let events = search.next_page();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            ControllerEvent::QueryChanged { key, cause: ChangeCause::Page } if key.page == 2
        ));
        assert_eq!(events[1], ControllerEvent::ScrollToTop);
        assert!(search.previous_page().len() == 2);
        assert!(search.previous_page().is_empty());
    }

    #[test]
    fn flush_settles_immediately() {
        let mut search = controller();
        search.on_search_input(" milk ", Instant::now());

        let event = search.flush();
        assert!(matches!(event, Some(ControllerEvent::QueryChanged { ref key, .. }) if key.search == "milk"));
        assert!(!search.is_settling());
        assert_eq!(search.flush(), None);
    }

    #[test]
    fn clear_resets_term_and_page() {
        let mut search = controller();
        search.on_settle("milk");
        search.set_total_pages(3);
        search.on_page_change(3);

        let event = search.clear();
        assert_eq!(
            event,
            Some(ControllerEvent::QueryChanged {
                key: QueryKey::new(ResourceKind::Notes, 1, ""),
                cause: ChangeCause::Reset,
            })
        );
        assert_eq!(search.clear(), None);
    }

    #[test]
    fn switching_resource_starts_fresh() {
        let mut search = controller();
        search.on_settle("milk");

        let events = search.set_resource(ResourceKind::Movies);
        assert_eq!(search.query_key(), QueryKey::new(ResourceKind::Movies, 1, ""));
        assert_eq!(events.len(), 2);
        assert!(search.set_resource(ResourceKind::Movies).is_empty());
    }

    #[test]
    fn remaining_reports_wait_time() {
        let mut search = controller();
        let start = Instant::now();
        assert_eq!(search.remaining(start), None);

        search.on_search_input("a", start);
        assert_eq!(search.remaining(start + ms(100)), Some(ms(400)));
    }
}
