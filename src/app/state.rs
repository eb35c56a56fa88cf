//! Application state and view model computation.
//!
//! [`AppState`] is the single writer over every core component: the search
//! controller, the query cache, the mutation coordinator and the notice queue.
//! The event handler mutates it; the renderer reads a [`UIViewModel`] computed
//! from it.
//!
//! The active query is always derived, never stored: it is whatever
//! [`SearchController::query_key`] says, and the rows on screen are whatever
//! the cache's view of that key holds (its own data, or the previous page as a
//! placeholder while the new one loads).
//!
//! # Example
//!
//! ```
//! use notepane::app::AppState;
//! use notepane::gateway::Gateway;
//! use notepane::ui::Theme;
//!
//! let state = AppState::new(Gateway::default(), Theme::default());
//! let viewmodel = state.compute_viewmodel(24, 80);
//! assert!(viewmodel.display_items.is_empty());
//! ```

use super::actions::Action;
use super::form::NoteForm;
use super::modes::InputMode;
use super::notices::{NoticeLevel, Notices};
use crate::cache::{CacheConfig, FetchStatus, FetchTicket, QueryCache, QueryKey, QueryView};
use crate::controller::{ControllerEvent, SearchController};
use crate::domain::{Item, ResourceKind};
use crate::gateway::{Gateway, RequestId, RequestIds};
use crate::infrastructure::{Clock, SystemClock};
use crate::mutation::MutationCoordinator;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    DisplayItem, EmptyState, FooterInfo, FormInfo, HeaderInfo, NoticeInfo, SearchBarInfo, StatusLine,
    UIViewModel,
};
use chrono::Utc;
use fuzzy_matcher::skim::SkimMatcherV2;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

/// Rows taken by chrome in every layout: blank, header, border, table
/// header, status, notice, border, footer.
const CHROME_ROWS: usize = 8;

/// Extra rows taken by the search box.
const SEARCH_BAR_ROWS: usize = 3;

const TITLE_COLUMN_WIDTH: usize = 36;
const BADGE_COLUMN_WIDTH: usize = 22;

/// Central application state container.
#[derive(Debug)]
pub struct AppState {
    /// Current input handling mode.
    pub input_mode: InputMode,

    /// Zero-based index of the selected row within the current page.
    pub selected_index: usize,

    /// Draft of the new-note form.
    pub form: NoteForm,

    pub notices: Notices,

    /// Color scheme for UI rendering.
    pub theme: Theme,

    pub cache: QueryCache,
    pub controller: SearchController,
    pub coordinator: MutationCoordinator,
    pub gateway: Gateway,
    pub request_ids: RequestIds,

    /// Page fetches awaiting a response.
    pub page_requests: HashMap<RequestId, QueryKey>,

    /// Whether the host granted web access. Nothing is fetched before that.
    pub online: bool,

    clock: Arc<dyn Clock>,

    /// Keys already reported as having no results.
    reported_empty: HashSet<QueryKey>,
}

impl AppState {
    /// Creates a state browsing notes, offline until permissions arrive.
    #[must_use]
    pub fn new(gateway: Gateway, theme: Theme) -> Self {
        Self {
            input_mode: InputMode::Normal,
            selected_index: 0,
            form: NoteForm::default(),
            notices: Notices::default(),
            theme,
            cache: QueryCache::default(),
            controller: SearchController::default(),
            coordinator: MutationCoordinator::new(),
            gateway,
            request_ids: RequestIds::default(),
            page_requests: HashMap::new(),
            online: false,
            clock: Arc::new(SystemClock),
            reported_empty: HashSet::new(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_cache_config(mut self, config: CacheConfig) -> Self {
        self.cache = QueryCache::new(config);
        self
    }

    #[must_use]
    pub fn with_controller(mut self, controller: SearchController) -> Self {
        self.controller = controller;
        self
    }

    #[must_use]
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    #[must_use]
    pub fn resource(&self) -> ResourceKind {
        self.controller.resource()
    }

    /// The key of the query that should be on screen.
    #[must_use]
    pub fn active_key(&self) -> QueryKey {
        self.controller.query_key()
    }

    /// The rows currently on screen, possibly placeholder rows.
    #[must_use]
    pub fn current_items(&self) -> &[Item] {
        let key = self.active_key();
        self.cache
            .view(&key)
            .data
            .map(|page| page.items.as_slice())
            .unwrap_or_default()
    }

    /// The selected row, if it belongs to the active key itself.
    ///
    /// Placeholder rows from a previous page are never selectable for
    /// mutations.
    #[must_use]
    pub fn selected_item(&self) -> Option<&Item> {
        let key = self.active_key();
        let view = self.cache.view(&key);
        if view.is_placeholder {
            return None;
        }
        view.data.and_then(|page| page.items.get(self.selected_index))
    }

    /// Moves selection down one row, wrapping to the top.
    pub fn move_selection_down(&mut self) {
        let count = self.current_items().len();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % count;
    }

    /// Moves selection up one row, wrapping to the bottom.
    pub fn move_selection_up(&mut self) {
        let count = self.current_items().len();
        if count == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = count - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    fn clamp_selection(&mut self) {
        let count = self.current_items().len();
        self.selected_index = self.selected_index.min(count.saturating_sub(1));
    }

    /// Feeds the page count of the active view back into the controller.
    ///
    /// A failed page with nothing to show keeps the last known count, so the
    /// user can still page away from it.
    pub fn refresh_pagination(&mut self) {
        let key = self.active_key();
        let view = self.cache.view(&key);
        let total = match view.total_pages() {
            Some(total) => total,
            None if view.status == FetchStatus::Error => self.controller.total_pages(),
            None => 0,
        };
        self.controller.set_total_pages(total);
        self.clamp_selection();
    }

    fn issue(&mut self, ticket: FetchTicket) -> Action {
        let request = self.gateway.page_request(ticket.id, &ticket.key);
        tracing::debug!(key = %ticket.key, token = %ticket.id, url = %request.url, "page request");
        self.page_requests.insert(ticket.id, ticket.key);
        Action::Http(request)
    }

    /// Asks the cache for the active key, fetching it when needed.
    pub fn sync_active_query(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.online {
            let key = self.active_key();
            let now = self.now();
            if let Some(ticket) = self.cache.get(&key, &mut self.request_ids, now) {
                actions.push(self.issue(ticket));
            }
        }
        self.refresh_pagination();
        actions
    }

    /// Re-requests the active key even if it is fresh.
    pub fn refetch_active(&mut self) -> Vec<Action> {
        if !self.online {
            return Vec::new();
        }
        let key = self.active_key();
        self.cache
            .refetch(&key, &mut self.request_ids)
            .map(|ticket| self.issue(ticket))
            .into_iter()
            .collect()
    }

    /// Reacts to controller output: new keys are synced, scrolls reset the
    /// selection.
    pub fn apply_controller_events(&mut self, events: impl IntoIterator<Item = ControllerEvent>) -> Vec<Action> {
        let mut actions = Vec::new();
        for event in events {
            match event {
                ControllerEvent::QueryChanged { key, cause } => {
                    tracing::debug!(key = %key, ?cause, "query changed");
                    self.selected_index = 0;
                    actions.extend(self.sync_active_query());
                }
                ControllerEvent::ScrollToTop => {
                    self.selected_index = 0;
                }
            }
        }
        actions
    }

    /// Queues a notice and asks for a timer so it disappears on time.
    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) -> Action {
        let now = self.now();
        self.notices.push(level, message, now);
        Action::ScheduleTimer(self.notices.ttl())
    }

    /// Reports an empty result for a settled search once per key.
    pub fn report_if_empty(&mut self, key: &QueryKey) -> Option<Action> {
        if key.search.is_empty() || *key != self.active_key() {
            return None;
        }
        let is_empty = self
            .cache
            .entry(key)
            .and_then(|entry| entry.data.as_ref())
            .is_some_and(|page| page.is_empty());
        if !is_empty || !self.reported_empty.insert(key.clone()) {
            return None;
        }
        let message = format!("No {} found for your request.", key.resource.as_str());
        Some(self.notify(NoticeLevel::Info, message))
    }

    /// Forgets "no results" reports for a resource after it changed.
    pub fn forget_empty_reports(&mut self, resource: ResourceKind) {
        self.reported_empty.retain(|key| key.resource != resource);
    }

    /// Computes a renderable view model for a `rows` x `cols` pane.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let key = self.active_key();
        let view = self.cache.view(&key);
        let search_bar = self.compute_search_bar();

        let form = self.compute_form();
        let empty_state = if form.is_some() {
            None
        } else {
            self.compute_empty_state(&key, &view)
        };

        let items: &[Item] = view.data.map(|page| page.items.as_slice()).unwrap_or_default();
        let mut display_items = Vec::new();
        let mut selected_display_index = 0;

        if form.is_none() && empty_state.is_none() && !items.is_empty() {
            let chrome = CHROME_ROWS + if search_bar.is_some() { SEARCH_BAR_ROWS } else { 0 };
            let available_rows = rows.saturating_sub(chrome).max(1);
            let selected = self.selected_index.min(items.len() - 1);

            let mut visible_start = selected.saturating_sub(available_rows / 2);
            let visible_end = (visible_start + available_rows).min(items.len());
            if visible_end - visible_start < available_rows && items.len() >= available_rows {
                visible_start = visible_end.saturating_sub(available_rows);
            }

            let matcher = (!key.search.is_empty()).then(SkimMatcherV2::default);
            let now = Utc::now();
            display_items = items[visible_start..visible_end]
                .iter()
                .enumerate()
                .map(|(offset, item)| {
                    let is_selected = visible_start + offset == selected;
                    self.compute_display_item(item, is_selected, cols, &key.search, matcher.as_ref(), now)
                })
                .collect();
            selected_display_index = selected - visible_start;
        }

        UIViewModel {
            display_items,
            selected_index: selected_display_index,
            header: Self::compute_header(&key, &view),
            footer: self.compute_footer(view.status == FetchStatus::Error),
            status: self.compute_status(&key, &view),
            notice: self.notices.latest().map(|notice| NoticeInfo {
                level: notice.level,
                message: notice.message.clone(),
            }),
            empty_state,
            search_bar,
            form,
        }
    }

    fn compute_display_item(
        &self,
        item: &Item,
        is_selected: bool,
        cols: usize,
        term: &str,
        matcher: Option<&SkimMatcherV2>,
        now: chrono::DateTime<Utc>,
    ) -> DisplayItem {
        let summary_width = cols.saturating_sub(TITLE_COLUMN_WIDTH + BADGE_COLUMN_WIDTH + 2);
        let summary = item.summary().split_whitespace().collect::<Vec<_>>().join(" ");

        DisplayItem {
            title: truncate(item.title(), TITLE_COLUMN_WIDTH - 2),
            badge: truncate(&item.badge(now), BADGE_COLUMN_WIDTH - 2),
            summary: truncate(&summary, summary_width),
            is_selected,
            is_pending: self.coordinator.is_deleting(item.id()),
            highlight_ranges: matcher.map_or_else(Vec::new, |m| compute_highlight_ranges(item.title(), term, m)),
        }
    }

    fn compute_header(key: &QueryKey, view: &QueryView<'_>) -> HeaderInfo {
        let title = key.resource.title();
        let count = view.data.map(|page| page.total_count);
        let title = match (key.search.is_empty(), count) {
            (true, Some(count)) => format!(" {title} ({count}) "),
            (true, None) => format!(" {title} "),
            (false, Some(count)) => format!(" {title} · \"{}\" ({count}) ", key.search),
            (false, None) => format!(" {title} · \"{}\" ", key.search),
        };
        HeaderInfo { title }
    }

    fn compute_footer(&self, has_error: bool) -> FooterInfo {
        let keybindings = match self.input_mode {
            InputMode::Search => "Type to search  Backspace: delete  Enter: keep  Esc: clear".to_string(),
            InputMode::Form(_) => "Tab: next field  Ctrl+t: tag  Enter: save  Esc: cancel".to_string(),
            InputMode::Normal => {
                let other = self.resource().next().as_str();
                let mut keys = String::from("j/k: move  h/l: page  /: search  ");
                if self.resource().supports_mutations() {
                    keys.push_str("n: new  d: delete  ");
                }
                keys.push_str(&format!("Tab: {other}  r: refresh  "));
                if has_error {
                    keys.push_str("x: dismiss  ");
                }
                keys.push_str("q: quit");
                keys
            }
        };
        FooterInfo { keybindings }
    }

    fn compute_status(&self, key: &QueryKey, view: &QueryView<'_>) -> StatusLine {
        let total = self.controller.total_pages();
        let mut pagination = if total == 0 {
            format!("Page {}", key.page)
        } else {
            format!("Page {} of {total}", key.page)
        };
        if let Some(page) = view.data.filter(|_| !view.is_placeholder) {
            pagination.push_str(&format!(" · {} {}", page.total_count, key.resource.as_str()));
        }

        let activity = match view.status {
            FetchStatus::Pending if view.is_placeholder => Some("loading… (showing previous page)".to_string()),
            FetchStatus::Pending if view.data.is_some() => Some("refreshing…".to_string()),
            FetchStatus::Pending => Some("loading…".to_string()),
            FetchStatus::Error if view.data.is_some() => Some("offline copy".to_string()),
            _ if self.controller.is_settling() => Some("typing…".to_string()),
            _ if self.coordinator.is_busy() => Some("saving…".to_string()),
            _ => None,
        };

        StatusLine { pagination, activity }
    }

    fn compute_empty_state(&self, key: &QueryKey, view: &QueryView<'_>) -> Option<EmptyState> {
        if view.data.is_some_and(|page| !page.is_empty()) {
            return None;
        }

        let noun = key.resource.as_str();
        let (message, subtitle) = if !key.is_enabled() {
            (
                format!("Search for {noun}"),
                "Press / and type a title".to_string(),
            )
        } else if !self.online {
            (
                "Waiting for web access".to_string(),
                "Grant the permission request to start browsing".to_string(),
            )
        } else if let (FetchStatus::Error, Some(error)) = (view.status, view.error) {
            (
                format!("Failed to load {noun}: {}", error.describe()),
                "Press r to retry or x to dismiss".to_string(),
            )
        } else if view.status == FetchStatus::Pending || view.status == FetchStatus::Idle {
            (format!("Loading {noun}…"), String::new())
        } else if key.search.is_empty() {
            let hint = if key.resource.supports_mutations() {
                "Press n to create one"
            } else {
                "Press / to search"
            };
            (format!("No {noun} yet"), hint.to_string())
        } else {
            (
                format!("No {noun} found for your request."),
                "Press Esc in search to clear it".to_string(),
            )
        };

        Some(EmptyState { message, subtitle })
    }

    fn compute_search_bar(&self) -> Option<SearchBarInfo> {
        let is_focused = self.input_mode == InputMode::Search;
        if is_focused || !self.controller.raw_input().is_empty() {
            Some(SearchBarInfo {
                query: self.controller.raw_input().to_string(),
                is_focused,
            })
        } else {
            None
        }
    }

    fn compute_form(&self) -> Option<FormInfo> {
        let InputMode::Form(focused) = self.input_mode else {
            return None;
        };
        Some(FormInfo {
            title: self.form.title.clone(),
            body: self.form.body.clone(),
            tag: self.form.tag.to_string(),
            focused,
            is_submitting: self.coordinator.is_creating(),
        })
    }
}

/// Shortens `text` to `max` characters, ending in "..." when cut.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Character ranges of `text` fuzzily matching `term`, coalesced into runs.
fn compute_highlight_ranges(text: &str, term: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
    use fuzzy_matcher::FuzzyMatcher;

    let Some((_score, indices)) = matcher.fuzzy_indices(text, term) else {
        return Vec::new();
    };

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for idx in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == idx => *end = idx + 1,
            _ => ranges.push((idx, idx + 1)),
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééééééé", 6), "ééé...");
    }

    #[test]
    fn highlight_ranges_merge_adjacent_matches() {
        let matcher = SkimMatcherV2::default();
        let ranges = compute_highlight_ranges("groceries", "gro", &matcher);
        assert_eq!(ranges, vec![(0, 3)]);
        assert!(compute_highlight_ranges("plan", "xyz", &matcher).is_empty());
    }

    #[test]
    fn offline_state_explains_itself() {
        let state = AppState::new(Gateway::default(), Theme::default());
        let vm = state.compute_viewmodel(24, 100);

        let empty = vm.empty_state.expect("nothing loaded");
        assert_eq!(empty.message, "Waiting for web access");
        assert!(vm.footer.keybindings.contains("n: new"));
    }
}
