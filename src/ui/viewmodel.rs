//! View model types representing renderable UI state.
//!
//! View models are computed by `AppState::compute_viewmodel()` and consumed by
//! the renderer. They hold display-ready strings and flags only; no cache or
//! controller types leak into rendering.
//!
//! # Example
//!
//! ```
//! use notepane::ui::viewmodel::{DisplayItem, FooterInfo, HeaderInfo, StatusLine, UIViewModel};
//!
//! let vm = UIViewModel {
//!     display_items: vec![DisplayItem {
//!         title: "Groceries".to_string(),
//!         badge: "Shopping · 2h ago".to_string(),
//!         summary: "milk, eggs".to_string(),
//!         is_selected: true,
//!         is_pending: false,
//!         highlight_ranges: vec![(0, 4)],
//!     }],
//!     selected_index: 0,
//!     header: HeaderInfo { title: " Notes (1) ".to_string() },
//!     footer: FooterInfo { keybindings: "q: quit".to_string() },
//!     status: StatusLine { pagination: "Page 1 of 1".to_string(), activity: None },
//!     notice: None,
//!     empty_state: None,
//!     search_bar: None,
//!     form: None,
//! };
//! assert_eq!(vm.display_items.len(), 1);
//! ```

use crate::app::notices::NoticeLevel;
use crate::app::FormField;

/// Complete UI view model for rendering.
#[derive(Debug, Clone)]
pub struct UIViewModel {
    /// Rows of the visible window of the current page.
    pub display_items: Vec<DisplayItem>,

    /// Index of the selected row within `display_items`.
    pub selected_index: usize,

    pub header: HeaderInfo,
    pub footer: FooterInfo,

    /// Pagination and fetch activity, shown under the table.
    pub status: StatusLine,

    /// The newest unexpired notice.
    pub notice: Option<NoticeInfo>,

    /// Replaces the table when there is nothing to list.
    pub empty_state: Option<EmptyState>,

    /// Present while searching or while a search term is applied.
    pub search_bar: Option<SearchBarInfo>,

    /// Present while the new-note form is open. Replaces the table.
    pub form: Option<FormInfo>,
}

/// One row of the results table.
#[derive(Debug, Clone)]
pub struct DisplayItem {
    pub title: String,

    /// Tag and age for notes, year and rating for movies.
    pub badge: String,

    /// Note body or movie overview, flattened to one line.
    pub summary: String,

    pub is_selected: bool,

    /// A delete of this item is in flight.
    pub is_pending: bool,

    /// Character ranges of `title` matching the search term.
    ///
    /// Each tuple is `(start_index, end_index)` in character indices.
    pub highlight_ranges: Vec<(usize, usize)>,
}

#[derive(Debug, Clone)]
pub struct HeaderInfo {
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct FooterInfo {
    pub keybindings: String,
}

/// Pagination text plus what the active query is doing.
#[derive(Debug, Clone)]
pub struct StatusLine {
    /// e.g. "Page 2 of 5 · 58 notes".
    pub pagination: String,
    /// e.g. "loading…", `None` when idle.
    pub activity: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NoticeInfo {
    pub level: NoticeLevel,
    pub message: String,
}

/// Shown when no items are available.
#[derive(Debug, Clone)]
pub struct EmptyState {
    /// Primary message (e.g., "No notes found for your request.").
    pub message: String,

    /// Secondary hint (e.g., "Press r to retry").
    pub subtitle: String,
}

#[derive(Debug, Clone)]
pub struct SearchBarInfo {
    /// Raw input, which may not have settled yet.
    pub query: String,
    /// Whether keys currently go to the search box.
    pub is_focused: bool,
}

/// The new-note form.
#[derive(Debug, Clone)]
pub struct FormInfo {
    pub title: String,
    pub body: String,
    pub tag: String,
    pub focused: FormField,
    /// A create is in flight; submitting again is disabled.
    pub is_submitting: bool,
}
