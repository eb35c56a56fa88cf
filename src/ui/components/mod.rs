//! Composable UI component renderers.
//!
//! Each component draws one part of the pane starting at a given row and
//! returns the next free row.
//!
//! # Components
//!
//! - [`header`]: Title bar with resource, term and count
//! - [`search`]: Search input box
//! - [`table`]: Result rows (TITLE, INFO, DETAILS)
//! - [`form`]: New-note form, shown in place of the table
//! - [`empty`]: Loading, failure and no-match messages
//! - [`status`]: Pagination, fetch activity and the newest notice
//! - [`footer`]: Keybinding hints
//!
//! # Layout
//!
//! ```text
//! [blank line]
//! [Header]
//! [Border]
//! [Search Bar - 3 lines, optional]
//! [Form | Empty State | Table Headers + Rows]
//! [Blank padding to fill screen]
//! [Status]
//! [Notice]
//! [Border]
//! [Footer]
//! ```

mod empty;
mod footer;
mod form;
mod header;
mod search;
mod status;
mod table;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

use empty::render_empty_state;
use footer::render_footer;
use form::render_form;
use header::render_header;
use search::render_search_bar;
use status::{render_notice, render_status};
use table::{render_table_headers, render_table_rows};

/// Rows below the body: status, notice, border and footer.
const BOTTOM_ROWS: usize = 4;

fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Draws the whole pane for `vm`.
///
/// The chrome (header, status, notice and footer) is drawn in every state so
/// the search box and the error notice stay visible while a page is empty.
pub fn render_layout(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2;

    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);
    if let Some(search) = &vm.search_bar {
        current_row = render_search_bar(current_row, search, theme, cols);
    }

    if let Some(form) = &vm.form {
        render_form(current_row, form, theme, cols);
    } else if let Some(empty) = &vm.empty_state {
        render_empty_state(current_row, empty, theme, cols);
    } else {
        current_row = render_table_headers(current_row, theme);
        render_table_rows(current_row, &vm.display_items, theme, cols);
    }

    let status_row = rows.saturating_sub(BOTTOM_ROWS - 1).max(current_row);
    let mut bottom = render_status(status_row, &vm.status, theme, cols);
    bottom = render_notice(bottom, vm.notice.as_ref(), theme, cols);
    bottom = render_border(bottom, &theme.colors.border, cols);
    render_footer(bottom, &vm.footer, theme, cols);
}
