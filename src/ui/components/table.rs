//! Results table renderer.
//!
//! Three columns: TITLE (fixed width, search matches highlighted), INFO (tag
//! and age, or year and rating) and DETAILS (body or overview, whatever fits).

use crate::ui::helpers::{self, pad, position_cursor, width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DisplayItem;

const TITLE_WIDTH: usize = 36;
const INFO_WIDTH: usize = 22;

/// Renders the column headers and returns the next free row.
pub fn render_table_headers(row: usize, theme: &Theme) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    print!("{:<TITLE_WIDTH$}{:<INFO_WIDTH$}{}", "TITLE", "INFO", "DETAILS");
    print!("{}", Theme::reset());
    row + 1
}

/// Renders every row and returns the next free row.
pub fn render_table_rows(row: usize, items: &[DisplayItem], theme: &Theme, cols: usize) -> usize {
    items
        .iter()
        .fold(row, |current, item| render_table_row(current, item, theme, cols))
}

fn render_table_row(row: usize, item: &DisplayItem, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);

    let base_fg = if item.is_selected {
        print!("{}", Theme::bg(&theme.colors.selection_bg));
        &theme.colors.selection_fg
    } else if item.is_pending {
        &theme.colors.pending_fg
    } else {
        &theme.colors.text_normal
    };
    print!("{}", Theme::fg(base_fg));

    helpers::render_highlighted_text(&item.title, &item.highlight_ranges, theme, item.is_selected || item.is_pending);
    pad(TITLE_WIDTH.saturating_sub(width(&item.title)));

    print!("{}", item.badge);
    pad(INFO_WIDTH.saturating_sub(width(&item.badge)));

    if !item.is_selected {
        print!("{}", Theme::fg(&theme.colors.text_dim));
    }
    print!("{}", item.summary);

    let used = TITLE_WIDTH + INFO_WIDTH + width(&item.summary);
    pad(cols.saturating_sub(used));
    print!("{}", Theme::reset());
    row + 1
}
