//! Search bar component renderer.

use crate::ui::helpers::{clip, pad, position_cursor, width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::SearchBarInfo;

/// Horizontal margin for the search box (spaces on left and right).
const SEARCH_BOX_MARGIN: usize = 5;

/// Renders the 3-line search box and returns the next free row.
///
/// ```text
/// [margin] ┌─────────────────┐ [margin]
/// [margin] │ Search: milk▏   │ [margin]
/// [margin] └─────────────────┘ [margin]
/// ```
///
/// The box is dimmed when the query is applied but keys go elsewhere.
pub fn render_search_bar(row: usize, search: &SearchBarInfo, theme: &Theme, cols: usize) -> usize {
    let box_width = cols.saturating_sub(SEARCH_BOX_MARGIN * 2);
    let inner_width = box_width.saturating_sub(2);
    let border = if search.is_focused {
        &theme.colors.search_bar_border
    } else {
        &theme.colors.border
    };

    position_cursor(row, 1);
    pad(SEARCH_BOX_MARGIN);
    print!("{}┌{}┐{}", Theme::fg(border), "─".repeat(inner_width), Theme::reset());

    let cursor = if search.is_focused { "▏" } else { "" };
    let text = clip(&format!(" Search: {}{cursor}", search.query), inner_width);

    position_cursor(row + 1, 1);
    pad(SEARCH_BOX_MARGIN);
    print!("{}│", Theme::fg(border));
    if search.is_focused {
        print!("{}", Theme::fg(&theme.colors.text_normal));
    } else {
        print!("{}", Theme::fg(&theme.colors.text_dim));
    }
    print!("{text}");
    pad(inner_width.saturating_sub(width(&text)));
    print!("{}│{}", Theme::fg(border), Theme::reset());

    position_cursor(row + 2, 1);
    pad(SEARCH_BOX_MARGIN);
    print!("{}└{}┘{}", Theme::fg(border), "─".repeat(inner_width), Theme::reset());

    row + 3
}
