//! New-note form renderer.

use crate::app::FormField;
use crate::ui::helpers::{clip, pad, position_cursor, width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FormInfo;

const LABEL_WIDTH: usize = 8;

/// Renders the form in place of the table and returns the next free row.
///
/// ```text
///  New note
///  Title   Groceries▏
///  Body    milk, eggs
///  Tag     < Shopping >
/// ```
pub fn render_form(row: usize, form: &FormInfo, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}{}", Theme::bold(), Theme::fg(&theme.colors.header_fg));
    let heading = if form.is_submitting { " New note (saving…)" } else { " New note" };
    print!("{heading}");
    pad(cols.saturating_sub(width(heading)));
    print!("{}", Theme::reset());

    let title_focused = form.focused == FormField::Title;
    render_field(row + 1, "Title", &form.title, title_focused, theme, cols);
    render_field(row + 2, "Body", &form.body, !title_focused, theme, cols);

    position_cursor(row + 3, 1);
    let tag = format!(" {:<LABEL_WIDTH$}< {} >", "Tag", form.tag);
    print!("{}{tag}", Theme::fg(&theme.colors.text_normal));
    pad(cols.saturating_sub(width(&tag)));
    print!("{}", Theme::reset());

    row + 4
}

fn render_field(row: usize, label: &str, value: &str, focused: bool, theme: &Theme, cols: usize) {
    position_cursor(row, 1);
    let label_color = if focused {
        &theme.colors.search_bar_border
    } else {
        &theme.colors.text_dim
    };
    let label = format!(" {label:<LABEL_WIDTH$}");
    print!("{}{label}", Theme::fg(label_color));

    let cursor = if focused { "▏" } else { "" };
    let text = clip(&format!("{value}{cursor}"), cols.saturating_sub(width(&label)));
    print!("{}{text}", Theme::fg(&theme.colors.text_normal));
    pad(cols.saturating_sub(width(&label) + width(&text)));
    print!("{}", Theme::reset());
}
