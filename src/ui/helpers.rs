//! Shared rendering utilities.
//!
//! Cursor positioning, width-aware padding and search-match highlighting used
//! by several components. All widths are counted in characters, not bytes.

use crate::ui::theme::Theme;

/// Moves the cursor to a 1-indexed `row` and `col`.
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Number of characters in `text`.
#[must_use]
pub fn width(text: &str) -> usize {
    text.chars().count()
}

/// Cuts `text` to at most `max` characters.
#[must_use]
pub fn clip(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Prints `count` spaces.
pub fn pad(count: usize) {
    print!("{}", " ".repeat(count));
}

/// Prints `text` centered in a line of `cols` characters.
pub fn print_centered(text: &str, cols: usize) {
    let text = clip(text, cols);
    let len = width(&text);
    let left = cols.saturating_sub(len) / 2;
    pad(left);
    print!("{text}");
    pad(cols.saturating_sub(left + len));
}

/// Prints `text` with the given character ranges highlighted.
///
/// Selected rows skip highlighting so the selection colors stay intact.
/// Ranges are `(start, end)` character indices with exclusive end; ranges past
/// the end of `text` are clamped.
pub fn render_highlighted_text(text: &str, ranges: &[(usize, usize)], theme: &Theme, is_selected: bool) {
    if ranges.is_empty() || is_selected {
        print!("{text}");
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut cursor = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len()).max(cursor);
        let end = end.min(chars.len());
        if start >= end {
            continue;
        }

        print!("{}", chars[cursor..start].iter().collect::<String>());
        print!("{}", Theme::fg(&theme.colors.match_highlight_fg));
        print!("{}", Theme::bg(&theme.colors.match_highlight_bg));
        print!("{}", chars[start..end].iter().collect::<String>());
        print!("{}", Theme::reset());
        print!("{}", Theme::fg(&theme.colors.text_normal));
        cursor = end;
    }

    print!("{}", chars[cursor..].iter().collect::<String>());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_and_width_count_characters() {
        assert_eq!(width("naïve"), 5);
        assert_eq!(clip("naïve", 3), "naï");
        assert_eq!(clip("ab", 10), "ab");
    }
}
