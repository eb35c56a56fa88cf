//! Status and notice lines under the table.

use crate::app::NoticeLevel;
use crate::ui::helpers::{clip, pad, position_cursor, width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{NoticeInfo, StatusLine};

/// Renders "Page 2 of 5 · 58 notes" on the left and the activity on the right.
pub fn render_status(row: usize, status: &StatusLine, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    let left = clip(&format!(" {}", status.pagination), cols);
    print!("{}{left}", Theme::fg(&theme.colors.text_dim));

    let activity = status.activity.as_deref().unwrap_or_default();
    let gap = cols.saturating_sub(width(&left) + width(activity) + 1);
    pad(gap);
    if !activity.is_empty() && gap > 0 {
        print!("{}{activity} ", Theme::fg(&theme.colors.pending_fg));
    }
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the newest notice, or a blank line.
pub fn render_notice(row: usize, notice: Option<&NoticeInfo>, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    let Some(notice) = notice else {
        pad(cols);
        return row + 1;
    };

    let (color, marker) = match notice.level {
        NoticeLevel::Info => (&theme.colors.notice_info_fg, "i"),
        NoticeLevel::Success => (&theme.colors.notice_success_fg, "✓"),
        NoticeLevel::Error => (&theme.colors.notice_error_fg, "✗"),
    };
    let text = clip(&format!(" {marker} {}", notice.message), cols);
    print!("{}{}{text}", Theme::bold(), Theme::fg(color));
    pad(cols.saturating_sub(width(&text)));
    print!("{}", Theme::reset());
    row + 1
}
