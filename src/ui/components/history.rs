//! Feedback history panel renderer.
//!
//! Renders the newest-first list of recorded predictions with their review
//! marks, a summary line, and the clear-history confirmation prompt.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HistoryInfo;

/// Renders the history panel title line.
///
/// Shows the total count and the correct/incorrect split. Returns the next
/// available row.
pub fn render_history_title(row: usize, history: &HistoryInfo, theme: &Theme) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    print!(" History ({})", history.total);
    print!("{}", Theme::reset());

    if history.total > 0 {
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print!(
            "  {} correct / {} incorrect",
            history.correct,
            history.total - history.correct
        );
        print!("{}", Theme::reset());
    }
    row + 1
}

/// Renders the history rows starting at the specified row.
///
/// Each row shows the timestamp, the input, the predicted emoji, and a
/// colored ✓ or ✗ mark. An empty history gets a dimmed placeholder line.
/// Returns the next available row.
pub fn render_history_rows(row: usize, history: &HistoryInfo, theme: &Theme) -> usize {
    if history.rows.is_empty() {
        position_cursor(row, 1);
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print!("   No feedback recorded yet");
        print!("{}", Theme::reset());
        return row + 1;
    }

    let mut current_row = row;
    for entry in &history.rows {
        let (mark, mark_color) = if entry.is_correct {
            ("✓", &theme.colors.correct_fg)
        } else {
            ("✗", &theme.colors.incorrect_fg)
        };

        position_cursor(current_row, 1);
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print!(" {} ", entry.time);
        print!("{}", Theme::fg(&theme.colors.text_normal));
        print!("{}  {}", entry.input, entry.emoji);
        print!("{}", Theme::fg(mark_color));
        print!(" {mark}");
        print!("{}", Theme::reset());
        current_row += 1;
    }
    current_row
}

/// Renders the clear-history confirmation prompt.
pub fn render_clear_confirmation(row: usize, theme: &Theme) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(&theme.colors.error_fg));
    print!(" Clear all feedback history? (y/n)");
    print!("{}", Theme::reset());
    row + 1
}
