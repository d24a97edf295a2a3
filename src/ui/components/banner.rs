//! Error banner component renderer.
//!
//! Renders the error message, its remediation hint, and the change-key
//! shortcut when the error category warrants one.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::BannerInfo;

/// Renders the error banner starting at the specified row.
///
/// One line for the message, an optional dimmed line for the remediation
/// hint, and an optional line advertising the change-key binding. Returns
/// the next available row.
pub fn render_banner(row: usize, banner: &BannerInfo, theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;

    let message: String = banner.message.chars().take(cols.saturating_sub(4)).collect();
    position_cursor(current_row, 1);
    print!("{}", Theme::fg(&theme.colors.error_fg));
    print!(" ! {message}");
    print!("{}", Theme::reset());
    current_row += 1;

    if let Some(hint) = &banner.remediation {
        let hint: String = hint.chars().take(cols.saturating_sub(4)).collect();
        position_cursor(current_row, 1);
        print!("{}", Theme::fg(&theme.colors.hint_fg));
        print!("   {hint}");
        print!("{}", Theme::reset());
        current_row += 1;
    }

    if banner.offers_key_change {
        position_cursor(current_row, 1);
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print!("   Ctrl+k: change API key");
        print!("{}", Theme::reset());
        current_row += 1;
    }

    current_row
}
