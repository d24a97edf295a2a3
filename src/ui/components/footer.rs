//! Footer component renderer.
//!
//! Renders the keybinding hint line at the bottom of the pane.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FooterInfo;

/// Renders the footer keybinding hints at the specified row.
///
/// Hints are printed in the dim text color and truncated to the terminal
/// width so they never wrap.
pub fn render_footer(row: usize, footer: &FooterInfo, theme: &Theme, cols: usize) {
    let hints: String = footer.keybindings.chars().take(cols.saturating_sub(2)).collect();

    position_cursor(row, 1);
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!(" {hints}");
    print!("{}", Theme::reset());
}
