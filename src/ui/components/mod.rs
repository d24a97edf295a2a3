//! Composable UI component renderers.
//!
//! Each component renders one part of the interface; the two layout
//! functions here compose them per screen.
//!
//! # Components
//!
//! - [`header`]: Title bar with the active model name
//! - [`banner`]: Error message with remediation hint
//! - [`prompt`]: Bordered input box (key or prediction input)
//! - [`prediction`]: Latest prediction and the review question
//! - [`history`]: Newest-first feedback list with summary
//! - [`footer`]: Keybinding hints
//!
//! # Layout Modes
//!
//! - [`render_key_entry`]: Header + Banner? + Prompt + Footer
//! - [`render_predictor`]: Header + Banner? + Prompt + Prediction? +
//!   History + Footer

mod banner;
mod footer;
mod header;
mod history;
mod prediction;
mod prompt;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{HistoryInfo, UiViewModel};

use banner::render_banner;
use footer::render_footer;
use header::render_header;
use history::{render_clear_confirmation, render_history_rows, render_history_title};
use prediction::render_prediction;
use prompt::render_prompt;

/// Renders a horizontal border line at the specified row.
///
/// Returns the next available row.
fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the key-entry screen layout.
///
/// ```text
/// [blank line]
/// [Header]
/// [Border]
/// [Banner, if any]
/// [Prompt box - 3 lines]
/// [Border]
/// [Footer]
/// ```
pub fn render_key_entry(vm: &UiViewModel, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2;

    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);

    if let Some(banner) = &vm.banner {
        current_row = render_banner(current_row + 1, banner, theme, cols);
    }

    render_prompt(current_row + 1, &vm.prompt, theme, cols);

    let footer_start = rows.saturating_sub(1);
    let border_row = footer_start.saturating_sub(1);

    render_border(border_row, &theme.colors.border, cols);
    render_footer(footer_start, &vm.footer, theme, cols);
}

/// Renders the predictor screen layout.
///
/// ```text
/// [blank line]
/// [Header]
/// [Border]
/// [Banner, if any]
/// [Prompt box - 3 lines]
/// [Prediction + review question, if any]
/// [History title]
/// [History rows / empty placeholder]
/// [Border]
/// [Footer]
/// ```
pub fn render_predictor(
    vm: &UiViewModel,
    history: &HistoryInfo,
    theme: &Theme,
    cols: usize,
    rows: usize,
) {
    let mut current_row = 2;

    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);

    if let Some(banner) = &vm.banner {
        current_row = render_banner(current_row + 1, banner, theme, cols);
    }

    current_row = render_prompt(current_row + 1, &vm.prompt, theme, cols);

    if let Some(prediction) = &vm.prediction {
        current_row = render_prediction(current_row + 1, prediction, theme, cols);
    }

    current_row = render_history_title(current_row + 1, history, theme);
    if history.confirm_clear {
        current_row = render_clear_confirmation(current_row, theme);
    }
    render_history_rows(current_row, history, theme);

    let footer_start = rows.saturating_sub(1);
    let border_row = footer_start.saturating_sub(1);

    render_border(border_row, &theme.colors.border, cols);
    render_footer(footer_start, &vm.footer, theme, cols);
}
