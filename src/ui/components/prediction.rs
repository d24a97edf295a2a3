//! Prediction display component renderer.
//!
//! Shows the latest predicted emoji and, while awaiting review, the y/n
//! question that records feedback.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::PredictionInfo;

/// Renders the prediction line (and the review question when pending)
/// starting at the specified row. Returns the next available row.
pub fn render_prediction(
    row: usize,
    prediction: &PredictionInfo,
    theme: &Theme,
    cols: usize,
) -> usize {
    let mut current_row = row;

    let line = format!(" \"{}\"  →  {}", prediction.input, prediction.emoji);
    let shown: String = line.chars().take(cols.saturating_sub(1)).collect();

    position_cursor(current_row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.text_normal));
    print!("{shown}");
    print!("{}", Theme::reset());
    current_row += 1;

    if prediction.awaiting_review {
        position_cursor(current_row, 1);
        print!("{}", Theme::fg(&theme.colors.hint_fg));
        print!(" Was this correct? (y/n)");
        print!("{}", Theme::reset());
        current_row += 1;
    }

    current_row
}
