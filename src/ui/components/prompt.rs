//! Input prompt component renderer.
//!
//! Renders the bordered input box used for both the API key and the
//! prediction input, plus the busy indicator while a request is in flight.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::PromptInfo;

/// Horizontal margin for the prompt box (spaces on left and right).
const PROMPT_BOX_MARGIN: usize = 2;

/// Renders the 3-line input prompt box starting at the specified row.
///
/// ```text
/// [margin] ┌─────────────────────┐ [margin]
/// [margin] │ {label}: {value}_   │ [margin]
/// [margin] └─────────────────────┘ [margin]
/// ```
///
/// While loading, the trailing cursor is replaced with a busy indicator and
/// the value is dimmed. Returns the next available row.
pub fn render_prompt(row: usize, prompt: &PromptInfo, theme: &Theme, cols: usize) -> usize {
    let box_width = cols.saturating_sub(PROMPT_BOX_MARGIN * 2);
    let inner_width = box_width.saturating_sub(2);

    position_cursor(row, 1);
    print!("{}", " ".repeat(PROMPT_BOX_MARGIN));
    print!("{}", Theme::fg(&theme.colors.prompt_border));
    print!("┌{}┐", "─".repeat(inner_width));
    print!("{}", Theme::reset());

    let marker = if prompt.loading { "…" } else { "_" };
    let text = format!(" {}: {}{marker}", prompt.label, prompt.value);
    let shown: String = text.chars().take(inner_width).collect();
    let padding = inner_width.saturating_sub(shown.chars().count());

    position_cursor(row + 1, 1);
    print!("{}", " ".repeat(PROMPT_BOX_MARGIN));
    print!("{}", Theme::fg(&theme.colors.prompt_border));
    print!("│");
    if prompt.loading {
        print!("{}", Theme::fg(&theme.colors.loading_fg));
    } else {
        print!("{}", Theme::fg(&theme.colors.text_normal));
    }
    print!("{shown}");
    print!("{}", " ".repeat(padding));
    print!("{}", Theme::fg(&theme.colors.prompt_border));
    print!("│");
    print!("{}", Theme::reset());

    position_cursor(row + 2, 1);
    print!("{}", " ".repeat(PROMPT_BOX_MARGIN));
    print!("{}", Theme::fg(&theme.colors.prompt_border));
    print!("└{}┘", "─".repeat(inner_width));
    print!("{}", Theme::reset());

    row + 3
}
