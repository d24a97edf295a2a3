//! Top-level rendering coordinator.
//!
//! Provides the main rendering entry point, coordinating view model
//! computation and delegation to the screen layouts.
//!
//! # Architecture
//!
//! Rendering is a two-step process:
//!
//! 1. **View model computation**: transform `AppState` into `UiViewModel`
//! 2. **Component rendering**: delegate to the per-screen layout functions

use crate::app::AppState;
use crate::ui::components;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UiViewModel;

/// Renders the plugin UI to stdout.
///
/// Computes the view model from application state and delegates to the
/// key-entry or predictor layout. Prints ANSI-styled output with `print!`;
/// does not clear the screen or manage cursor visibility.
pub fn render(state: &AppState, rows: usize, cols: usize) {
    let viewmodel = state.compute_viewmodel(rows, cols);

    render_viewmodel(&viewmodel, &state.theme, rows, cols);
}

/// Renders a view model with the screen-appropriate layout.
///
/// The history panel doubles as the screen discriminator: it is only
/// computed for the predictor screen.
fn render_viewmodel(vm: &UiViewModel, theme: &Theme, rows: usize, cols: usize) {
    match &vm.history {
        Some(history) => components::render_predictor(vm, history, theme, cols, rows),
        None => components::render_key_entry(vm, theme, cols, rows),
    }
}
