//! Screen and input mode state types for the application.
//!
//! This module defines the state machine enums that control which view is
//! shown and how keystrokes are interpreted. These types determine the active
//! keybindings, the footer hints, and whether typed characters go to the key
//! field or the prediction input.
//!
//! # State Machine
//!
//! The plugin shows one of two screens:
//! - **`KeyEntry`**: collecting the Gemini API key (masked input)
//! - **Predictor**: the prediction prompt plus the feedback history
//!
//! Within the predictor, input modes control keystroke handling:
//! - **Editing**: typing the word or phrase to predict for
//! - **Review**: a prediction is shown and y/n records feedback
//! - **`ConfirmClear`**: y/n confirms wiping the feedback history

/// Which view the plugin is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Collecting the API key. Typed characters are masked in the UI.
    ///
    /// Entered on startup when no key is stored, after an initialization
    /// failure, and via the change-key binding.
    KeyEntry,

    /// The main predictor view with the history panel.
    Predictor,
}

/// Current keystroke handling mode within the predictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Typing into the active input field.
    ///
    /// Enter submits; Ctrl+k changes the key, Ctrl+r re-initializes,
    /// Ctrl+x asks to clear the history, Esc dismisses or quits.
    Editing,

    /// A fresh prediction is displayed and awaiting review.
    ///
    /// y records the prediction as correct, n as incorrect, Esc skips
    /// recording entirely.
    Review,

    /// Confirmation prompt before clearing the feedback history.
    ///
    /// y clears, n or Esc cancels.
    ConfirmClear,
}
