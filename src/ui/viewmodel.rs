//! View model types for UI rendering.
//!
//! These structs carry everything the component renderers need, precomputed
//! by [`AppState::compute_viewmodel`](crate::app::AppState::compute_viewmodel).
//! Renderers never touch application state directly: they consume a view
//! model and print, which keeps layout decisions testable without a terminal.

/// Complete renderable representation of the UI for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiViewModel {
    /// Title bar content.
    pub header: HeaderInfo,

    /// Error banner, shown above the prompt when present.
    pub banner: Option<BannerInfo>,

    /// The input prompt box.
    pub prompt: PromptInfo,

    /// The most recent prediction, when on the predictor screen.
    pub prediction: Option<PredictionInfo>,

    /// The feedback history panel, when on the predictor screen.
    pub history: Option<HistoryInfo>,

    /// Keybinding hints for the current mode.
    pub footer: FooterInfo,
}

/// Title bar content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    /// Centered title text, including the active model when ready.
    pub title: String,
}

/// Error banner content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerInfo {
    /// The error message.
    pub message: String,

    /// Suggested next step, when the error category has one.
    pub remediation: Option<String>,

    /// Whether the change-key binding should be advertised.
    pub offers_key_change: bool,
}

/// Input prompt box content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptInfo {
    /// Field label above the input.
    pub label: String,

    /// Text to display. Already masked on the key screen.
    pub value: String,

    /// Whether a request is in flight. Shows the busy indicator and greys
    /// out the input.
    pub loading: bool,
}

/// The latest prediction and its review state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionInfo {
    /// The input the prediction was made for.
    pub input: String,

    /// The predicted emoji.
    pub emoji: String,

    /// Whether the y/n review question should be shown.
    pub awaiting_review: bool,
}

/// One row of the history panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    /// Formatted local timestamp (`dd/mm/yyyy hh:mm`).
    pub time: String,

    /// The recorded input, truncated to fit.
    pub input: String,

    /// The predicted emoji.
    pub emoji: String,

    /// Whether the prediction was marked correct.
    pub is_correct: bool,
}

/// The feedback history panel, newest row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryInfo {
    /// Visible rows after windowing.
    pub rows: Vec<HistoryRow>,

    /// Total stored records, including those outside the window.
    pub total: usize,

    /// How many records are marked correct.
    pub correct: usize,

    /// Whether the clear-history confirmation is pending.
    pub confirm_clear: bool,
}

/// Footer keybinding hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    /// Space-separated keybinding hint text.
    pub keybindings: String,
}
