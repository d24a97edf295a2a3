//! Application state management and view model computation.
//!
//! This module defines [`AppState`], the central state container for the
//! plugin, along with methods for input editing, history bookkeeping, and UI
//! view model generation. It is the single source of truth for all transient
//! UI state.
//!
//! # Architecture
//!
//! `AppState` separates core data (feedback records, the Gemini client) from
//! derived presentation (the view model computed per render). The history
//! panel never reads storage directly: it renders whatever records the worker
//! last delivered, and an internal event bus marks the history stale whenever
//! feedback changes so the handler knows to request a reload.
//!
//! # State Components
//!
//! - **Screen / Input Mode**: Which view is shown and how keys are read
//! - **Input**: The in-progress key or prediction text
//! - **Client**: The Gemini model-handle state machine
//! - **Prediction**: The most recent prediction awaiting or past review
//! - **Records**: Feedback history as last loaded from the worker
//! - **Error**: The banner-level error, if any

use super::modes::{InputMode, Screen};
use crate::domain::{Feedback, ZemojiError};
use crate::events::{EventBus, Topic};
use crate::gemini::{GeminiClient, ModelState};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    BannerInfo, FooterInfo, HeaderInfo, HistoryInfo, HistoryRow, PredictionInfo, PromptInfo,
    UiViewModel,
};
use std::cell::Cell;
use std::rc::Rc;

/// A prediction delivered by the model, kept with the input that produced it
/// so the feedback record can be built later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    /// The word, phrase, or emotion that was submitted.
    pub input: String,
    /// The predicted emoji.
    pub emoji: String,
}

/// Central application state container.
///
/// Mutated by the event handler in response to user input, worker responses,
/// and web-request results. View models are computed on demand per render.
#[derive(Debug)]
pub struct AppState {
    /// Which view is currently shown.
    pub screen: Screen,

    /// Current keystroke handling mode.
    pub input_mode: InputMode,

    /// Text being typed: the API key on the key screen, the prediction
    /// input on the predictor screen.
    pub input: String,

    /// Gemini client holding the model-handle state machine.
    pub client: GeminiClient,

    /// Whether a request is in flight. Suppresses editing and submission.
    pub loading: bool,

    /// Input queued while an implicit re-initialization probe resolves.
    pub pending_input: Option<String>,

    /// The most recent prediction, shown until the next submission.
    pub prediction: Option<Prediction>,

    /// Banner-level error shown above the prompt.
    pub error: Option<ZemojiError>,

    /// Feedback history as last loaded from the worker, oldest first.
    pub records: Vec<Feedback>,

    /// Color scheme for UI rendering.
    pub theme: Theme,

    /// Notifies the history panel when feedback changes.
    bus: EventBus,

    /// Set by the history subscription; drained by the event handler to
    /// trigger a reload from the worker.
    history_stale: Rc<Cell<bool>>,
}

impl AppState {
    /// Creates the initial state: key-entry screen, empty history, and the
    /// history panel subscribed to feedback updates.
    #[must_use]
    pub fn new(theme: Theme, client: GeminiClient) -> Self {
        let history_stale = Rc::new(Cell::new(false));
        let mut bus = EventBus::new();

        let flag = Rc::clone(&history_stale);
        bus.subscribe(Topic::FeedbackUpdated, move || flag.set(true));

        Self {
            screen: Screen::KeyEntry,
            input_mode: InputMode::Editing,
            input: String::new(),
            client,
            loading: false,
            pending_input: None,
            prediction: None,
            error: None,
            records: Vec::new(),
            theme,
            bus,
            history_stale,
        }
    }

    /// Publishes a feedback-updated notification to the history panel.
    pub fn notify_feedback_updated(&mut self) {
        self.bus.publish(Topic::FeedbackUpdated);
    }

    /// Drains the stale flag set by the history subscription.
    ///
    /// Returns `true` exactly once per notification burst so the handler
    /// requests a single reload.
    pub fn take_history_refresh(&mut self) -> bool {
        if self.history_stale.get() {
            self.history_stale.set(false);
            true
        } else {
            false
        }
    }

    /// Appends a character to the active input field.
    ///
    /// Ignored while a request is in flight or outside editing mode.
    pub fn push_char(&mut self, c: char) -> bool {
        if self.loading || self.input_mode != InputMode::Editing {
            return false;
        }
        self.input.push(c);
        true
    }

    /// Removes the last character from the active input field.
    pub fn pop_char(&mut self) -> bool {
        if self.loading || self.input_mode != InputMode::Editing {
            return false;
        }
        self.input.pop().is_some()
    }

    /// Number of records marked correct.
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_correct).count()
    }

    /// Computes a renderable UI view model from current state and terminal
    /// dimensions.
    ///
    /// Handles input masking on the key screen, newest-first windowing of the
    /// history, and mode-dependent footer hints.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UiViewModel {
        UiViewModel {
            header: self.compute_header(),
            banner: self.compute_banner(),
            prompt: self.compute_prompt(),
            prediction: self.compute_prediction(),
            history: self.compute_history(rows, cols),
            footer: self.compute_footer(),
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        let title = match self.client.state() {
            ModelState::Ready { model } => format!(" zemoji [{model}] "),
            _ => " zemoji ".to_string(),
        };
        HeaderInfo { title }
    }

    fn compute_banner(&self) -> Option<BannerInfo> {
        self.error.as_ref().map(|error| BannerInfo {
            message: error.to_string(),
            remediation: error.remediation().map(str::to_string),
            offers_key_change: error.offers_key_change(),
        })
    }

    fn compute_prompt(&self) -> PromptInfo {
        match self.screen {
            Screen::KeyEntry => PromptInfo {
                label: "Gemini API key".to_string(),
                value: "*".repeat(self.input.chars().count()),
                loading: self.loading,
            },
            Screen::Predictor => PromptInfo {
                label: "Word, phrase, or emotion".to_string(),
                value: self.input.clone(),
                loading: self.loading,
            },
        }
    }

    fn compute_prediction(&self) -> Option<PredictionInfo> {
        if self.screen != Screen::Predictor {
            return None;
        }
        self.prediction.as_ref().map(|p| PredictionInfo {
            input: p.input.clone(),
            emoji: p.emoji.clone(),
            awaiting_review: self.input_mode == InputMode::Review,
        })
    }

    /// Windows the history to the terminal, newest record first.
    fn compute_history(&self, rows: usize, cols: usize) -> Option<HistoryInfo> {
        if self.screen != Screen::Predictor {
            return None;
        }

        // Chrome above and below the history panel: header, prompt,
        // prediction line, panel title, and footer.
        let available_rows = rows.saturating_sub(10).max(1);

        let display_rows: Vec<HistoryRow> = self
            .records
            .iter()
            .rev()
            .take(available_rows)
            .map(|record| HistoryRow {
                time: record.display_time(),
                input: Self::truncate_input(&record.input, cols),
                emoji: record.predicted_emoji.clone(),
                is_correct: record.is_correct,
            })
            .collect();

        Some(HistoryInfo {
            rows: display_rows,
            total: self.records.len(),
            correct: self.correct_count(),
            confirm_clear: self.input_mode == InputMode::ConfirmClear,
        })
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match (self.screen, self.input_mode) {
            (Screen::KeyEntry, _) => "Enter: save key  Esc: quit".to_string(),
            (Screen::Predictor, InputMode::Editing) => {
                "Enter: predict  Ctrl+k: change key  Ctrl+r: reinitialize  Ctrl+x: clear history  Esc: quit"
                    .to_string()
            }
            (Screen::Predictor, InputMode::Review) => {
                "y: correct  n: incorrect  Esc: skip".to_string()
            }
            (Screen::Predictor, InputMode::ConfirmClear) => {
                "y: clear all feedback  n: keep".to_string()
            }
        };
        FooterInfo { keybindings }
    }

    /// Truncates a history input to fit alongside the time and emoji columns.
    fn truncate_input(input: &str, cols: usize) -> String {
        // 16 for the timestamp column, 6 for the emoji and mark.
        let max_width = cols.saturating_sub(22).max(8);
        if input.chars().count() > max_width {
            let kept: String = input.chars().take(max_width.saturating_sub(3)).collect();
            format!("{kept}...")
        } else {
            input.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(Theme::default(), GeminiClient::default())
    }

    #[test]
    fn key_screen_masks_typed_input() {
        let mut state = state();
        state.input = "AIzaFAKE".to_string();

        let vm = state.compute_viewmodel(24, 80);
        assert_eq!(vm.prompt.value, "********");
    }

    #[test]
    fn predictor_screen_shows_input_verbatim() {
        let mut state = state();
        state.screen = Screen::Predictor;
        state.input = "celebration".to_string();

        let vm = state.compute_viewmodel(24, 80);
        assert_eq!(vm.prompt.value, "celebration");
    }

    #[test]
    fn editing_is_suppressed_while_loading() {
        let mut state = state();
        state.loading = true;
        assert!(!state.push_char('a'));
        assert!(!state.pop_char());
        assert!(state.input.is_empty());
    }

    #[test]
    fn history_is_rendered_newest_first() {
        let mut state = state();
        state.screen = Screen::Predictor;
        state.records = vec![
            Feedback::new("first".to_string(), "🌧".to_string(), true),
            Feedback::new("second".to_string(), "🎉".to_string(), false),
        ];

        let vm = state.compute_viewmodel(24, 80);
        let history = vm.history.unwrap();
        assert_eq!(history.rows[0].input, "second");
        assert_eq!(history.rows[1].input, "first");
        assert_eq!(history.total, 2);
        assert_eq!(history.correct, 1);
    }

    #[test]
    fn history_window_respects_terminal_height() {
        let mut state = state();
        state.screen = Screen::Predictor;
        for i in 0..50 {
            state.records.push(Feedback::new(format!("input-{i}"), "🎉".to_string(), true));
        }

        let vm = state.compute_viewmodel(20, 80);
        let history = vm.history.unwrap();
        assert_eq!(history.rows.len(), 10);
        assert_eq!(history.rows[0].input, "input-49");
        assert_eq!(history.total, 50);
    }

    #[test]
    fn stale_flag_is_drained_once_per_notification() {
        let mut state = state();
        assert!(!state.take_history_refresh());

        state.notify_feedback_updated();
        assert!(state.take_history_refresh());
        assert!(!state.take_history_refresh());
    }

    #[test]
    fn long_history_inputs_are_truncated() {
        let long = "a very long phrase that would overflow the panel".repeat(3);
        let truncated = AppState::truncate_input(&long, 40);
        assert!(truncated.ends_with("..."));
        assert!(truncated.chars().count() <= 18);
    }
}
