//! Event handling and state transition logic.
//!
//! This module implements the core event handler that processes user input,
//! web-request results, and worker responses, translating them into state
//! changes and action sequences. It is the primary control flow coordinator
//! for the application.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the plugin runtime or worker thread
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations occur via `AppState` methods
//! 4. Actions are collected and returned for execution
//!
//! # Event Types
//!
//! - **Input**: `Char`, `Backspace`, `Submit`, `Escape`
//! - **Review**: `Confirm`, `Deny`
//! - **Commands**: `ChangeKey`, `Reinitialize`, `ClearHistory`, `CloseFocus`
//! - **System**: `WebResult`, `FeedbackFileChanged`, `PermissionsResult`
//! - **Worker**: `WorkerResponse` with typed message variants

use crate::app::state::Prediction;
use crate::app::{Action, AppState, InputMode, Screen};
use crate::domain::error::Result;
use crate::domain::{Feedback, ZemojiError};
use crate::gemini::{PredictStart, ProbeOutcome, RequestTag};
use crate::worker::{WorkerMessage, WorkerResponse};
use zellij_tile::prelude::PermissionType;

/// Events triggered by user input, system changes, or worker responses.
///
/// Each event represents a discrete occurrence that may cause state changes
/// and action emissions. The handler processes these sequentially, ensuring
/// deterministic state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Appends a character to the active input field.
    Char(char),
    /// Removes the last character from the active input field.
    Backspace,
    /// Submits the active input: the API key on the key screen, the
    /// prediction input on the predictor screen.
    Submit,
    /// Dismisses the current banner, review, or confirmation; quits when
    /// there is nothing to dismiss.
    Escape,
    /// Confirms the pending question: records the prediction as correct, or
    /// approves clearing the history.
    Confirm,
    /// Denies the pending question: records the prediction as incorrect, or
    /// cancels clearing the history.
    Deny,
    /// Drops the current key and model handle and returns to key entry.
    ChangeKey,
    /// Re-runs model initialization with the stored key.
    Reinitialize,
    /// Asks for confirmation before wiping the feedback history.
    ClearHistory,
    /// Closes the floating pane and hides the plugin UI.
    CloseFocus,

    /// Result of an HTTP request fired earlier through the host.
    WebResult {
        /// Which in-flight request this result belongs to.
        tag: RequestTag,
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: Vec<u8>,
    },

    /// The feedback file changed on disk, possibly from another plugin
    /// instance. Triggers a history reload.
    FeedbackFileChanged,

    /// Reports granted Zellij permissions after the permission request.
    PermissionsResult {
        /// Permissions granted by the user.
        granted: Vec<PermissionType>,
    },

    /// Wraps a response from the background worker thread.
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates application state, and returns actions to
/// execute.
///
/// Returns `(should_render, actions)`: the boolean tells the plugin runtime
/// whether the UI needs repainting, and the actions are executed in order.
///
/// # Errors
///
/// Returns errors from state mutation methods. Expected failures such as a
/// malformed key or a quota response are not errors here: they land in the
/// state's banner instead so the UI can show them.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::Char(c) => Ok((state.push_char(*c), vec![])),
        Event::Backspace => Ok((state.pop_char(), vec![])),
        Event::Submit => handle_submit(state),
        Event::Escape => handle_escape(state),
        Event::Confirm => handle_review(state, true),
        Event::Deny => handle_review(state, false),
        Event::ChangeKey => {
            tracing::debug!("dropping key and returning to key entry");
            state.client.reset();
            state.screen = Screen::KeyEntry;
            state.input_mode = InputMode::Editing;
            state.input.clear();
            state.prediction = None;
            state.pending_input = None;
            state.loading = false;
            state.error = None;
            Ok((true, vec![Action::PostToWorker(WorkerMessage::clear_api_key())]))
        }
        Event::Reinitialize => {
            if state.loading {
                return Ok((false, vec![]));
            }
            tracing::debug!("re-initializing model from stored key");
            state.loading = true;
            state.error = None;
            Ok((true, vec![Action::PostToWorker(WorkerMessage::load_api_key())]))
        }
        Event::ClearHistory => {
            if state.screen != Screen::Predictor || state.input_mode != InputMode::Editing {
                return Ok((false, vec![]));
            }
            state.input_mode = InputMode::ConfirmClear;
            Ok((true, vec![]))
        }
        Event::CloseFocus => Ok((false, vec![Action::CloseFocus])),
        Event::WebResult { tag, status, body } => match tag {
            RequestTag::InitProbe => handle_probe_result(state, *status, body),
            RequestTag::Predict => handle_predict_result(state, *status, body),
        },
        Event::FeedbackFileChanged => {
            tracing::debug!("feedback file changed on disk");
            state.notify_feedback_updated();
            Ok((false, refresh_actions(state)))
        }
        Event::PermissionsResult { granted } => {
            if granted.is_empty() {
                tracing::warn!("permissions denied, plugin functionality limited");
                return Ok((false, vec![]));
            }
            tracing::debug!(granted = ?granted, "permissions granted, loading stored state");
            state.loading = true;
            Ok((
                true,
                vec![
                    Action::PostToWorker(WorkerMessage::load_api_key()),
                    Action::PostToWorker(WorkerMessage::load_feedback()),
                ],
            ))
        }
        Event::WorkerResponse(response) => handle_worker_response(state, response),
    }
}

/// Drains the history-stale flag into a single reload request.
fn refresh_actions(state: &mut AppState) -> Vec<Action> {
    if state.take_history_refresh() {
        vec![Action::PostToWorker(WorkerMessage::load_feedback())]
    } else {
        vec![]
    }
}

fn handle_submit(state: &mut AppState) -> Result<(bool, Vec<Action>)> {
    if state.loading || state.input_mode != InputMode::Editing {
        return Ok((false, vec![]));
    }

    let input = state.input.trim().to_string();
    if input.is_empty() {
        return Ok((false, vec![]));
    }

    match state.screen {
        Screen::KeyEntry => match state.client.begin_initialize(&input) {
            Ok(probe) => {
                tracing::debug!("key accepted, probing model availability");
                state.loading = true;
                state.error = None;
                Ok((
                    true,
                    vec![
                        Action::PostToWorker(WorkerMessage::save_api_key(input)),
                        Action::Fetch(probe),
                    ],
                ))
            }
            Err(e) => {
                tracing::debug!(error = %e, "key rejected");
                state.error = Some(e);
                Ok((true, vec![]))
            }
        },
        Screen::Predictor => match state.client.start_prediction(&input) {
            Ok(PredictStart::Request(request)) => {
                state.loading = true;
                state.error = None;
                state.pending_input = Some(input);
                Ok((true, vec![Action::Fetch(request)]))
            }
            Ok(PredictStart::Reinitialize(probe)) => {
                tracing::debug!("handle stale, re-probing before prediction");
                state.loading = true;
                state.error = None;
                state.pending_input = Some(input);
                Ok((true, vec![Action::Fetch(probe)]))
            }
            Err(e) => {
                state.error = Some(e);
                state.screen = Screen::KeyEntry;
                Ok((true, vec![]))
            }
        },
    }
}

fn handle_escape(state: &mut AppState) -> Result<(bool, Vec<Action>)> {
    match state.input_mode {
        InputMode::Review => {
            // Skip recording feedback for this prediction.
            state.input_mode = InputMode::Editing;
            Ok((true, vec![]))
        }
        InputMode::ConfirmClear => {
            state.input_mode = InputMode::Editing;
            Ok((true, vec![]))
        }
        InputMode::Editing => {
            if state.error.is_some() {
                state.error = None;
                Ok((true, vec![]))
            } else {
                Ok((false, vec![Action::CloseFocus]))
            }
        }
    }
}

/// Handles y/n in the review and clear-confirmation modes.
fn handle_review(state: &mut AppState, confirmed: bool) -> Result<(bool, Vec<Action>)> {
    match state.input_mode {
        InputMode::Review => {
            let Some(prediction) = state.prediction.clone() else {
                state.input_mode = InputMode::Editing;
                return Ok((true, vec![]));
            };

            tracing::debug!(
                input = %prediction.input,
                emoji = %prediction.emoji,
                is_correct = confirmed,
                "recording feedback"
            );

            let record = Feedback::new(prediction.input, prediction.emoji, confirmed);
            state.input_mode = InputMode::Editing;
            Ok((true, vec![Action::PostToWorker(WorkerMessage::append_feedback(record))]))
        }
        InputMode::ConfirmClear => {
            state.input_mode = InputMode::Editing;
            if confirmed {
                tracing::debug!("clearing feedback history");
                Ok((true, vec![Action::PostToWorker(WorkerMessage::clear_feedback())]))
            } else {
                Ok((true, vec![]))
            }
        }
        InputMode::Editing => Ok((false, vec![])),
    }
}

fn handle_probe_result(state: &mut AppState, status: u16, body: &[u8]) -> Result<(bool, Vec<Action>)> {
    let from_key_entry = state.screen == Screen::KeyEntry;

    match state.client.handle_probe_result(status, body) {
        ProbeOutcome::Ready { model } => {
            tracing::debug!(model = %model, "model ready");
            state.error = None;
            state.screen = Screen::Predictor;

            if from_key_entry {
                // The typed key must not leak into the prediction field.
                state.input.clear();
            }

            if let Some(input) = state.pending_input.clone() {
                // A prediction was queued behind this re-initialization.
                match state.client.start_prediction(&input) {
                    Ok(PredictStart::Request(request)) => {
                        return Ok((true, vec![Action::Fetch(request)]));
                    }
                    Ok(PredictStart::Reinitialize(_)) | Err(_) => {
                        // Ready was just reported; anything else means the
                        // queued input cannot be served.
                        state.pending_input = None;
                        state.loading = false;
                        state.error = Some(ZemojiError::NotInitialized);
                        return Ok((true, vec![]));
                    }
                }
            }

            state.loading = false;
            Ok((true, vec![]))
        }
        ProbeOutcome::RetryFallback(probe) => Ok((false, vec![Action::Fetch(probe)])),
        ProbeOutcome::Failed(message) => {
            tracing::debug!(message = %message, "model initialization failed");
            state.loading = false;
            state.pending_input = None;
            state.screen = Screen::KeyEntry;
            state.error = Some(ZemojiError::InitializationFailed(message));
            Ok((true, vec![]))
        }
    }
}

fn handle_predict_result(state: &mut AppState, status: u16, body: &[u8]) -> Result<(bool, Vec<Action>)> {
    state.loading = false;
    let input = state.pending_input.take().unwrap_or_default();

    match state.client.handle_predict_result(status, body) {
        Ok(emoji) => {
            tracing::debug!(input = %input, emoji = %emoji, "prediction received");
            state.prediction = Some(Prediction { input, emoji });
            state.input.clear();
            state.input_mode = InputMode::Review;
            state.error = None;
            Ok((true, vec![]))
        }
        Err(e) => {
            // No feedback record is created for a failed prediction.
            tracing::debug!(error = %e, "prediction failed");
            state.error = Some(e);
            Ok((true, vec![]))
        }
    }
}

fn handle_worker_response(
    state: &mut AppState,
    response: &WorkerResponse,
) -> Result<(bool, Vec<Action>)> {
    match response {
        WorkerResponse::ApiKeyLoaded { key } => match key {
            Some(key) => match state.client.begin_initialize(key) {
                Ok(probe) => {
                    state.loading = true;
                    Ok((true, vec![Action::Fetch(probe)]))
                }
                Err(e) => {
                    tracing::debug!(error = %e, "stored key is malformed");
                    state.loading = false;
                    state.screen = Screen::KeyEntry;
                    state.error = Some(e);
                    Ok((true, vec![]))
                }
            },
            None => {
                tracing::debug!("no stored key, collecting one");
                state.loading = false;
                state.screen = Screen::KeyEntry;
                Ok((true, vec![]))
            }
        },
        WorkerResponse::ApiKeySaved | WorkerResponse::ApiKeyCleared => Ok((false, vec![])),
        WorkerResponse::FeedbackAppended { count } => {
            tracing::debug!(count, "feedback recorded");
            state.notify_feedback_updated();
            Ok((false, refresh_actions(state)))
        }
        WorkerResponse::FeedbackCleared => {
            state.notify_feedback_updated();
            Ok((false, refresh_actions(state)))
        }
        WorkerResponse::FeedbackLoaded { records } => {
            if &state.records == records {
                tracing::debug!("history unchanged, skipping render");
                Ok((false, vec![]))
            } else {
                state.records.clone_from(records);
                Ok((true, vec![]))
            }
        }
        WorkerResponse::Error { message } => {
            tracing::error!("worker error: {message}");
            state.error = Some(ZemojiError::Storage(message.clone()));
            Ok((true, vec![]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::{GeminiClient, HttpMethod, PREFERRED_MODEL};
    use crate::ui::theme::Theme;

    fn new_state() -> AppState {
        AppState::new(Theme::default(), GeminiClient::default())
    }

    fn type_text(state: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_event(state, &Event::Char(c)).unwrap();
        }
    }

    fn predict_body(text: &str) -> Vec<u8> {
        serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        })
        .to_string()
        .into_bytes()
    }

    fn error_body(message: &str) -> Vec<u8> {
        serde_json::json!({ "error": { "message": message } })
            .to_string()
            .into_bytes()
    }

    /// Drives the state through key entry and a successful probe.
    fn ready_state() -> AppState {
        let mut state = new_state();
        type_text(&mut state, "AIzaFAKEKEY");
        handle_event(&mut state, &Event::Submit).unwrap();
        handle_event(
            &mut state,
            &Event::WebResult { tag: RequestTag::InitProbe, status: 200, body: b"{}".to_vec() },
        )
        .unwrap();
        state
    }

    #[test]
    fn valid_key_is_saved_and_probed() {
        let mut state = new_state();
        type_text(&mut state, "AIzaFAKEKEY");

        let (_, actions) = handle_event(&mut state, &Event::Submit).unwrap();
        assert!(state.loading);
        assert!(matches!(
            actions[0],
            Action::PostToWorker(WorkerMessage::SaveApiKey { ref key, .. }) if key == "AIzaFAKEKEY"
        ));
        let Action::Fetch(ref probe) = actions[1] else { panic!("expected a probe") };
        assert_eq!(probe.tag, RequestTag::InitProbe);
        assert_eq!(probe.method, HttpMethod::Get);
        assert!(probe.url.contains(PREFERRED_MODEL));
    }

    #[test]
    fn malformed_key_is_rejected_without_side_effects() {
        let mut state = new_state();
        type_text(&mut state, "wrongformat");

        let (render, actions) = handle_event(&mut state, &Event::Submit).unwrap();
        assert!(render);
        assert!(actions.is_empty());
        assert!(matches!(state.error, Some(ZemojiError::InvalidKeyFormat)));
        assert_eq!(state.screen, Screen::KeyEntry);
        assert!(!state.loading);
    }

    #[test]
    fn successful_probe_moves_to_the_predictor() {
        let state = ready_state();
        assert_eq!(state.screen, Screen::Predictor);
        assert!(state.client.is_ready());
        assert!(!state.loading);
        assert!(state.input.is_empty());
        assert!(state.error.is_none());
    }

    #[test]
    fn failed_probes_fall_back_then_return_to_key_entry() {
        let mut state = new_state();
        type_text(&mut state, "AIzaFAKEKEY");
        handle_event(&mut state, &Event::Submit).unwrap();

        let (_, actions) = handle_event(
            &mut state,
            &Event::WebResult {
                tag: RequestTag::InitProbe,
                status: 404,
                body: error_body("model not available"),
            },
        )
        .unwrap();
        assert!(matches!(actions[0], Action::Fetch(_)));

        let (render, _) = handle_event(
            &mut state,
            &Event::WebResult {
                tag: RequestTag::InitProbe,
                status: 404,
                body: error_body("model not available"),
            },
        )
        .unwrap();
        assert!(render);
        assert_eq!(state.screen, Screen::KeyEntry);
        assert!(matches!(state.error, Some(ZemojiError::InitializationFailed(_))));
        assert!(!state.loading);
    }

    #[test]
    fn prediction_flow_records_correct_feedback() {
        let mut state = ready_state();
        type_text(&mut state, "party");

        let (_, actions) = handle_event(&mut state, &Event::Submit).unwrap();
        assert!(state.loading);
        let Action::Fetch(ref request) = actions[0] else { panic!("expected a fetch") };
        assert_eq!(request.tag, RequestTag::Predict);

        handle_event(
            &mut state,
            &Event::WebResult {
                tag: RequestTag::Predict,
                status: 200,
                body: predict_body("🎉"),
            },
        )
        .unwrap();
        assert_eq!(state.input_mode, InputMode::Review);
        assert_eq!(state.prediction.as_ref().unwrap().emoji, "🎉");
        assert!(state.input.is_empty());

        let (_, actions) = handle_event(&mut state, &Event::Confirm).unwrap();
        assert!(matches!(
            actions[0],
            Action::PostToWorker(WorkerMessage::AppendFeedback { ref record, .. })
                if record.input == "party" && record.predicted_emoji == "🎉" && record.is_correct
        ));
        assert_eq!(state.input_mode, InputMode::Editing);
    }

    #[test]
    fn deny_records_incorrect_feedback() {
        let mut state = ready_state();
        type_text(&mut state, "rain");
        handle_event(&mut state, &Event::Submit).unwrap();
        handle_event(
            &mut state,
            &Event::WebResult { tag: RequestTag::Predict, status: 200, body: predict_body("🌧") },
        )
        .unwrap();

        let (_, actions) = handle_event(&mut state, &Event::Deny).unwrap();
        assert!(matches!(
            actions[0],
            Action::PostToWorker(WorkerMessage::AppendFeedback { ref record, .. })
                if !record.is_correct
        ));
    }

    #[test]
    fn escape_in_review_skips_recording() {
        let mut state = ready_state();
        type_text(&mut state, "rain");
        handle_event(&mut state, &Event::Submit).unwrap();
        handle_event(
            &mut state,
            &Event::WebResult { tag: RequestTag::Predict, status: 200, body: predict_body("🌧") },
        )
        .unwrap();

        let (_, actions) = handle_event(&mut state, &Event::Escape).unwrap();
        assert!(actions.is_empty());
        assert_eq!(state.input_mode, InputMode::Editing);
    }

    #[test]
    fn quota_failure_shows_banner_and_records_nothing() {
        let mut state = ready_state();
        type_text(&mut state, "rain");
        handle_event(&mut state, &Event::Submit).unwrap();

        let (render, actions) = handle_event(
            &mut state,
            &Event::WebResult {
                tag: RequestTag::Predict,
                status: 429,
                body: error_body("quota exceeded for this project"),
            },
        )
        .unwrap();
        assert!(render);
        assert!(actions.is_empty());
        assert!(matches!(state.error, Some(ZemojiError::QuotaExceeded(_))));
        assert_eq!(state.input_mode, InputMode::Editing);
        assert!(!state.loading);
    }

    #[test]
    fn feedback_append_triggers_exactly_one_reload() {
        let mut state = ready_state();

        let (_, actions) = handle_event(
            &mut state,
            &Event::WorkerResponse(WorkerResponse::FeedbackAppended { count: 1 }),
        )
        .unwrap();
        assert_eq!(actions.len(), 1);
        assert!(matches!(
            actions[0],
            Action::PostToWorker(WorkerMessage::LoadFeedback { .. })
        ));

        // The stale flag was drained; no duplicate reload.
        let (_, actions) = handle_event(&mut state, &Event::FeedbackFileChanged).unwrap();
        assert_eq!(actions.len(), 1);
        let (_, actions) = handle_event(
            &mut state,
            &Event::WorkerResponse(WorkerResponse::FeedbackLoaded { records: vec![] }),
        )
        .unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn loaded_history_updates_state() {
        let mut state = ready_state();
        let records = vec![Feedback::new("rain".to_string(), "🌧".to_string(), true)];

        let (render, _) = handle_event(
            &mut state,
            &Event::WorkerResponse(WorkerResponse::FeedbackLoaded { records: records.clone() }),
        )
        .unwrap();
        assert!(render);
        assert_eq!(state.records, records);

        // Identical reload skips the render.
        let (render, _) = handle_event(
            &mut state,
            &Event::WorkerResponse(WorkerResponse::FeedbackLoaded { records }),
        )
        .unwrap();
        assert!(!render);
    }

    #[test]
    fn clear_history_requires_confirmation() {
        let mut state = ready_state();

        handle_event(&mut state, &Event::ClearHistory).unwrap();
        assert_eq!(state.input_mode, InputMode::ConfirmClear);

        let (_, actions) = handle_event(&mut state, &Event::Deny).unwrap();
        assert!(actions.is_empty());
        assert_eq!(state.input_mode, InputMode::Editing);

        handle_event(&mut state, &Event::ClearHistory).unwrap();
        let (_, actions) = handle_event(&mut state, &Event::Confirm).unwrap();
        assert!(matches!(
            actions[0],
            Action::PostToWorker(WorkerMessage::ClearFeedback { .. })
        ));
    }

    #[test]
    fn change_key_resets_client_and_clears_stored_key() {
        let mut state = ready_state();

        let (_, actions) = handle_event(&mut state, &Event::ChangeKey).unwrap();
        assert_eq!(state.screen, Screen::KeyEntry);
        assert!(!state.client.has_key());
        assert!(matches!(
            actions[0],
            Action::PostToWorker(WorkerMessage::ClearApiKey { .. })
        ));
    }

    #[test]
    fn stale_handle_queues_the_input_through_a_reprobe() {
        let mut state = new_state();
        type_text(&mut state, "AIzaFAKEKEY");
        handle_event(&mut state, &Event::Submit).unwrap();
        // Jump straight to the predictor without resolving the probe, as
        // happens when the pane is reopened with a key already cached.
        state.screen = Screen::Predictor;
        state.loading = false;
        state.input.clear();

        type_text(&mut state, "rain");
        let (_, actions) = handle_event(&mut state, &Event::Submit).unwrap();
        let Action::Fetch(ref probe) = actions[0] else { panic!("expected a probe") };
        assert_eq!(probe.tag, RequestTag::InitProbe);
        assert_eq!(state.pending_input.as_deref(), Some("rain"));

        // Probe resolves; the queued prediction fires automatically.
        let (_, actions) = handle_event(
            &mut state,
            &Event::WebResult { tag: RequestTag::InitProbe, status: 200, body: b"{}".to_vec() },
        )
        .unwrap();
        let Action::Fetch(ref request) = actions[0] else { panic!("expected a fetch") };
        assert_eq!(request.tag, RequestTag::Predict);
        let body = String::from_utf8(request.body.clone()).unwrap();
        assert!(body.contains("rain"));
    }

    #[test]
    fn granted_permissions_load_the_key_and_history() {
        let mut state = new_state();
        let (render, actions) = handle_event(
            &mut state,
            &Event::PermissionsResult {
                granted: vec![PermissionType::WebAccess, PermissionType::FullHdAccess],
            },
        )
        .unwrap();
        assert!(render);
        assert!(state.loading);
        assert!(matches!(
            actions[0],
            Action::PostToWorker(WorkerMessage::LoadApiKey { .. })
        ));
        assert!(matches!(
            actions[1],
            Action::PostToWorker(WorkerMessage::LoadFeedback { .. })
        ));
    }

    #[test]
    fn denied_permissions_do_nothing() {
        let mut state = new_state();
        let (render, actions) =
            handle_event(&mut state, &Event::PermissionsResult { granted: vec![] }).unwrap();
        assert!(!render);
        assert!(actions.is_empty());
        assert!(!state.loading);
    }

    #[test]
    fn startup_without_a_stored_key_lands_on_key_entry() {
        let mut state = new_state();
        let (render, actions) = handle_event(
            &mut state,
            &Event::WorkerResponse(WorkerResponse::ApiKeyLoaded { key: None }),
        )
        .unwrap();
        assert!(render);
        assert!(actions.is_empty());
        assert_eq!(state.screen, Screen::KeyEntry);
    }

    #[test]
    fn startup_with_a_stored_key_probes_immediately() {
        let mut state = new_state();
        let (_, actions) = handle_event(
            &mut state,
            &Event::WorkerResponse(WorkerResponse::ApiKeyLoaded {
                key: Some("AIzaFAKEKEY".to_string()),
            }),
        )
        .unwrap();
        assert!(state.loading);
        assert!(matches!(actions[0], Action::Fetch(_)));
    }

    #[test]
    fn reinitialize_reloads_the_stored_key() {
        let mut state = ready_state();
        let (_, actions) = handle_event(&mut state, &Event::Reinitialize).unwrap();
        assert!(matches!(
            actions[0],
            Action::PostToWorker(WorkerMessage::LoadApiKey { .. })
        ));
        assert!(state.loading);
    }

    #[test]
    fn typing_is_ignored_while_a_request_is_in_flight() {
        let mut state = ready_state();
        type_text(&mut state, "rain");
        handle_event(&mut state, &Event::Submit).unwrap();

        let (render, _) = handle_event(&mut state, &Event::Char('x')).unwrap();
        assert!(!render);
        let (render, actions) = handle_event(&mut state, &Event::Submit).unwrap();
        assert!(!render);
        assert!(actions.is_empty());
    }

    #[test]
    fn worker_error_lands_in_the_banner() {
        let mut state = ready_state();
        let (render, _) = handle_event(
            &mut state,
            &Event::WorkerResponse(WorkerResponse::Error { message: "disk full".to_string() }),
        )
        .unwrap();
        assert!(render);
        assert!(matches!(state.error, Some(ZemojiError::Storage(_))));
    }
}
