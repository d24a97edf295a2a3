//! Zellij plugin wrapper and entry point.
//!
//! This module provides the thin integration layer between the Zemoji library
//! and the Zellij plugin system. It implements the `ZellijPlugin` and
//! `ZellijWorker` traits to handle Zellij events and lifecycle.
//!
//! # Architecture
//!
//! The plugin uses Zellij's worker thread support for background storage I/O:
//!
//! ```text
//! ┌─────────────────────────┐
//! │   Zellij Main Thread    │
//! │  ┌──────────────────┐   │
//! │  │  State (plugin)  │   │  ← UI state, event handling
//! │  └──────────────────┘   │
//! │          │              │
//! │          │ IPC          │
//! │          ▼              │
//! │  ┌──────────────────┐   │
//! │  │   ZemojiWorker   │   │  ← Background processing
//! │  │ (worker thread)  │   │  ← Storage operations
//! │  └──────────────────┘   │
//! └─────────────────────────┘
//! ```
//!
//! # Plugin Lifecycle
//!
//! 1. **Load**: Parse config, initialize tracing, create `AppState`
//! 2. **Subscribe**: Register for Key, `WebRequestResult`, `CustomMessage`,
//!    filesystem events
//! 3. **Permissions**: Once granted, load the stored key and feedback history
//! 4. **Update**: Handle events, delegate to library layer
//! 5. **Render**: Call library render function
//!
//! # Worker Communication
//!
//! Messages between plugin and worker use JSON serialization:
//!
//! - Plugin → Worker: [`WorkerMessage`] (`LoadFeedback`, `SaveApiKey`, etc.)
//! - Worker → Plugin: [`WorkerResponse`] (`FeedbackLoaded`, error details)
//!
//! # Event Mapping
//!
//! Zellij events are translated to library events:
//!
//! - `Key(Enter)` → `Event::Submit`
//! - `Key(y)` / `Key(n)` → `Event::Confirm` / `Event::Deny` (review modes only)
//! - `WebRequestResult` → `Event::WebResult` (tagged via the request context)
//! - `FileSystemUpdate` → `Event::FeedbackFileChanged` (feedback file only)
//! - `CustomMessage` → `Event::WorkerResponse`
//!
//! # Keybindings
//!
//! While editing:
//! - Printable characters: type into the key or prediction field
//! - `Enter`: Submit the key or prediction input
//! - `Esc`: Dismiss the error banner, or quit
//! - `Ctrl+k`: Drop the key and return to key entry
//! - `Ctrl+r`: Re-initialize the model from the stored key
//! - `Ctrl+x`: Ask to clear the feedback history
//!
//! While reviewing a prediction or confirming a clear:
//! - `y` / `n`: Confirm or deny
//! - `Esc`: Skip / cancel

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use zellij_tile::prelude::*;
use zellij_tile::shim::post_message_to;

use zemoji::gemini::{HttpMethod, RequestTag};
use zemoji::worker::{WorkerMessage, WorkerResponse, ZemojiWorker};
use zemoji::{handle_event, Action, Config, Event, InputMode};

// Register plugin and worker with Zellij
register_plugin!(State);
register_worker!(ZemojiWorker, zemoji_worker, ZEMOJI_WORKER);

/// Plugin state wrapper.
///
/// Wraps the library's `AppState` with Zellij-specific concerns like worker
/// communication.
struct State {
    /// Core application state from library layer.
    app: zemoji::app::AppState,

    /// Worker thread identifier for IPC messaging.
    worker_name: String,
}

impl Default for State {
    fn default() -> Self {
        let default_config = Config::default();
        Self {
            app: zemoji::initialize(&default_config),
            worker_name: "zemoji".to_string(),
        }
    }
}

impl ZellijPlugin for State {
    /// Initializes the plugin on load.
    ///
    /// Called once during plugin startup. Parses configuration, initializes
    /// application state, requests permissions, and subscribes to events. The
    /// stored key and feedback history are loaded once permissions arrive.
    ///
    /// # Permissions
    ///
    /// Requests:
    /// - `WebAccess`: Call the Gemini API through the host
    /// - `FullHdAccess`: Watch the feedback file for external changes
    ///
    /// # Subscriptions
    ///
    /// - `Key`: Keyboard input
    /// - `CustomMessage`: Worker responses
    /// - `WebRequestResult`: Gemini API responses
    /// - `FileSystemCreate` / `Update` / `Delete`: Feedback file changes
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        zemoji::observability::init_tracing(&config);

        let span = tracing::debug_span!("plugin_load");
        let _guard = span.entered();

        tracing::debug!("plugin loading started");
        self.app = zemoji::initialize(&config);
        tracing::debug!("app state initialized");

        tracing::debug!("requesting permissions");
        request_permission(&[PermissionType::WebAccess, PermissionType::FullHdAccess]);

        tracing::debug!("subscribing to events");
        subscribe(&[
            EventType::Key,
            EventType::CustomMessage,
            EventType::WebRequestResult,
            EventType::PermissionRequestResult,
            EventType::FileSystemCreate,
            EventType::FileSystemUpdate,
            EventType::FileSystemDelete,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    /// Handles incoming Zellij events.
    ///
    /// Translates Zellij events to library events, delegates to `handle_event`,
    /// and executes resulting actions. Returns `true` if the UI should re-render.
    ///
    /// # Parameters
    ///
    /// * `event` - Zellij event to process
    ///
    /// # Returns
    ///
    /// - `true` if the plugin UI should re-render
    /// - `false` if the event was ignored or resulted in no state changes
    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let span_name = format!("plugin_update::{event_name}");
        let span = tracing::debug_span!("plugin_update_event", otel.name = %span_name, event_type = %event_name);
        let _guard = span.entered();

        tracing::debug!(event = %event_name, "processing event");

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match self.map_key_event(key) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                match self.map_custom_message_event(&message, &payload) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => {
                match Self::map_web_request_result(status, body, &context) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::FileSystemCreate(ref paths)
            | zellij_tile::prelude::Event::FileSystemUpdate(ref paths)
            | zellij_tile::prelude::Event::FileSystemDelete(ref paths) => {
                match Self::map_filesystem_event(paths) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::PermissionRequestResult(permissions) => {
                Self::map_permission_result(permissions)
            }
            _ => return false,
        };

        match handle_event(&mut self.app, &our_event) {
            Ok((should_render, actions)) => {
                tracing::debug!(
                    action_count = actions.len(),
                    should_render = should_render,
                    "event handled successfully"
                );
                for a in actions {
                    self.execute_action(&a);
                }
                should_render
            }
            Err(e) => {
                tracing::debug!(error = %e, "error handling event");
                false
            }
        }
    }

    /// Renders the plugin UI.
    ///
    /// Delegates to the library's rendering layer.
    ///
    /// # Parameters
    ///
    /// * `rows` - Terminal height in rows
    /// * `cols` - Terminal width in columns
    fn render(&mut self, rows: usize, cols: usize) {
        zemoji::ui::render(&self.app, rows, cols);
    }
}

impl State {
    /// Gets a string name for a Zellij event for logging purposes.
    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::CustomMessage(msg, _) => format!("CustomMessage({msg})"),
            zellij_tile::prelude::Event::WebRequestResult(status, ..) => {
                format!("WebRequestResult({status})")
            }
            zellij_tile::prelude::Event::PermissionRequestResult(..) => {
                "PermissionRequestResult".to_string()
            }
            zellij_tile::prelude::Event::FileSystemCreate(..) => "FileSystemCreate".to_string(),
            zellij_tile::prelude::Event::FileSystemUpdate(..) => "FileSystemUpdate".to_string(),
            zellij_tile::prelude::Event::FileSystemDelete(..) => "FileSystemDelete".to_string(),
            _ => "Other".to_string(),
        }
    }

    /// Maps keyboard events to application events.
    ///
    /// In the review and clear-confirmation modes only `y`, `n`, and `Esc` do
    /// anything; everything else is swallowed so stray typing cannot record
    /// feedback.
    fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        tracing::debug!(bare_key = ?key.bare_key, "key event");

        if key.bare_key == BareKey::Char('k') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::ChangeKey);
        }
        if key.bare_key == BareKey::Char('r') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::Reinitialize);
        }
        if key.bare_key == BareKey::Char('x') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::ClearHistory);
        }

        match self.app.input_mode {
            InputMode::Review | InputMode::ConfirmClear => match key.bare_key {
                BareKey::Char('y') => Some(Event::Confirm),
                BareKey::Char('n') => Some(Event::Deny),
                BareKey::Esc => Some(Event::Escape),
                _ => None,
            },
            InputMode::Editing => match key.bare_key {
                BareKey::Enter => Some(Event::Submit),
                BareKey::Esc => Some(Event::Escape),
                BareKey::Backspace => Some(Event::Backspace),
                BareKey::Char(c) if !key.has_modifiers(&[KeyModifier::Ctrl]) => {
                    Some(Event::Char(c))
                }
                _ => None,
            },
        }
    }

    /// Maps permission request results to application events.
    ///
    /// The granted set drives the initial key and history load in the
    /// library layer.
    fn map_permission_result(permissions: PermissionStatus) -> Event {
        match permissions {
            PermissionStatus::Granted => {
                tracing::debug!("permissions granted");
                Event::PermissionsResult {
                    granted: vec![PermissionType::WebAccess, PermissionType::FullHdAccess],
                }
            }
            PermissionStatus::Denied => {
                tracing::warn!("permissions denied - plugin functionality limited");
                Event::PermissionsResult { granted: vec![] }
            }
        }
    }

    /// Maps custom message events to application events.
    fn map_custom_message_event(&self, message: &str, payload: &str) -> Option<Event> {
        tracing::debug!(message_name = %message, payload_len = payload.len(), "custom message event");

        if message == self.worker_name {
            match serde_json::from_str::<WorkerResponse>(payload) {
                Ok(response) => {
                    tracing::debug!(response = ?response, "worker response received");
                    Some(Event::WorkerResponse(response))
                }
                Err(e) => {
                    tracing::debug!(error = %e, "failed to deserialize worker response");
                    None
                }
            }
        } else {
            tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
            None
        }
    }

    /// Maps web request results back to tagged application events.
    ///
    /// The request tag travels through Zellij's request context map under the
    /// `request` key; results without a recognizable tag are dropped.
    fn map_web_request_result(
        status: u16,
        body: Vec<u8>,
        context: &BTreeMap<String, String>,
    ) -> Option<Event> {
        let tag = context
            .get("request")
            .and_then(|value| RequestTag::from_str(value));

        match tag {
            Some(tag) => {
                tracing::debug!(status, tag = tag.as_str(), "web request result event");
                Some(Event::WebResult { tag, status, body })
            }
            None => {
                tracing::debug!(status, "web request result without a request tag, ignoring");
                None
            }
        }
    }

    /// Maps filesystem change events to application events.
    ///
    /// Only changes to the feedback file matter; everything else under the
    /// watched tree is ignored.
    fn map_filesystem_event(paths: &[(std::path::PathBuf, Option<FileMetadata>)]) -> Option<Event> {
        let touched = paths
            .iter()
            .any(|(path, _)| zemoji::infrastructure::is_feedback_file(path));

        if touched {
            tracing::debug!("feedback file changed on disk");
            Some(Event::FeedbackFileChanged)
        } else {
            None
        }
    }

    /// Posts a message to the worker thread.
    ///
    /// Serializes the message as JSON and sends via Zellij's IPC system.
    ///
    /// # Parameters
    ///
    /// * `message` - Worker message to send
    ///
    /// # Errors
    ///
    /// Logs serialization errors but does not propagate them.
    fn post_worker_message(&self, message: &WorkerMessage) {
        match serde_json::to_string(&message) {
            Ok(payload) => {
                tracing::debug!(payload_len = payload.len(), "posting message to worker");
                post_message_to(PluginMessage {
                    worker_name: Some(self.worker_name.clone()),
                    name: self.worker_name.clone(),
                    payload,
                });
            }
            Err(e) => {
                tracing::debug!(error = %e, "failed to serialize worker message");
            }
        }
    }

    /// Executes an action returned from event handling.
    ///
    /// Translates library actions to Zellij API calls.
    ///
    /// # Actions
    ///
    /// - `CloseFocus`: Close plugin pane
    /// - `PostToWorker`: Send IPC message to worker thread
    /// - `Fetch`: Fire an HTTP request through the host
    ///
    /// # Parameters
    ///
    /// * `action` - Action to execute
    #[tracing::instrument(level = "debug", skip(self))]
    fn execute_action(&self, action: &Action) {
        match action {
            Action::CloseFocus => {
                tracing::debug!("closing plugin focus");
                hide_self();
            }
            Action::PostToWorker(ref message) => {
                tracing::debug!(message = ?message, "posting message to worker");
                self.post_worker_message(message);
            }
            Action::Fetch(ref request) => {
                tracing::debug!(url = %request.url, tag = request.tag.as_str(), "firing web request");

                let verb = match request.method {
                    HttpMethod::Get => HttpVerb::Get,
                    HttpMethod::Post => HttpVerb::Post,
                };

                let mut context = BTreeMap::new();
                context.insert("request".to_string(), request.tag.as_str().to_string());

                web_request(
                    request.url.clone(),
                    verb,
                    request.headers.clone(),
                    request.body.clone(),
                    context,
                );
            }
        }
    }
}
