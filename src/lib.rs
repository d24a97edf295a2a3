//! Zemoji: a Zellij plugin that predicts emojis with Gemini and learns from
//! your feedback.
//!
//! Zemoji is a terminal multiplexer plugin that provides:
//! - Single-emoji prediction for any word, phrase, or emotion via the Gemini
//!   generative-language API
//! - A y/n review step after each prediction, recorded as feedback
//! - A scrollable history of past predictions with correctness marks
//! - Persistent feedback and API-key storage backed by JSON files
//! - Asynchronous storage I/O via Zellij worker threads

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │  ← Business logic
//! │  - Action dispatching                               │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Gemini Layer  │   │ Worker Layer  │
//! │ (ui/)         │   │ (gemini/)     │   │ (worker/)     │
//! │ - Rendering   │   │ - REST client │   │ - Storage I/O │
//! │ - Theming     │   │ - Model probe │   │ - IPC bridge  │
//! │ - Components  │   │ - Emoji parse │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure, Storage & Domain Layers            │
//! │  - Platform paths (infrastructure/)                 │
//! │  - JSON persistence (storage/)                      │
//! │  - Error types (domain/error)                       │
//! │  - Feedback model (domain/feedback)                 │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - OpenTelemetry tracing                            │
//! │  - File-based OTLP export                           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Application state machine with event/action model
//! - [`domain`]: Core domain types (Feedback, errors)
//! - [`events`]: In-process publish/subscribe bus for UI notifications
//! - [`gemini`]: Gemini REST client with model fallback and emoji extraction
//! - [`infrastructure`]: Platform-specific utilities (paths)
//! - [`storage`]: JSON file persistence for feedback and the API key
//! - [`worker`]: Background worker for storage operations
//! - [`ui`]: Terminal rendering with theme support
//! - `observability`: OpenTelemetry tracing (internal)
//!
//! # Configuration
//!
//! The plugin is configured via Zellij's plugin configuration:
//!
//! ```kdl
//! // ~/.config/zellij/layouts/default.kdl
//! pane {
//!     plugin location="file:/path/to/zemoji.wasm" {
//!         theme "catppuccin-mocha"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Plugin Load** (`main.rs`):
//!    - Parse configuration from Zellij
//!    - Initialize tracing (optional)
//!    - Create `AppState` with theme
//!    - Subscribe to Zellij events and request web access
//!    - Post `LoadApiKey` and `LoadFeedback` messages to the worker once
//!      permissions arrive
//!
//! 2. **Model Initialization**:
//!    - A stored or freshly entered key triggers an availability probe for
//!      the preferred model, falling back to a second model on failure
//!    - Once a probe succeeds the model handle is cached for the session
//!
//! 3. **Prediction Loop**:
//!    - The user submits text; the plugin fires a `generateContent` request
//!    - The reply is reduced to a single emoji and shown for y/n review
//!    - The review is appended to feedback storage via the worker, and the
//!      history panel reloads
//!
//! 4. **UI Rendering**:
//!    - Compute view model from state
//!    - Render components (header, prompt, prediction, history, footer)
//!
//! # Examples
//!
//! ## Basic Usage (Library)
//!
//! ```rust
//! use zemoji::{Config, initialize, handle_event, Event};
//!
//! let config = Config {
//!     theme_name: Some("catppuccin-mocha".to_string()),
//!     ..Default::default()
//! };
//!
//! let mut state = initialize(&config);
//!
//! // Handle events
//! let events = vec![Event::Char('h'), Event::Char('i')];
//! for event in events {
//!     let (_should_render, actions) = handle_event(&mut state, &event)?;
//!     // Execute actions...
//!     # let _ = actions;
//! }
//! # Ok::<(), zemoji::ZemojiError>(())
//! ```
//!
//! ## Worker Usage
//!
//! ```rust,no_run
//! use zemoji::worker::{WorkerMessage, ZemojiWorker};
//! use zellij_tile::prelude::*;
//!
//! // In worker thread
//! let mut worker = ZemojiWorker::default();
//! let message = WorkerMessage::load_feedback();
//! worker.on_message(
//!     "zemoji".to_string(),
//!     serde_json::to_string(&message).unwrap(),
//! );
//! ```
//!
//! # Key Design Decisions
//!
//! ## Session-Scoped Model Handle
//!
//! The Gemini model handle lives in memory only:
//! - The key persists across restarts, the initialized handle does not
//! - A prediction against an uninitialized client with a cached key
//!   re-initializes implicitly and replays the prediction
//! - Dropping the key resets the handle immediately
//!
//! ## Worker-Based Storage
//!
//! All file I/O runs in a separate Zellij worker thread:
//! - Prevents UI blocking during storage operations
//! - Uses IPC messaging for result communication
//! - The history panel renders only worker-delivered records, reloading
//!   once per feedback change
//!
//! ## Immutable View Models
//!
//! UI rendering uses computed view models:
//! - Clear separation between state and display
//! - Enables easier testing and validation
//! - Pre-computes expensive operations (history row truncation)
//!
//! # Platform Support
//!
//! - **Target**: `wasm32-wasip1` (Zellij WASM runtime)
//! - **Terminal**: Any ANSI-capable terminal emulator

pub mod app;
pub mod domain;
pub mod events;
pub mod gemini;
pub mod infrastructure;
pub mod storage;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, InputMode, Screen};
pub use domain::{Feedback, Result, ZemojiError};
pub use gemini::GeminiClient;
pub use ui::Theme;

use std::collections::BTreeMap;

/// Plugin configuration parsed from Zellij's configuration system.
///
/// Configuration values are provided via Zellij's KDL layout configuration
/// and passed to the plugin during initialization.
///
/// # Example
///
/// ```kdl
/// plugin location="file:/path/to/zemoji.wasm" {
///     theme "catppuccin-mocha"
///     theme_file "/path/to/theme.toml"
///     trace_level "debug"
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Built-in theme name to use.
    ///
    /// Options: `catppuccin-mocha`, `catppuccin-latte`. Ignored if
    /// `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file.
    ///
    /// Takes precedence over `theme_name`. See [`ui::theme`] for format.
    pub theme_file: Option<String>,

    /// Tracing level for OpenTelemetry spans.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,

    /// Override for the Gemini API endpoint.
    ///
    /// Mainly useful for pointing the plugin at a stub server. Defaults to
    /// the production endpoint.
    pub api_base_url: Option<String>,
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// Zellij provides configuration as a `BTreeMap<String, String>` during
    /// plugin initialization. This function extracts values with fallback
    /// defaults.
    ///
    /// # Parameters
    ///
    /// * `config` - Configuration map from Zellij
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use zemoji::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("theme".to_string(), "catppuccin-latte".to_string());
    /// map.insert("trace_level".to_string(), "debug".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.theme_name.as_deref(), Some("catppuccin-latte"));
    /// assert_eq!(config.trace_level.as_deref(), Some("debug"));
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        Self {
            theme_name: config.get("theme").cloned(),
            theme_file: config.get("theme_file").cloned(),
            trace_level: config.get("trace_level").cloned(),
            api_base_url: config.get("api_base_url").cloned(),
        }
    }
}

/// Initializes the plugin with configuration.
///
/// Creates a new `AppState` with:
/// - Loaded theme (from file, name, or default)
/// - An uninitialized Gemini client pointed at the configured endpoint
/// - Empty feedback history (populated later by the worker)
///
/// # Parameters
///
/// * `config` - Plugin configuration
///
/// # Returns
///
/// An initialized `AppState` ready for event processing.
///
/// # Example
///
/// ```rust
/// use zemoji::{Config, initialize};
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// let state = initialize(&config);
/// // State is ready for event processing
/// ```
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!("initializing zemoji plugin");

    let theme = config.theme_file.as_ref().map_or_else(
        || {
            config.theme_name.as_ref().map_or_else(
                Theme::default,
                |theme_name| {
                    Theme::from_name(theme_name).unwrap_or_else(|| {
                        tracing::debug!(theme_name = %theme_name, "failed to load theme, using default");
                        Theme::default()
                    })
                },
            )
        },
        |theme_file| {
            Theme::from_file(theme_file.clone()).unwrap_or_else(|e| {
                tracing::debug!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
                Theme::default()
            })
        },
    );

    let client = GeminiClient::new(config.api_base_url.clone());
    AppState::new(theme, client)
}
