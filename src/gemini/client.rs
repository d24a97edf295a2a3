//! Gemini prediction client.
//!
//! Wraps initialization and invocation of the Gemini generative-language REST
//! API. Plugin HTTP is callback based: the plugin fires a request through the
//! Zellij host and receives the result later as a `WebRequestResult` event.
//! The client is therefore split into two halves that the app layer wires
//! together through its action/event cycle:
//!
//! - request builders ([`GeminiClient::begin_initialize`],
//!   [`GeminiClient::start_prediction`]) that validate state and return a
//!   [`WebRequest`] to fire, and
//! - response interpreters ([`GeminiClient::handle_probe_result`],
//!   [`GeminiClient::handle_predict_result`]) that advance the model state
//!   machine or classify the failure.
//!
//! # Model handle lifecycle
//!
//! ```text
//! Uninitialized ──begin_initialize──► Initializing(preferred)
//!        ▲                                  │ probe fails
//!        │                                  ▼
//!        │ reset / both probes fail   Initializing(fallback)
//!        │                                  │ probe ok
//!        └──────────────────────────── Ready(model)
//! ```
//!
//! The handle (model id + key) is cached for the process lifetime once ready.
//! The client performs no persistence and no side effects beyond describing
//! the network calls.

use std::collections::BTreeMap;

use crate::domain::error::{Result, ZemojiError};
use crate::gemini::emoji;

/// Literal prefix every Gemini API key is expected to carry.
pub const KEY_PREFIX: &str = "AI";

/// Model tried first during initialization.
pub const PREFERRED_MODEL: &str = "gemini-1.5-flash";

/// Model tried when the preferred one is unavailable.
pub const FALLBACK_MODEL: &str = "gemini-pro";

/// Default API endpoint, overridable through plugin configuration.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Builds the fixed prediction prompt for one input.
#[must_use]
pub fn build_prompt(input: &str) -> String {
    format!(
        "You are an emoji prediction assistant. Given the following word, phrase, \
         or emotion, respond with only the single most appropriate emoji. \
         No text, just the emoji: \"{input}\""
    )
}

/// HTTP method of an outgoing request.
///
/// Mirrored into Zellij's `HttpVerb` by the plugin shim; kept separate so the
/// client stays testable without the plugin runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Distinguishes in-flight requests when their results come back.
///
/// Serialized into the request context map and parsed back by the shim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestTag {
    /// Model availability probe issued during initialization.
    InitProbe,
    /// A `generateContent` prediction call.
    Predict,
}

impl RequestTag {
    /// Context-map value for this tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InitProbe => "init-probe",
            Self::Predict => "predict",
        }
    }

    /// Parses a context-map value back into a tag.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "init-probe" => Some(Self::InitProbe),
            "predict" => Some(Self::Predict),
            _ => None,
        }
    }
}

/// A fully described outgoing HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
    pub tag: RequestTag,
}

/// State of the session-scoped model handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelState {
    /// No key submitted yet, or the handle was dropped.
    Uninitialized,
    /// A probe for `model` is in flight.
    Initializing {
        model: String,
        /// Whether the fallback model has already been tried.
        used_fallback: bool,
    },
    /// `model` answered the probe; predictions may be issued.
    Ready { model: String },
}

/// Result of interpreting a probe response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The probed model is available; the client is now ready.
    Ready { model: String },
    /// The preferred model failed; fire this fallback probe next.
    RetryFallback(WebRequest),
    /// Both attempts failed; the client is back to uninitialized.
    Failed(String),
}

/// How a prediction request starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictStart {
    /// The client is ready: fire this prediction request.
    Request(WebRequest),
    /// The client was not ready but has a cached key: fire this probe first
    /// and re-issue the prediction once initialization completes.
    Reinitialize(WebRequest),
}

/// Client over the Gemini API with an explicit model-handle state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiClient {
    state: ModelState,
    api_key: Option<String>,
    base_url: String,
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new(None)
    }
}

impl GeminiClient {
    /// Creates an uninitialized client.
    ///
    /// `base_url` overrides the production endpoint, mainly for exercising the
    /// client against a stub server.
    #[must_use]
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            state: ModelState::Uninitialized,
            api_key: None,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    /// Validates the key format without touching the network.
    ///
    /// # Errors
    ///
    /// Returns [`ZemojiError::InvalidKeyFormat`] when the key is empty after
    /// trimming or does not start with [`KEY_PREFIX`].
    pub fn validate_key(key: &str) -> Result<()> {
        let trimmed = key.trim();
        if trimmed.is_empty() || !trimmed.starts_with(KEY_PREFIX) {
            return Err(ZemojiError::InvalidKeyFormat);
        }
        Ok(())
    }

    /// Starts initialization for `key`: validates the format, caches the key,
    /// and returns the availability probe for the preferred model.
    ///
    /// # Errors
    ///
    /// Returns [`ZemojiError::InvalidKeyFormat`] on a malformed key; the
    /// cached key and state are left untouched in that case.
    pub fn begin_initialize(&mut self, key: &str) -> Result<WebRequest> {
        Self::validate_key(key)?;

        let trimmed = key.trim().to_string();
        tracing::debug!(model = PREFERRED_MODEL, "starting model initialization");

        self.api_key = Some(trimmed);
        self.state = ModelState::Initializing {
            model: PREFERRED_MODEL.to_string(),
            used_fallback: false,
        };
        Ok(self.probe_request(PREFERRED_MODEL))
    }

    /// Interprets a probe response and advances the state machine.
    ///
    /// A 2xx status makes the probed model the ready handle. A failure for
    /// the preferred model yields a fallback probe; a failure for the
    /// fallback drops back to uninitialized with a combined message.
    pub fn handle_probe_result(&mut self, status: u16, body: &[u8]) -> ProbeOutcome {
        let ModelState::Initializing { model, used_fallback } = self.state.clone() else {
            tracing::debug!(status, "probe result with no probe in flight, ignoring");
            return ProbeOutcome::Failed("no model initialization in progress".to_string());
        };

        if (200..300).contains(&status) {
            tracing::debug!(model = %model, "model probe succeeded");
            self.state = ModelState::Ready { model: model.clone() };
            return ProbeOutcome::Ready { model };
        }

        let message = Self::error_message_from_body(body, status);
        if used_fallback {
            tracing::debug!(model = %model, status, "fallback model probe failed");
            self.state = ModelState::Uninitialized;
            ProbeOutcome::Failed(message)
        } else {
            tracing::debug!(
                model = %model,
                status,
                fallback = FALLBACK_MODEL,
                "preferred model probe failed, trying fallback"
            );
            self.state = ModelState::Initializing {
                model: FALLBACK_MODEL.to_string(),
                used_fallback: true,
            };
            ProbeOutcome::RetryFallback(self.probe_request(FALLBACK_MODEL))
        }
    }

    /// Starts a prediction for `input`.
    ///
    /// Requires the ready state. When not ready but a key is cached, one
    /// implicit re-initialization is attempted: the returned
    /// [`PredictStart::Reinitialize`] probe must be fired and the input
    /// re-submitted once the client reports ready.
    ///
    /// # Errors
    ///
    /// Returns [`ZemojiError::NotInitialized`] when the client is not ready
    /// and no key is available to re-initialize with.
    pub fn start_prediction(&mut self, input: &str) -> Result<PredictStart> {
        match &self.state {
            ModelState::Ready { model } => {
                let model = model.clone();
                Ok(PredictStart::Request(self.predict_request(&model, input)))
            }
            _ => {
                let Some(key) = self.api_key.clone() else {
                    return Err(ZemojiError::NotInitialized);
                };
                tracing::debug!("model not ready, attempting implicit re-initialization");
                let probe = self.begin_initialize(&key)?;
                Ok(PredictStart::Reinitialize(probe))
            }
        }
    }

    /// Interprets a prediction response.
    ///
    /// On success the first emoji is extracted from the reply text; a reply
    /// with no emoji yields the literal `❓` rather than an error.
    ///
    /// # Errors
    ///
    /// Non-2xx responses and unreadable bodies are classified via
    /// [`classify_api_error`] into the prediction error taxonomy.
    pub fn handle_predict_result(&self, status: u16, body: &[u8]) -> Result<String> {
        if !(200..300).contains(&status) {
            let message = Self::error_message_from_body(body, status);
            tracing::debug!(status, message = %message, "prediction request failed");
            return Err(classify_api_error(&message));
        }

        let reply: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| ZemojiError::Unknown(format!("unreadable API response: {e}")))?;

        let text = reply
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| {
                ZemojiError::Unknown("API response carried no candidate text".to_string())
            })?;

        let prediction = emoji::extract_prediction(text);
        tracing::debug!(prediction = %prediction, "prediction extracted");
        Ok(prediction)
    }

    /// Drops the cached handle and key, returning to uninitialized.
    ///
    /// Used by the "change key" action.
    pub fn reset(&mut self) {
        self.state = ModelState::Uninitialized;
        self.api_key = None;
    }

    /// Whether a prediction can be issued right now.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, ModelState::Ready { .. })
    }

    /// Whether a key has been cached (ready or not).
    #[must_use]
    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Current state of the model handle.
    #[must_use]
    pub const fn state(&self) -> &ModelState {
        &self.state
    }

    fn probe_request(&self, model: &str) -> WebRequest {
        let key = self.api_key.as_deref().unwrap_or_default();
        WebRequest {
            url: format!("{}/v1beta/models/{model}?key={key}", self.base_url),
            method: HttpMethod::Get,
            headers: BTreeMap::new(),
            body: Vec::new(),
            tag: RequestTag::InitProbe,
        }
    }

    fn predict_request(&self, model: &str, input: &str) -> WebRequest {
        let key = self.api_key.as_deref().unwrap_or_default();
        let payload = serde_json::json!({
            "contents": [{ "parts": [{ "text": build_prompt(input) }] }]
        });

        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        WebRequest {
            url: format!(
                "{}/v1beta/models/{model}:generateContent?key={key}",
                self.base_url
            ),
            method: HttpMethod::Post,
            headers,
            body: payload.to_string().into_bytes(),
            tag: RequestTag::Predict,
        }
    }

    /// Pulls a human-readable message out of an API error body.
    ///
    /// The API wraps failures as `{"error": {"message": ...}}`; anything else
    /// falls back to the raw body or the bare status code.
    fn error_message_from_body(body: &[u8], status: u16) -> String {
        if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
            if let Some(message) = value.pointer("/error/message").and_then(serde_json::Value::as_str) {
                return message.to_string();
            }
        }
        let raw = String::from_utf8_lossy(body);
        if raw.trim().is_empty() {
            format!("HTTP {status}")
        } else {
            format!("HTTP {status}: {}", raw.trim())
        }
    }
}

/// Classifies an API error message into the prediction error taxonomy.
///
/// Substring matching over upstream wording is inherently fragile against
/// message changes; the categories mirror what the API is observed to send
/// today, with [`ZemojiError::Unknown`] as the catch-all.
#[must_use]
pub fn classify_api_error(message: &str) -> ZemojiError {
    let lowered = message.to_lowercase();

    if lowered.contains("quota") || lowered.contains("rate limit") {
        ZemojiError::QuotaExceeded(message.to_string())
    } else if lowered.contains("not found") || lowered.contains("404") {
        ZemojiError::ModelNotFound(message.to_string())
    } else if lowered.contains("not initialized") {
        ZemojiError::NotInitialized
    } else {
        ZemojiError::Unknown(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe_failure_body() -> Vec<u8> {
        br#"{"error": {"message": "model not available"}}"#.to_vec()
    }

    #[test]
    fn key_validation_requires_the_prefix() {
        assert!(GeminiClient::validate_key("AIzaFAKEKEY").is_ok());
        assert!(GeminiClient::validate_key("  AIza-padded  ").is_ok());
        assert!(matches!(
            GeminiClient::validate_key("wrongformat"),
            Err(ZemojiError::InvalidKeyFormat)
        ));
        assert!(matches!(
            GeminiClient::validate_key(""),
            Err(ZemojiError::InvalidKeyFormat)
        ));
        assert!(matches!(
            GeminiClient::validate_key("   "),
            Err(ZemojiError::InvalidKeyFormat)
        ));
    }

    #[test]
    fn begin_initialize_probes_the_preferred_model() {
        let mut client = GeminiClient::default();
        let probe = client.begin_initialize("AIzaFAKEKEY").unwrap();

        assert_eq!(probe.tag, RequestTag::InitProbe);
        assert_eq!(probe.method, HttpMethod::Get);
        assert!(probe.url.contains(PREFERRED_MODEL));
        assert!(probe.url.contains("key=AIzaFAKEKEY"));
        assert!(matches!(
            client.state(),
            ModelState::Initializing { used_fallback: false, .. }
        ));
    }

    #[test]
    fn begin_initialize_rejects_bad_keys_without_state_change() {
        let mut client = GeminiClient::default();
        assert!(matches!(
            client.begin_initialize("wrongformat"),
            Err(ZemojiError::InvalidKeyFormat)
        ));
        assert!(!client.has_key());
        assert_eq!(*client.state(), ModelState::Uninitialized);
    }

    #[test]
    fn successful_probe_makes_the_client_ready() {
        let mut client = GeminiClient::default();
        client.begin_initialize("AIzaFAKEKEY").unwrap();

        let outcome = client.handle_probe_result(200, b"{}");
        assert_eq!(
            outcome,
            ProbeOutcome::Ready { model: PREFERRED_MODEL.to_string() }
        );
        assert!(client.is_ready());
    }

    #[test]
    fn failed_probe_falls_back_then_fails() {
        let mut client = GeminiClient::default();
        client.begin_initialize("AIzaFAKEKEY").unwrap();

        let outcome = client.handle_probe_result(404, &probe_failure_body());
        let ProbeOutcome::RetryFallback(fallback) = outcome else {
            panic!("expected fallback probe");
        };
        assert!(fallback.url.contains(FALLBACK_MODEL));

        let outcome = client.handle_probe_result(404, &probe_failure_body());
        assert!(matches!(outcome, ProbeOutcome::Failed(_)));
        assert!(!client.is_ready());
        assert_eq!(*client.state(), ModelState::Uninitialized);
    }

    #[test]
    fn fallback_probe_success_uses_the_fallback_model() {
        let mut client = GeminiClient::default();
        client.begin_initialize("AIzaFAKEKEY").unwrap();
        client.handle_probe_result(500, &probe_failure_body());

        let outcome = client.handle_probe_result(200, b"{}");
        assert_eq!(
            outcome,
            ProbeOutcome::Ready { model: FALLBACK_MODEL.to_string() }
        );
    }

    #[test]
    fn prediction_requires_ready_or_cached_key() {
        let mut client = GeminiClient::default();
        assert!(matches!(
            client.start_prediction("celebration"),
            Err(ZemojiError::NotInitialized)
        ));

        client.begin_initialize("AIzaFAKEKEY").unwrap();
        client.handle_probe_result(200, b"{}");

        let PredictStart::Request(request) = client.start_prediction("celebration").unwrap()
        else {
            panic!("expected a prediction request");
        };
        assert_eq!(request.tag, RequestTag::Predict);
        assert_eq!(request.method, HttpMethod::Post);
        assert!(request.url.contains(":generateContent"));

        let body = String::from_utf8(request.body).unwrap();
        assert!(body.contains("emoji prediction assistant"));
        assert!(body.contains("\\\"celebration\\\""));
    }

    #[test]
    fn stale_handle_triggers_implicit_reinitialization() {
        let mut client = GeminiClient::default();
        client.begin_initialize("AIzaFAKEKEY").unwrap();
        // Probe never resolved: the handle is not ready, but the key is cached.

        let start = client.start_prediction("rain").unwrap();
        assert!(matches!(start, PredictStart::Reinitialize(_)));
        assert!(matches!(
            client.state(),
            ModelState::Initializing { used_fallback: false, .. }
        ));
    }

    #[test]
    fn predict_result_extracts_first_emoji() {
        let client = GeminiClient::default();
        let body = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "🎉 nice!" }] } }]
        });
        let prediction = client
            .handle_predict_result(200, body.to_string().as_bytes())
            .unwrap();
        assert_eq!(prediction, "🎉");
    }

    #[test]
    fn predict_result_without_emoji_yields_fallback() {
        let client = GeminiClient::default();
        let body = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "no emoji here" }] } }]
        });
        let prediction = client
            .handle_predict_result(200, body.to_string().as_bytes())
            .unwrap();
        assert_eq!(prediction, emoji::FALLBACK_EMOJI);
    }

    #[test]
    fn predict_errors_are_classified() {
        let client = GeminiClient::default();

        let quota = br#"{"error": {"message": "quota exceeded for this project"}}"#;
        assert!(matches!(
            client.handle_predict_result(429, quota),
            Err(ZemojiError::QuotaExceeded(_))
        ));

        let missing = br#"{"error": {"message": "requested entity was not found"}}"#;
        assert!(matches!(
            client.handle_predict_result(404, missing),
            Err(ZemojiError::ModelNotFound(_))
        ));

        let other = br#"{"error": {"message": "internal failure"}}"#;
        assert!(matches!(
            client.handle_predict_result(500, other),
            Err(ZemojiError::Unknown(_))
        ));
    }

    #[test]
    fn classify_matches_rate_limit_and_initialization_wording() {
        assert!(matches!(
            classify_api_error("Rate limit hit, slow down"),
            ZemojiError::QuotaExceeded(_)
        ));
        assert!(matches!(
            classify_api_error("client not initialized"),
            ZemojiError::NotInitialized
        ));
        assert!(matches!(
            classify_api_error("HTTP 404"),
            ZemojiError::ModelNotFound(_)
        ));
    }

    #[test]
    fn reset_drops_handle_and_key() {
        let mut client = GeminiClient::default();
        client.begin_initialize("AIzaFAKEKEY").unwrap();
        client.handle_probe_result(200, b"{}");
        assert!(client.is_ready());

        client.reset();
        assert!(!client.is_ready());
        assert!(!client.has_key());
    }

    #[test]
    fn request_tag_round_trips_through_context_strings() {
        for tag in [RequestTag::InitProbe, RequestTag::Predict] {
            assert_eq!(RequestTag::from_str(tag.as_str()), Some(tag));
        }
        assert_eq!(RequestTag::from_str("other"), None);
    }
}
