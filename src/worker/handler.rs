//! Worker thread implementation for asynchronous storage operations.
//!
//! Implements the Zellij worker interface. Every file touch (feedback history
//! and API key) happens here so the main thread never blocks on I/O during a
//! render. Includes distributed tracing support across the thread boundary.

use crate::domain::error::{Result, ZemojiError};
use crate::infrastructure::paths;
use crate::storage::backend::Storage;
use crate::storage::JsonStorage;
use crate::worker::{WorkerMessage, WorkerResponse};
use serde::{Deserialize, Serialize};
use zellij_tile::prelude::{PluginMessage, ZellijWorker};
use zellij_tile::shim::post_message_to_plugin;

/// Worker thread state owning the storage backend.
///
/// Runs on a separate thread spawned by Zellij and processes messages sent
/// from the main plugin thread. The backend is initialized lazily on first
/// message receipt.
#[derive(Serialize, Deserialize, Default)]
pub struct ZemojiWorker {
    /// Storage backend, initialized lazily on first use.
    #[serde(skip)]
    storage: Option<Box<dyn Storage>>,
}

impl ZemojiWorker {
    /// Creates a worker with an open storage backend under the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be initialized.
    pub fn new() -> Result<Self> {
        let storage: Box<dyn Storage> = Box::new(JsonStorage::new(&paths::get_data_dir())?);
        Ok(Self { storage: Some(storage) })
    }

    fn get_storage(&mut self) -> Result<&mut Box<dyn Storage>> {
        self.storage
            .as_mut()
            .ok_or_else(|| ZemojiError::Worker("storage not initialized".to_string()))
    }

    /// Helper for handling storage operation results with consistent logging.
    fn handle_storage_result<T, F>(operation: &str, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, "storage operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::debug!(operation = operation, error = %e, "storage operation failed");
                WorkerResponse::Error {
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    fn handle_load_api_key(&mut self) -> WorkerResponse {
        Self::handle_storage_result(
            "load api key",
            self.get_storage().and_then(|storage| storage.load_api_key()),
            |key| WorkerResponse::ApiKeyLoaded { key },
        )
    }

    fn handle_save_api_key(&mut self, key: &str) -> WorkerResponse {
        Self::handle_storage_result(
            "save api key",
            self.get_storage().and_then(|storage| storage.save_api_key(key)),
            |()| WorkerResponse::ApiKeySaved,
        )
    }

    fn handle_clear_api_key(&mut self) -> WorkerResponse {
        Self::handle_storage_result(
            "clear api key",
            self.get_storage().and_then(|storage| storage.clear_api_key()),
            |()| WorkerResponse::ApiKeyCleared,
        )
    }

    fn handle_load_feedback(&mut self) -> WorkerResponse {
        Self::handle_storage_result(
            "load feedback",
            self.get_storage().and_then(|storage| storage.load_feedback()),
            |records| {
                tracing::debug!(count = records.len(), "feedback history loaded");
                WorkerResponse::FeedbackLoaded { records }
            },
        )
    }

    fn handle_append_feedback(&mut self, record: &crate::domain::Feedback) -> WorkerResponse {
        Self::handle_storage_result(
            "append feedback",
            self.get_storage().and_then(|storage| storage.append_feedback(record)),
            |count| {
                tracing::debug!(count, "feedback appended");
                WorkerResponse::FeedbackAppended { count }
            },
        )
    }

    fn handle_clear_feedback(&mut self) -> WorkerResponse {
        Self::handle_storage_result(
            "clear feedback",
            self.get_storage().and_then(|storage| storage.clear_feedback()),
            |()| WorkerResponse::FeedbackCleared,
        )
    }

    /// Attaches the parent trace context from a message to the current thread.
    ///
    /// Reconstructs the OpenTelemetry context from the serialized trace
    /// information so spans created here link to their parents on the main
    /// thread. Returns a guard that must be held for the operation.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = match message {
            WorkerMessage::LoadApiKey { trace_context, .. }
            | WorkerMessage::SaveApiKey { trace_context, .. }
            | WorkerMessage::ClearApiKey { trace_context, .. }
            | WorkerMessage::LoadFeedback { trace_context, .. }
            | WorkerMessage::AppendFeedback { trace_context, .. }
            | WorkerMessage::ClearFeedback { trace_context, .. } => trace_context,
        }
        .as_ref()?;

        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);

        Some(otel_context.attach())
    }

    /// Processes a worker message and returns the appropriate response.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);

        let span = tracing::debug_span!("worker_handle_message", message_type = ?message);
        let _guard = span.entered();

        match message {
            WorkerMessage::LoadApiKey { .. } => self.handle_load_api_key(),
            WorkerMessage::SaveApiKey { key, .. } => self.handle_save_api_key(&key),
            WorkerMessage::ClearApiKey { .. } => self.handle_clear_api_key(),
            WorkerMessage::LoadFeedback { .. } => self.handle_load_feedback(),
            WorkerMessage::AppendFeedback { record, .. } => self.handle_append_feedback(&record),
            WorkerMessage::ClearFeedback { .. } => self.handle_clear_feedback(),
        }
    }
}

/// Initializes tracing for the worker thread.
///
/// Uses the same configuration as the main thread so both write to the same
/// trace file.
fn init_worker_tracing() {
    use crate::observability;
    use crate::Config;

    let config = Config::default();
    observability::init_tracing(&config);
}

/// Tracks whether worker tracing has been initialized.
static WORKER_TRACING_INITIALIZED: std::sync::atomic::AtomicBool =
    std::sync::atomic::AtomicBool::new(false);

impl ZellijWorker<'_> for ZemojiWorker {
    /// Handles incoming messages from the main plugin thread.
    ///
    /// 1. Initializes tracing on first message (once per worker lifetime)
    /// 2. Lazy-initializes the storage backend if needed
    /// 3. Deserializes the message payload
    /// 4. Processes the message via `handle_message`
    /// 5. Serializes and sends the response back to the main thread
    fn on_message(&mut self, message: String, payload: String) {
        if !WORKER_TRACING_INITIALIZED.load(std::sync::atomic::Ordering::Relaxed) {
            init_worker_tracing();
            WORKER_TRACING_INITIALIZED.store(true, std::sync::atomic::Ordering::Relaxed);
        }

        if self.storage.is_none() {
            match Self::new() {
                Ok(worker) => {
                    self.storage = worker.storage;
                }
                Err(e) => {
                    tracing::debug!(error = %e, "failed to initialize storage");
                    let error_response = WorkerResponse::Error {
                        message: format!("Failed to initialize storage: {e}"),
                    };
                    if let Ok(payload) = serde_json::to_string(&error_response) {
                        post_message_to_plugin(PluginMessage {
                            name: message,
                            payload,
                            worker_name: None,
                        });
                    }
                    return;
                }
            }
        }

        let worker_message: WorkerMessage = match serde_json::from_str(&payload) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(error = %e, "failed to deserialize worker message");
                return;
            }
        };

        let response = self.handle_message(worker_message);

        match serde_json::to_string(&response) {
            Ok(payload) => {
                let plugin_message = PluginMessage {
                    name: message,
                    payload,
                    worker_name: None,
                };
                post_message_to_plugin(plugin_message);
            }
            Err(e) => {
                tracing::debug!(error = %e, "failed to serialize worker response");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Feedback;

    fn worker_over(dir: &std::path::Path) -> ZemojiWorker {
        let storage: Box<dyn Storage> = Box::new(JsonStorage::new(dir).unwrap());
        ZemojiWorker { storage: Some(storage) }
    }

    #[test]
    fn append_then_load_round_trips_through_messages() {
        let dir = tempfile::tempdir().unwrap();
        let mut worker = worker_over(dir.path());

        let record = Feedback::new("rain".to_string(), "🌧".to_string(), true);
        let response = worker.handle_message(WorkerMessage::append_feedback(record.clone()));
        assert_eq!(response, WorkerResponse::FeedbackAppended { count: 1 });

        let response = worker.handle_message(WorkerMessage::load_feedback());
        assert_eq!(response, WorkerResponse::FeedbackLoaded { records: vec![record] });
    }

    #[test]
    fn clear_feedback_empties_the_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut worker = worker_over(dir.path());

        let record = Feedback::new("party".to_string(), "🎉".to_string(), false);
        worker.handle_message(WorkerMessage::append_feedback(record));
        assert_eq!(
            worker.handle_message(WorkerMessage::clear_feedback()),
            WorkerResponse::FeedbackCleared
        );
        assert_eq!(
            worker.handle_message(WorkerMessage::load_feedback()),
            WorkerResponse::FeedbackLoaded { records: Vec::new() }
        );
    }

    #[test]
    fn api_key_messages_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut worker = worker_over(dir.path());

        assert_eq!(
            worker.handle_message(WorkerMessage::load_api_key()),
            WorkerResponse::ApiKeyLoaded { key: None }
        );
        assert_eq!(
            worker.handle_message(WorkerMessage::save_api_key("AIzaFAKEKEY".to_string())),
            WorkerResponse::ApiKeySaved
        );
        assert_eq!(
            worker.handle_message(WorkerMessage::load_api_key()),
            WorkerResponse::ApiKeyLoaded { key: Some("AIzaFAKEKEY".to_string()) }
        );
        assert_eq!(
            worker.handle_message(WorkerMessage::clear_api_key()),
            WorkerResponse::ApiKeyCleared
        );
    }

    #[test]
    fn uninitialized_storage_reports_an_error() {
        let mut worker = ZemojiWorker::default();
        let response = worker.handle_message(WorkerMessage::load_feedback());
        assert!(matches!(response, WorkerResponse::Error { .. }));
    }
}
