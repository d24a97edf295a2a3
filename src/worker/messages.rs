//! Worker thread message types for cross-thread communication.
//!
//! Defines the request and response protocol between the main plugin thread
//! and the background worker that owns storage. Also propagates tracing
//! context across the thread boundary so spans stay linked.

use crate::domain::Feedback;
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-thread span propagation.
///
/// Captures the current trace and span IDs from OpenTelemetry to maintain
/// trace continuity when passing messages to the worker thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across threads.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Returns `None` if the current span context is invalid or not sampled.
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::Span::current();

        let otel_context = span.context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if span_context.is_valid() {
            let trace_id_str = format!("{:032x}", span_context.trace_id());
            let parent_span_id_str = format!("{:016x}", span_context.span_id());

            tracing::debug!(
                trace_id = %trace_id_str,
                parent_span_id = %parent_span_id_str,
                "capturing trace context"
            );

            Some(Self {
                trace_id: trace_id_str,
                parent_span_id: parent_span_id_str,
            })
        } else {
            tracing::debug!("span context is not valid");
            None
        }
    }
}

/// Macro to generate builder methods for `WorkerMessage` variants.
///
/// Generates convenience constructors that automatically attach the current
/// trace context to each message variant.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    load_api_key(LoadApiKey {}),
    save_api_key(SaveApiKey { key: String }),
    clear_api_key(ClearApiKey {}),
    load_feedback(LoadFeedback {}),
    append_feedback(AppendFeedback { record: Feedback }),
    clear_feedback(ClearFeedback {}),
}

/// Messages sent from the main thread to the worker thread.
///
/// Each variant corresponds to a storage operation that should be performed
/// off the render thread. All variants carry an optional trace context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Load the stored API key, if any.
    LoadApiKey {
        /// Trace context for linking spans across threads.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Persist a new API key, replacing any previous one.
    SaveApiKey {
        /// The key to store, already format-validated.
        key: String,

        /// Trace context for linking spans across threads.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Delete the stored API key.
    ClearApiKey {
        /// Trace context for linking spans across threads.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Load the full feedback history.
    LoadFeedback {
        /// Trace context for linking spans across threads.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Append one feedback record to the history.
    AppendFeedback {
        /// The record to append.
        record: Feedback,

        /// Trace context for linking spans across threads.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Remove every feedback record.
    ClearFeedback {
        /// Trace context for linking spans across threads.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

/// Responses sent from the worker thread back to the main thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// The stored API key was loaded (or found absent).
    ApiKeyLoaded {
        /// The key, or `None` when nothing is stored.
        key: Option<String>,
    },

    /// The API key was persisted.
    ApiKeySaved,

    /// The API key was deleted.
    ApiKeyCleared,

    /// The feedback history was loaded, oldest record first.
    FeedbackLoaded {
        /// All stored records.
        records: Vec<Feedback>,
    },

    /// A feedback record was appended.
    FeedbackAppended {
        /// Total record count after the append.
        count: usize,
    },

    /// The feedback history was cleared.
    FeedbackCleared,

    /// An error occurred during the worker operation.
    Error {
        /// Human-readable error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_round_trip_through_json() {
        let record = Feedback::new("rain".to_string(), "🌧".to_string(), true);
        let message = WorkerMessage::AppendFeedback {
            record,
            trace_context: None,
        };

        let encoded = serde_json::to_string(&message).unwrap();
        let decoded: WorkerMessage = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn absent_trace_context_is_omitted_from_the_wire() {
        let message = WorkerMessage::LoadFeedback { trace_context: None };
        let encoded = serde_json::to_string(&message).unwrap();
        assert!(!encoded.contains("trace_context"));
    }

    #[test]
    fn responses_round_trip_through_json() {
        let response = WorkerResponse::FeedbackAppended { count: 3 };
        let encoded = serde_json::to_string(&response).unwrap();
        let decoded: WorkerResponse = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, response);
    }
}
