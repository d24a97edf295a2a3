//! Actions representing side effects to be executed by the plugin runtime.
//!
//! This module defines the [`Action`] type, which represents imperative
//! commands produced by the event handler after processing user input or
//! system events. Actions bridge pure state transformations and effectful
//! operations like firing HTTP requests or communicating with the worker.
//!
//! # Architecture
//!
//! The event handler returns a `Vec<Action>` after processing each event,
//! allowing multiple side effects to be queued atomically. The plugin runtime
//! executes these actions in sequence.

use crate::gemini::WebRequest;
use crate::worker::WorkerMessage;

/// Commands representing side effects to be executed by the plugin runtime.
///
/// Actions are produced by the event handler and executed by the action
/// processor in main.rs. They are the boundary between pure state transitions
/// and the Zellij shim functions that actually do things.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Closes the focused floating pane, hiding the plugin UI.
    CloseFocus,

    /// Posts a message to the background worker thread.
    ///
    /// Covers every storage operation: key load/save/clear and feedback
    /// load/append/clear.
    PostToWorker(WorkerMessage),

    /// Fires an HTTP request through the Zellij host.
    ///
    /// The result comes back later as a web-request event tagged with the
    /// request's [`RequestTag`](crate::gemini::RequestTag).
    Fetch(WebRequest),
}
