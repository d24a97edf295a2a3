//! Storage backend abstraction.
//!
//! This module defines the [`Storage`] trait that abstracts over the
//! persistence backend used by the worker. The trait is minimal and mirrors
//! the actual operations the plugin needs, not a generic key-value store:
//! feedback history on one side, the API key on the other.

use crate::domain::error::Result;
use crate::domain::feedback::Feedback;

/// Abstraction over persistent plugin storage.
///
/// Implementations own two independent pieces of state: the append-only
/// feedback history and the single API key. Both survive plugin restarts.
///
/// # Implementations
///
/// - [`JsonStorage`](crate::storage::JsonStorage): plain files under the
///   plugin data directory, with atomic writes
pub trait Storage: Send {
    /// Loads the full feedback history, oldest record first.
    ///
    /// A missing or unreadable history is reported as empty rather than an
    /// error so that one bad write can never lock the user out of the plugin.
    ///
    /// # Errors
    ///
    /// Returns an error only when the underlying read fails for reasons other
    /// than absence or corruption.
    fn load_feedback(&self) -> Result<Vec<Feedback>>;

    /// Appends one record to the feedback history and persists it.
    ///
    /// Returns the new total record count.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; the prior history on disk is left
    /// intact in that case.
    fn append_feedback(&mut self, record: &Feedback) -> Result<usize>;

    /// Removes every feedback record.
    ///
    /// # Errors
    ///
    /// Returns an error if the history file cannot be replaced.
    fn clear_feedback(&mut self) -> Result<()>;

    /// Loads the stored API key, or `None` when no key has been saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the key file exists but cannot be read.
    fn load_api_key(&self) -> Result<Option<String>>;

    /// Persists the API key, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn save_api_key(&mut self, key: &str) -> Result<()>;

    /// Deletes the stored API key. Missing keys are a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing key file cannot be removed.
    fn clear_api_key(&mut self) -> Result<()>;
}
