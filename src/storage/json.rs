//! JSON file-based storage backend.
//!
//! Persists the feedback history as a human-readable JSON array and the API
//! key as a plain text file, both under the plugin data directory. Writes go
//! through a temp file plus rename so a crash mid-write never leaves either
//! file half-written.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(n) - the whole history is parsed on every load
//! - **Write**: O(n) - the whole history is rewritten on every append
//! - **Best for**: hundreds of feedback records, interactive write rates

use crate::domain::error::{Result, ZemojiError};
use crate::domain::feedback::Feedback;
use crate::storage::backend::Storage;
use std::path::{Path, PathBuf};

/// File name of the feedback history inside the data directory.
pub const FEEDBACK_FILE: &str = "emoji-prediction-feedback";

/// File name of the stored API key inside the data directory.
pub const API_KEY_FILE: &str = "gemini-api-key";

/// File storage backend rooted at the plugin data directory.
///
/// # File Format
///
/// The history file holds a JSON array of feedback records:
///
/// ```json
/// [
///   {
///     "input": "celebration",
///     "predictedEmoji": "🎉",
///     "isCorrect": true,
///     "timestamp": "2026-08-29T10:15:00+00:00"
///   }
/// ]
/// ```
///
/// The key file holds the raw key with no framing.
pub struct JsonStorage {
    feedback_path: PathBuf,
    api_key_path: PathBuf,
}

impl JsonStorage {
    /// Opens the backend over `data_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(data_dir: &Path) -> Result<Self> {
        tracing::debug!(dir = ?data_dir, "initializing file storage");
        std::fs::create_dir_all(data_dir)?;

        Ok(Self {
            feedback_path: data_dir.join(FEEDBACK_FILE),
            api_key_path: data_dir.join(API_KEY_FILE),
        })
    }

    /// Writes `contents` to `path` atomically via a sibling temp file.
    fn write_atomic(path: &Path, contents: &str) -> Result<()> {
        let tmp_path = path.with_extension("tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, contents)?;

        tracing::trace!("renaming temporary file to final location");
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }

    fn save_feedback(&self, records: &[Feedback]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| ZemojiError::Storage(format!("failed to serialize feedback: {e}")))?;
        Self::write_atomic(&self.feedback_path, &json)
    }
}

impl Storage for JsonStorage {
    fn load_feedback(&self) -> Result<Vec<Feedback>> {
        let _span = tracing::debug_span!("load_feedback").entered();

        if !self.feedback_path.exists() {
            tracing::debug!("no feedback file, reporting empty history");
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&self.feedback_path)?;
        match serde_json::from_str::<Vec<Feedback>>(&contents) {
            Ok(records) => {
                tracing::debug!(count = records.len(), "feedback history loaded");
                Ok(records)
            }
            Err(e) => {
                // A corrupt history must not brick the plugin.
                tracing::warn!(error = %e, "feedback file is corrupt, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    fn append_feedback(&mut self, record: &Feedback) -> Result<usize> {
        let _span = tracing::debug_span!("append_feedback",
            input = %record.input,
            is_correct = record.is_correct
        )
        .entered();

        let mut records = self.load_feedback()?;
        records.push(record.clone());
        self.save_feedback(&records)?;

        tracing::debug!(count = records.len(), "feedback appended");
        Ok(records.len())
    }

    fn clear_feedback(&mut self) -> Result<()> {
        let _span = tracing::debug_span!("clear_feedback").entered();
        self.save_feedback(&[])?;
        tracing::debug!("feedback history cleared");
        Ok(())
    }

    fn load_api_key(&self) -> Result<Option<String>> {
        let _span = tracing::debug_span!("load_api_key").entered();

        if !self.api_key_path.exists() {
            tracing::debug!("no stored API key");
            return Ok(None);
        }

        let key = std::fs::read_to_string(&self.api_key_path)?;
        let key = key.trim().to_string();
        if key.is_empty() {
            tracing::debug!("stored API key is empty, ignoring");
            return Ok(None);
        }

        tracing::debug!("API key loaded");
        Ok(Some(key))
    }

    fn save_api_key(&mut self, key: &str) -> Result<()> {
        let _span = tracing::debug_span!("save_api_key").entered();
        Self::write_atomic(&self.api_key_path, key.trim())?;
        tracing::debug!("API key saved");
        Ok(())
    }

    fn clear_api_key(&mut self) -> Result<()> {
        let _span = tracing::debug_span!("clear_api_key").entered();

        if self.api_key_path.exists() {
            std::fs::remove_file(&self.api_key_path)?;
            tracing::debug!("API key removed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(input: &str, emoji: &str, correct: bool) -> Feedback {
        Feedback::new(input.to_string(), emoji.to_string(), correct)
    }

    #[test]
    fn missing_history_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).unwrap();
        assert!(storage.load_feedback().unwrap().is_empty());
    }

    #[test]
    fn append_preserves_order_and_returns_count() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).unwrap();

        assert_eq!(storage.append_feedback(&record("rain", "🌧", true)).unwrap(), 1);
        assert_eq!(storage.append_feedback(&record("party", "🎉", false)).unwrap(), 2);

        let records = storage.load_feedback().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].input, "rain");
        assert_eq!(records[1].input, "party");
        assert!(!records[1].is_correct);
    }

    #[test]
    fn history_survives_reopening() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut storage = JsonStorage::new(dir.path()).unwrap();
            storage.append_feedback(&record("sun", "☀", true)).unwrap();
        }

        let storage = JsonStorage::new(dir.path()).unwrap();
        let records = storage.load_feedback().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].predicted_emoji, "☀");
    }

    #[test]
    fn corrupt_history_is_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(FEEDBACK_FILE), "not json at all").unwrap();

        let storage = JsonStorage::new(dir.path()).unwrap();
        assert!(storage.load_feedback().unwrap().is_empty());
    }

    #[test]
    fn append_after_corruption_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(FEEDBACK_FILE), "{broken").unwrap();

        let mut storage = JsonStorage::new(dir.path()).unwrap();
        assert_eq!(storage.append_feedback(&record("sun", "☀", true)).unwrap(), 1);
        assert_eq!(storage.load_feedback().unwrap().len(), 1);
    }

    #[test]
    fn history_file_uses_camel_case_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).unwrap();
        storage.append_feedback(&record("rain", "🌧", true)).unwrap();

        let raw = std::fs::read_to_string(dir.path().join(FEEDBACK_FILE)).unwrap();
        assert!(raw.contains("\"predictedEmoji\""));
        assert!(raw.contains("\"isCorrect\""));
        assert!(!raw.contains("predicted_emoji"));
    }

    #[test]
    fn clear_feedback_leaves_an_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).unwrap();
        storage.append_feedback(&record("rain", "🌧", true)).unwrap();

        storage.clear_feedback().unwrap();
        assert!(storage.load_feedback().unwrap().is_empty());
        assert!(dir.path().join(FEEDBACK_FILE).exists());
    }

    #[test]
    fn api_key_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).unwrap();

        assert_eq!(storage.load_api_key().unwrap(), None);

        storage.save_api_key("  AIzaFAKEKEY\n").unwrap();
        assert_eq!(storage.load_api_key().unwrap().as_deref(), Some("AIzaFAKEKEY"));

        storage.clear_api_key().unwrap();
        assert_eq!(storage.load_api_key().unwrap(), None);

        // Clearing twice is fine.
        storage.clear_api_key().unwrap();
    }

    #[test]
    fn feedback_and_key_files_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).unwrap();

        storage.save_api_key("AIzaFAKEKEY").unwrap();
        storage.append_feedback(&record("rain", "🌧", true)).unwrap();
        storage.clear_feedback().unwrap();

        assert_eq!(storage.load_api_key().unwrap().as_deref(), Some("AIzaFAKEKEY"));
    }
}
