//! Feedback domain model.
//!
//! This module defines [`Feedback`], one user judgement about a prediction:
//! the text that was submitted, the emoji the model returned, and whether the
//! user considered the prediction correct. Records are created once and never
//! mutated; the history is an append-only sequence of them.

use serde::{Deserialize, Serialize};

/// A single feedback record about one prediction.
///
/// Serialized with the storage-format field names (`predictedEmoji`,
/// `isCorrect`) so histories written by earlier versions of the app remain
/// readable. The timestamp is an RFC 3339 string captured at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    /// The text the user asked a prediction for.
    pub input: String,

    /// The emoji the model predicted.
    pub predicted_emoji: String,

    /// Whether the user judged the prediction correct.
    pub is_correct: bool,

    /// RFC 3339 creation timestamp, e.g. `2026-08-29T14:03:11+00:00`.
    pub timestamp: String,
}

impl Feedback {
    /// Creates a new feedback record stamped with the current UTC time.
    #[must_use]
    pub fn new(input: impl Into<String>, predicted_emoji: impl Into<String>, is_correct: bool) -> Self {
        Self {
            input: input.into(),
            predicted_emoji: predicted_emoji.into(),
            is_correct,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Formats the timestamp for display as `DD/MM/YYYY HH:MM`.
    ///
    /// Falls back to the raw stored string if it does not parse as RFC 3339,
    /// so a hand-edited history file still renders something.
    #[must_use]
    pub fn display_time(&self) -> String {
        chrono::DateTime::parse_from_rfc3339(&self.timestamp).map_or_else(
            |_| self.timestamp.clone(),
            |dt| dt.format("%d/%m/%Y %H:%M").to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_stores_exact_values() {
        let record = Feedback::new("celebration", "🎉", true);
        assert_eq!(record.input, "celebration");
        assert_eq!(record.predicted_emoji, "🎉");
        assert!(record.is_correct);
        assert!(chrono::DateTime::parse_from_rfc3339(&record.timestamp).is_ok());
    }

    #[test]
    fn serializes_with_storage_field_names() {
        let record = Feedback::new("rain", "🌧", false);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("predictedEmoji").is_some());
        assert!(json.get("isCorrect").is_some());
        assert!(json.get("input").is_some());
        assert!(json.get("timestamp").is_some());
    }

    #[test]
    fn display_time_formats_rfc3339() {
        let record = Feedback {
            input: "x".into(),
            predicted_emoji: "❓".into(),
            is_correct: false,
            timestamp: "2024-03-05T09:07:00+00:00".into(),
        };
        assert_eq!(record.display_time(), "05/03/2024 09:07");
    }

    #[test]
    fn display_time_falls_back_to_raw_string() {
        let record = Feedback {
            input: "x".into(),
            predicted_emoji: "❓".into(),
            is_correct: false,
            timestamp: "not-a-date".into(),
        };
        assert_eq!(record.display_time(), "not-a-date");
    }
}
