//! Path utilities for the Zellij sandbox environment.
//!
//! Inside a Zellij plugin the host filesystem is mounted under `/host`.
//! These helpers locate the plugin data directory and recognize its files
//! when they show up in filesystem change events.

use crate::storage::FEEDBACK_FILE;
use std::path::{Path, PathBuf};

/// Returns the data directory for plugin storage.
///
/// Located at `/host/.local/share/zellij/zemoji` in the Zellij sandbox,
/// which typically resolves to `~/.local/share/zellij/zemoji` on the host.
/// Both storage files (`gemini-api-key` and `emoji-prediction-feedback`)
/// live inside it.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("zemoji")
}

/// Whether a filesystem event path refers to the feedback history file.
///
/// Zellij reports changed paths relative to the sandbox root, so both
/// `/host/...` and bare `/...` spellings are accepted. Used to translate
/// external writes (another pane's plugin instance) into history reloads.
#[must_use]
pub fn is_feedback_file(path: &Path) -> bool {
    if path.file_name().and_then(|n| n.to_str()) != Some(FEEDBACK_FILE) {
        return false;
    }
    path.to_str()
        .is_some_and(|p| p.contains(".local/share/zellij/zemoji"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_is_under_the_sandbox_mount() {
        assert_eq!(
            get_data_dir().to_str().unwrap(),
            "/host/.local/share/zellij/zemoji"
        );
    }

    #[test]
    fn feedback_file_is_recognized_with_and_without_host_prefix() {
        assert!(is_feedback_file(Path::new(
            "/host/.local/share/zellij/zemoji/emoji-prediction-feedback"
        )));
        assert!(is_feedback_file(Path::new(
            "/.local/share/zellij/zemoji/emoji-prediction-feedback"
        )));
    }

    #[test]
    fn other_paths_are_ignored() {
        assert!(!is_feedback_file(Path::new(
            "/host/.local/share/zellij/zemoji/gemini-api-key"
        )));
        assert!(!is_feedback_file(Path::new(
            "/host/projects/emoji-prediction-feedback"
        )));
    }
}
