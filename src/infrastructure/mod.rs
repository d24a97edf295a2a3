//! Infrastructure layer for filesystem and environment interactions.
//!
//! Utilities for working with the Zellij plugin sandbox, where the host
//! filesystem is mounted under `/host`.

pub mod paths;

pub use paths::{get_data_dir, is_feedback_file};
