//! Persistence layer for feedback history and the API key.
//!
//! # Organization
//!
//! - [`backend`]: The [`Storage`] trait the worker programs against
//! - [`json`]: File-backed implementation under the plugin data directory

pub mod backend;
pub mod json;

pub use backend::Storage;
pub use json::{JsonStorage, API_KEY_FILE, FEEDBACK_FILE};
