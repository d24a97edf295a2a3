//! Domain layer for the zemoji plugin.
//!
//! This module contains the core domain types and business rules for the
//! plugin, independent of Zellij-specific APIs or infrastructure concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result alias
//! - [`feedback`]: The feedback record domain model

pub mod error;
pub mod feedback;

pub use error::{Result, ZemojiError};
pub use feedback::Feedback;
