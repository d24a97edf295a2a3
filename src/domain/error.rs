//! Error types for the zemoji plugin.
//!
//! This module defines the centralized error type [`ZemojiError`] and a type alias
//! [`Result`] for convenient error handling throughout the plugin. Prediction-path
//! variants carry a remediation hint shown next to the error banner; none of them
//! are fatal to the plugin.

use thiserror::Error;

/// The main error type for zemoji plugin operations.
///
/// The first group of variants is the prediction error taxonomy surfaced to the
/// user as inline banners. The remaining variants cover storage, I/O, worker
/// communication, theming, and configuration failures.
#[derive(Debug, Error)]
pub enum ZemojiError {
    /// The API key does not look like a Gemini key.
    ///
    /// Raised by local validation before any network traffic: the key must be
    /// non-empty after trimming and start with the `AI` prefix.
    #[error("Invalid API key format. Gemini API keys typically start with \"AI\"")]
    InvalidKeyFormat,

    /// Neither the preferred nor the fallback model could be initialized.
    #[error("Failed to initialize Gemini: {0}")]
    InitializationFailed(String),

    /// A prediction was requested before the model handle was ready.
    #[error("Gemini model not initialized. Please try changing your API key")]
    NotInitialized,

    /// The API reported quota or rate-limit exhaustion.
    #[error("Gemini API quota exceeded: {0}")]
    QuotaExceeded(String),

    /// The requested model identifier no longer exists upstream.
    #[error("Gemini model not found: {0}")]
    ModelNotFound(String),

    /// Any other API failure, wrapping the original message verbatim.
    #[error("Failed to predict emoji: {0}")]
    Unknown(String),

    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Communication with the background worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Theme parsing or application failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ZemojiError {
    /// Returns the user-facing remediation hint for prediction-path errors.
    ///
    /// Rendered below the error message in the banner. Ambient variants
    /// (storage, I/O, worker, theme, config) have no hint.
    #[must_use]
    pub const fn remediation(&self) -> Option<&'static str> {
        match self {
            Self::InvalidKeyFormat => Some("Get a key from Google AI Studio and try again"),
            Self::InitializationFailed(_) => {
                Some("Check the key, or retry with a different API key")
            }
            Self::NotInitialized => Some("Reinitialize the model or change your API key"),
            Self::QuotaExceeded(_) => {
                Some("Check your billing details, wait a while, or try a different API key")
            }
            Self::ModelNotFound(_) => Some("The API may have changed; check for plugin updates"),
            Self::Unknown(_) => Some("Try again, or change your API key"),
            _ => None,
        }
    }

    /// Whether the "change key" action should be offered alongside this error.
    ///
    /// Key-related failures let the user drop the stored key and return to the
    /// key-entry screen.
    #[must_use]
    pub const fn offers_key_change(&self) -> bool {
        matches!(
            self,
            Self::InvalidKeyFormat
                | Self::InitializationFailed(_)
                | Self::NotInitialized
                | Self::QuotaExceeded(_)
                | Self::ModelNotFound(_)
        )
    }
}

/// A specialized `Result` type for zemoji operations.
pub type Result<T> = std::result::Result<T, ZemojiError>;
