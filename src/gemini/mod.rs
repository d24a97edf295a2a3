//! Gemini API integration.
//!
//! # Organization
//!
//! - [`client`]: Model-handle state machine, request builders, and response
//!   interpretation
//! - [`emoji`]: Extraction of the predicted emoji from reply text

pub mod client;
pub mod emoji;

pub use client::{
    GeminiClient, HttpMethod, ModelState, PredictStart, ProbeOutcome, RequestTag, WebRequest,
    FALLBACK_MODEL, PREFERRED_MODEL,
};
pub use emoji::FALLBACK_EMOJI;
