//! In-process event notification between sibling views.
//!
//! A deliberately tiny publish/subscribe mechanism, not a general messaging
//! system: its only job is to decouple the predictor flow from the history
//! panel that re-renders when feedback lands.

pub mod bus;

pub use bus::{EventBus, SubscriberId, Topic};
