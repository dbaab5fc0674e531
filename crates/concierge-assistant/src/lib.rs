//! concierge-assistant
//!
//! Routes each user turn to a handler (documents, images, weather, SQL,
//! recommendations) and keeps a short conversation memory.
pub mod controller;
pub mod intent;

pub use controller::Controller;
pub use intent::{detect_intent, Intent};
