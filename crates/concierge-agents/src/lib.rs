//! concierge-agents
//!
//! Single-purpose handlers the assistant routes turns to:
//! - `qa`: answers grounded in retrieved passages, with citations
//! - `weather`: canned weather report
//! - `sql`: read queries against a seeded in-memory SQLite database
//! - `image_gen`: prompt templating, optional image model, placeholder rendering
pub mod image_gen;
pub mod qa;
pub mod sql;
pub mod weather;

pub use image_gen::{ImageGenerator, SAFE_NEGATIVE};
pub use qa::compose_answer;
pub use sql::SqlAgent;
pub use weather::{WeatherAgent, WeatherReport};
