use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("SQL error: {0}")]
    Sql(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure of an optional external collaborator (LLM re-ranker, enricher,
/// answer model, image model). Callers log and discard these; they never abort a turn.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("collaborator timed out after {0:?}")]
    Timeout(Duration),

    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    #[error("malformed collaborator response: {0}")]
    Malformed(String),

    #[error("collaborator not configured")]
    NotConfigured,
}
