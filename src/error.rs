//! Error types for the verification engine

use std::time::Duration;
use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, EngineError>;

/// Engine errors
///
/// Provider fetch failures and unresolved conflicts are deliberately *not*
/// represented here: the aggregator absorbs fetch failures into
/// zero-confidence records and unresolved conflicts surface as
/// `resolved = false` results. These variants cover the remaining typed
/// failure paths (bad input, bad configuration, boundary I/O).
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Invalid fact: {0}")]
    InvalidFact(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
