use thiserror::Error;
use triplestore_dao::TripleStoreError;

use crate::config::ConfigError;

/// Top-level application error that composes all subsystem errors
#[derive(Error, Debug)]
pub(crate) enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Triple store error: {0}")]
    TripleStore(#[from] TripleStoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Command reported a failure it already described
    #[error("{0}")]
    Other(String),
}
