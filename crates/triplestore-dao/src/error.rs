use thiserror::Error;

/// Triple store access errors
#[derive(Error, Debug)]
pub enum TripleStoreError {
    /// Semaphore closed
    #[error("Semaphore closed")]
    SemaphoreClosed,

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Store could not be reached or refused to initialize the repository
    #[error("Can't connect to triplestore {url} (repository {repository}): {reason}")]
    Connectivity {
        url: String,
        repository: String,
        reason: String,
    },

    /// Failed to connect after multiple retries
    #[error("Failed to connect to triple store after {attempts} attempts")]
    ConnectionFailed { attempts: u32 },

    /// Statement could not be assembled
    #[error("Invalid query construction: {reason}")]
    QueryBuild { reason: String },

    /// Triple store backend returned an error response
    #[error("Triple store error (status {status}): {message}")]
    Backend { status: u16, message: String },

    /// Embedded store failed to parse or evaluate a statement
    #[error("Triple store evaluation failed: {reason}")]
    Evaluation { reason: String },

    /// INSERT/DELETE statement failed to execute
    #[error("Mutation failed: {reason}")]
    MutationExecution { reason: String },

    /// Failed to parse response
    #[error("Failed to parse response: {reason}")]
    ParseError { reason: String },

    /// Transaction lifecycle misuse
    #[error("Transaction error: {reason}")]
    Transaction { reason: String },

    /// Statement submitted on a closed connection
    #[error("Connection to repository {repository} is closed")]
    ConnectionClosed { repository: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl TripleStoreError {
    pub(crate) fn query_build(reason: impl Into<String>) -> Self {
        Self::QueryBuild {
            reason: reason.into(),
        }
    }

    /// True when the store itself rejected or failed to evaluate a statement.
    pub fn is_remote_evaluation(&self) -> bool {
        matches!(
            self,
            Self::Backend { .. } | Self::Evaluation { .. } | Self::ParseError { .. }
        )
    }

    /// True when the store could not be reached at all.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Connectivity { .. } | Self::ConnectionFailed { .. }
        )
    }
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, TripleStoreError>;
