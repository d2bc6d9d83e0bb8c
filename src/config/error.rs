use std::path::PathBuf;

use thiserror::Error;

/// Why no usable configuration could be assembled.
#[derive(Error, Debug)]
pub(crate) enum ConfigError {
    /// A layer is malformed or does not fit the expected shape
    #[error("cannot read configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("configuration file {} does not exist", .0.display())]
    FileNotFound(PathBuf),

    #[error("invalid {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            reason: reason.into(),
        }
    }
}
