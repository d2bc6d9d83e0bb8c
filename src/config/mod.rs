mod defaults;
mod error;
mod loader;

pub(crate) use error::ConfigError;
pub(crate) use loader::load_configuration;
use project_dao::ProjectDaoConfig;
use serde::{Deserialize, Serialize};
use triplestore_dao::{PaginationConfig, TripleStoreBackendType, TripleStoreConfig};

use crate::logger::{LoggerConfig, TelemetryConfig};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    pub triple_store: TripleStoreConfig,
    pub pagination: PaginationConfig,
    pub projects: ProjectDaoConfig,
    pub logger: LoggerConfig,
    pub telemetry: TelemetryConfig,
}

impl Config {
    /// Reject combinations the store layer would only trip over later.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let store = &self.triple_store;
        if store.repository_id.trim().is_empty() {
            return Err(ConfigError::invalid(
                "triple_store.repository_id",
                "must not be empty",
            ));
        }
        if store.backend == TripleStoreBackendType::Rdf4j && store.url.trim().is_empty() {
            return Err(ConfigError::invalid(
                "triple_store.url",
                "required for the rdf4j backend",
            ));
        }
        if store.max_concurrent_operations == 0 {
            return Err(ConfigError::invalid(
                "triple_store.max_concurrent_operations",
                "must be at least 1",
            ));
        }

        let pagination = &self.pagination;
        if pagination.default_page_size == 0
            || pagination.default_page_size > pagination.max_page_size
        {
            return Err(ConfigError::invalid(
                "pagination.default_page_size",
                format!("must be between 1 and {}", pagination.max_page_size),
            ));
        }
        Ok(())
    }
}
