use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

/// Backend type for the triple store
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TripleStoreBackendType {
    /// RDF4J (Sesame) HTTP server, one repository per identifier
    Rdf4j,
    /// Oxigraph embedded Rust-native store (local development and tests)
    Oxigraph,
}

/// How `begin`/`commit`/`rollback` map onto a store that executes each
/// request on its own.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionMode {
    /// Statements run as they are submitted. Commit is bookkeeping only and
    /// rollback cannot undo anything already applied.
    #[default]
    Immediate,
    /// Mutations are queued between `begin` and `commit` and sent as one
    /// multi-operation update request. Rollback discards the queue.
    Buffered,
}

impl TransactionMode {
    /// Whether rollback restores the state observed at `begin`.
    pub fn rollback_is_atomic(&self) -> bool {
        matches!(self, TransactionMode::Buffered)
    }
}

/// Configuration for one logical repository
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TripleStoreConfig {
    /// Backend type to use.
    pub backend: TripleStoreBackendType,

    /// Base URL of the store server (e.g., "http://localhost:8080/rdf4j-server").
    /// Ignored for Oxigraph.
    pub url: String,

    /// Repository identifier on the server
    pub repository_id: String,

    /// Optional username for HTTP basic authentication (RDF4J only)
    pub username: Option<String>,

    /// Optional password for HTTP basic authentication (RDF4J only)
    pub password: Option<String>,

    /// Health-check attempts when the repository handle is first created
    pub connect_max_retries: u32,

    /// Delay between connection attempts in milliseconds
    pub connect_retry_frequency_ms: u64,

    /// Timeout configuration for different operation types
    pub timeouts: TimeoutConfig,

    /// Maximum store operations in flight on one repository handle.
    pub max_concurrent_operations: usize,

    /// Transaction capability of the store.
    #[serde(default)]
    pub transaction_mode: TransactionMode,

    /// Oxigraph-specific storage options.
    ///
    /// Ignored for RDF4J backend.
    #[serde(default)]
    pub oxigraph: OxigraphStoreConfig,
}

/// Oxigraph storage options.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct OxigraphStoreConfig {
    /// Directory holding persistent stores, one subdirectory per repository.
    ///
    /// If `None`, the store lives in memory for the lifetime of the handle.
    pub data_path: Option<PathBuf>,
}

/// Timeout configuration for different SPARQL operations
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TimeoutConfig {
    /// Timeout for SELECT queries in milliseconds
    pub query_ms: u64,

    /// Timeout for INSERT/DELETE operations in milliseconds
    pub update_ms: u64,

    /// Timeout for ASK queries in milliseconds
    pub ask_ms: u64,
}

impl TimeoutConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_ms)
    }

    pub fn update_timeout(&self) -> Duration {
        Duration::from_millis(self.update_ms)
    }

    pub fn ask_timeout(&self) -> Duration {
        Duration::from_millis(self.ask_ms)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            query_ms: 30_000,
            update_ms: 60_000,
            ask_ms: 10_000,
        }
    }
}

impl TripleStoreConfig {
    /// Same server and settings, different repository.
    pub fn for_repository(&self, repository_id: impl Into<String>) -> Self {
        Self {
            repository_id: repository_id.into(),
            ..self.clone()
        }
    }

    /// Get connect retry frequency as Duration
    pub fn connect_retry_frequency(&self) -> Duration {
        Duration::from_millis(self.connect_retry_frequency_ms)
    }

    fn server_base(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// SPARQL query endpoint of the repository
    pub fn repository_endpoint(&self) -> String {
        format!("{}/repositories/{}", self.server_base(), self.repository_id)
    }

    /// SPARQL update endpoint of the repository
    pub fn statements_endpoint(&self) -> String {
        format!("{}/statements", self.repository_endpoint())
    }

    /// Repository size endpoint, answers 404 for unknown repositories
    pub fn size_endpoint(&self) -> String {
        format!("{}/size", self.repository_endpoint())
    }

    /// Server protocol version endpoint, used as health check
    pub fn protocol_endpoint(&self) -> String {
        format!("{}/protocol", self.server_base())
    }
}

/// Paging defaults and ceiling shared by every DAO of the process.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PaginationConfig {
    /// Page used when a caller asks for a negative page
    pub default_page: u32,
    /// Page size used when none (or a negative one) is given
    pub default_page_size: u32,
    /// Largest single page a list-within-list lookup may request
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 0,
            default_page_size: 20,
            max_page_size: 5_000,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn rdf4j_config() -> TripleStoreConfig {
        TripleStoreConfig {
            backend: TripleStoreBackendType::Rdf4j,
            url: "http://localhost:8080/rdf4j-server/".to_string(),
            repository_id: "phis".to_string(),
            username: None,
            password: None,
            connect_max_retries: 1,
            connect_retry_frequency_ms: 10,
            timeouts: TimeoutConfig::default(),
            max_concurrent_operations: 4,
            transaction_mode: TransactionMode::default(),
            oxigraph: OxigraphStoreConfig::default(),
        }
    }

    #[test]
    fn endpoints_follow_rdf4j_layout() {
        let config = rdf4j_config();
        assert_eq!(
            config.repository_endpoint(),
            "http://localhost:8080/rdf4j-server/repositories/phis"
        );
        assert_eq!(
            config.statements_endpoint(),
            "http://localhost:8080/rdf4j-server/repositories/phis/statements"
        );
        assert_eq!(
            config.protocol_endpoint(),
            "http://localhost:8080/rdf4j-server/protocol"
        );
    }

    #[test]
    fn for_repository_keeps_server_settings() {
        let config = rdf4j_config().for_repository("other");
        assert_eq!(config.repository_id, "other");
        assert_eq!(config.url, "http://localhost:8080/rdf4j-server/");
        assert_eq!(config.max_concurrent_operations, 4);
    }

    #[test]
    fn transaction_mode_defaults_to_immediate() {
        let parsed: TransactionMode = serde_json::from_str("\"buffered\"").unwrap();
        assert_eq!(parsed, TransactionMode::Buffered);
        assert!(!TransactionMode::default().rollback_is_atomic());
    }
}
