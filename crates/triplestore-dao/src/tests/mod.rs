mod integration_tests;
mod transactions;

use std::time::Duration;

use async_trait::async_trait;

use crate::{
    SelectResult, TripleStoreBackend, TripleStoreBackendType, TripleStoreConfig,
    TransactionMode,
    config::{OxigraphStoreConfig, TimeoutConfig},
    error::{Result, TripleStoreError},
};

pub(super) const SUBJECT: &str = "http://www.phenome-fppn.fr/diaphen/2018/s18533";
pub(super) const PREDICATE: &str = "http://www.opensilex.org/vocabulary/oeso#hasVariety";
pub(super) const GRAPH: &str = "http://www.phenome-fppn.fr/diaphen/set/scientific-objects";

pub(super) fn require_rdf4j() -> bool {
    if std::env::var("RUN_RDF4J_TESTS").ok().as_deref() == Some("1") {
        true
    } else {
        eprintln!("Skipping RDF4J tests (set RUN_RDF4J_TESTS=1)");
        false
    }
}

pub(super) fn oxigraph_config(repository_id: &str, mode: TransactionMode) -> TripleStoreConfig {
    TripleStoreConfig {
        backend: TripleStoreBackendType::Oxigraph,
        url: String::new(),
        repository_id: repository_id.to_string(),
        username: None,
        password: None,
        connect_max_retries: 1,
        connect_retry_frequency_ms: 10,
        timeouts: TimeoutConfig {
            query_ms: 10_000,
            update_ms: 10_000,
            ask_ms: 10_000,
        },
        max_concurrent_operations: 4,
        transaction_mode: mode,
        oxigraph: OxigraphStoreConfig::default(),
    }
}

pub(super) fn object(index: usize) -> String {
    format!("http://www.phenome-fppn.fr/diaphen/id/variety/v{index}")
}

/// Healthy store that rejects every statement
pub(super) struct RejectingBackend;

#[async_trait]
impl TripleStoreBackend for RejectingBackend {
    fn name(&self) -> &'static str {
        "rejecting-backend"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn repository_exists(&self) -> Result<bool> {
        Ok(true)
    }

    async fn create_repository(&self) -> Result<()> {
        Ok(())
    }

    async fn update(&self, _query: &str, _timeout: Duration) -> Result<()> {
        Err(TripleStoreError::Backend {
            status: 500,
            message: "update rejected".to_string(),
        })
    }

    async fn ask(&self, _query: &str, _timeout: Duration) -> Result<bool> {
        Err(TripleStoreError::Backend {
            status: 400,
            message: "MALFORMED QUERY".to_string(),
        })
    }

    async fn select(&self, _query: &str, _timeout: Duration) -> Result<SelectResult> {
        Err(TripleStoreError::Backend {
            status: 503,
            message: "store unavailable".to_string(),
        })
    }
}
