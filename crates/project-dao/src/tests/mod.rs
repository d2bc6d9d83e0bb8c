mod dao;

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use triplestore_dao::{
    Connection, OxigraphStoreConfig, PaginationConfig, RepositoryHandle, RepositoryRegistry,
    Result, SelectResult, TimeoutConfig, TransactionMode, TripleStoreBackend,
    TripleStoreBackendType, TripleStoreConfig, TripleStoreError,
};

use crate::{ProjectDao, ProjectDaoConfig, ProjectDetails};

pub(super) fn store_config(repository_id: &str) -> TripleStoreConfig {
    TripleStoreConfig {
        backend: TripleStoreBackendType::Oxigraph,
        url: String::new(),
        repository_id: repository_id.to_string(),
        username: None,
        password: None,
        connect_max_retries: 1,
        connect_retry_frequency_ms: 10,
        timeouts: TimeoutConfig::default(),
        max_concurrent_operations: 4,
        transaction_mode: TransactionMode::Buffered,
        oxigraph: OxigraphStoreConfig::default(),
    }
}

pub(super) async fn open_dao(registry: &RepositoryRegistry, repository_id: &str) -> ProjectDao {
    ProjectDao::open(
        registry,
        &store_config(repository_id),
        None,
        ProjectDaoConfig::default(),
        PaginationConfig::default(),
    )
    .await
    .unwrap_or_else(|error| panic!("Failed to open project DAO: {error}"))
}

pub(super) fn project(acronym: &str, name: &str) -> ProjectDetails {
    ProjectDetails {
        name: name.to_string(),
        acronym: acronym.to_string(),
        financial_name: Some("H2020".to_string()),
        date_start: "2015-07-07".to_string(),
        date_end: Some("2019-07-07".to_string()),
        keywords: vec!["drought".to_string(), "maize".to_string()],
        website: Some(format!("http://www.{}.eu", acronym.to_lowercase())),
        ..ProjectDetails::default()
    }
}

/// Store that answers health checks and fails everything else
pub(super) struct UnavailableBackend;

#[async_trait]
impl TripleStoreBackend for UnavailableBackend {
    fn name(&self) -> &'static str {
        "unavailable"
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
        Err(unavailable())
    }

    async fn ask(&self, _query: &str, _timeout: Duration) -> Result<bool> {
        Err(unavailable())
    }

    async fn select(&self, _query: &str, _timeout: Duration) -> Result<SelectResult> {
        Err(unavailable())
    }
}

fn unavailable() -> TripleStoreError {
    TripleStoreError::Backend {
        status: 503,
        message: "Service Unavailable".to_string(),
    }
}

pub(super) fn unavailable_dao() -> ProjectDao {
    let handle = RepositoryHandle::from_backend(
        Box::new(UnavailableBackend),
        store_config("unavailable"),
    );
    ProjectDao::new(
        Connection::from_handle(Arc::new(handle)),
        ProjectDaoConfig::default(),
        PaginationConfig::default(),
    )
}
