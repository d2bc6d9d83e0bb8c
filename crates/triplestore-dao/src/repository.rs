//! Repository handles and the registry that shares them.
//!
//! A handle owns the backend client of one (server, repository) pair and
//! bounds how many store operations run against it at once. Connections are
//! cheap views over a handle; the registry guarantees a single live handle
//! per pair.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::DashMap;
use tokio::sync::{OnceCell, Semaphore};

use crate::{
    backend::{OxigraphBackend, Rdf4jBackend, SelectResult, TripleStoreBackend},
    config::{TripleStoreBackendType, TripleStoreConfig},
    connection::Connection,
    error::{Result, TripleStoreError},
    metrics,
};

/// Identity of a repository handle.
///
/// The transaction mode is not part of it: it is chosen per connection, so
/// every mode shares the same store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryKey {
    pub server: String,
    pub repository_id: String,
    /// Account the backend client authenticates as
    pub username: Option<String>,
}

impl RepositoryKey {
    pub fn from_config(config: &TripleStoreConfig) -> Self {
        let server = match config.backend {
            TripleStoreBackendType::Rdf4j => config.url.trim_end_matches('/').to_string(),
            TripleStoreBackendType::Oxigraph => match &config.oxigraph.data_path {
                Some(path) => format!("oxigraph:{}", path.display()),
                None => "oxigraph:memory".to_string(),
            },
        };
        let username = match config.backend {
            TripleStoreBackendType::Rdf4j => config.username.clone(),
            TripleStoreBackendType::Oxigraph => None,
        };
        Self {
            server,
            repository_id: config.repository_id.clone(),
            username,
        }
    }
}

/// Shared access point to one logical repository
pub struct RepositoryHandle {
    key: RepositoryKey,
    backend: Box<dyn TripleStoreBackend>,
    config: TripleStoreConfig,
    /// Semaphore for limiting concurrent operations
    concurrency_limiter: Arc<Semaphore>,
}

impl RepositoryHandle {
    /// Create the backend for `config`, wait for the store to answer and make
    /// sure the repository exists.
    ///
    /// Any failure is reported as [`TripleStoreError::Connectivity`].
    pub async fn initialize(config: &TripleStoreConfig) -> Result<Self> {
        Self::try_initialize(config)
            .await
            .map_err(|error| match error {
                connectivity @ TripleStoreError::Connectivity { .. } => connectivity,
                other => TripleStoreError::Connectivity {
                    url: config.url.clone(),
                    repository: config.repository_id.clone(),
                    reason: other.to_string(),
                },
            })
    }

    async fn try_initialize(config: &TripleStoreConfig) -> Result<Self> {
        let backend: Box<dyn TripleStoreBackend> = match config.backend {
            TripleStoreBackendType::Rdf4j => Box::new(Rdf4jBackend::new(config.clone())?),
            TripleStoreBackendType::Oxigraph => match &config.oxigraph.data_path {
                Some(data_path) => {
                    // One subdirectory per repository
                    let store_path = data_path.join(&config.repository_id);
                    std::fs::create_dir_all(&store_path)?;
                    Box::new(OxigraphBackend::open(store_path)?)
                }
                None => Box::new(OxigraphBackend::in_memory()?),
            },
        };

        let handle = Self::from_backend(backend, config.clone());

        // Embedded stores answer immediately; remote ones may still be booting
        handle.connect_with_retry().await?;
        handle.ensure_repository().await?;

        Ok(handle)
    }

    /// Wrap an already constructed backend.
    pub fn from_backend(backend: Box<dyn TripleStoreBackend>, config: TripleStoreConfig) -> Self {
        let max_concurrent = config.max_concurrent_operations.max(1);
        if max_concurrent != config.max_concurrent_operations {
            tracing::warn!(
                configured = config.max_concurrent_operations,
                effective = max_concurrent,
                "Triple store max_concurrent_operations too low; clamped"
            );
        }

        Self {
            key: RepositoryKey::from_config(&config),
            backend,
            config,
            concurrency_limiter: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    /// Connect to triple store with retry logic
    async fn connect_with_retry(&self) -> Result<()> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.backend.health_check().await {
                Ok(true) => {
                    tracing::info!(
                        backend = %self.backend.name(),
                        url = %self.config.url,
                        repository = %self.config.repository_id,
                        "Connected to triple store"
                    );
                    return Ok(());
                }
                Ok(false) => {
                    tracing::warn!(
                        backend = %self.backend.name(),
                        attempt = attempts,
                        "Triple store health check returned false"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        backend = %self.backend.name(),
                        attempt = attempts,
                        error = %e,
                        "Failed to connect to triple store"
                    );
                }
            }

            if attempts >= self.config.connect_max_retries.max(1) {
                return Err(TripleStoreError::ConnectionFailed { attempts });
            }

            tokio::time::sleep(self.config.connect_retry_frequency()).await;
        }
    }

    /// Ensure the repository exists, creating it if the backend can
    async fn ensure_repository(&self) -> Result<()> {
        if !self.backend.repository_exists().await? {
            tracing::info!(
                repository = %self.config.repository_id,
                "Repository does not exist, creating..."
            );
            self.backend.create_repository().await?;
        }
        Ok(())
    }

    pub fn key(&self) -> &RepositoryKey {
        &self.key
    }

    pub fn config(&self) -> &TripleStoreConfig {
        &self.config
    }

    pub fn repository_id(&self) -> &str {
        &self.config.repository_id
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Effective concurrency limit used by the internal semaphore.
    pub fn max_concurrent_operations(&self) -> usize {
        self.config.max_concurrent_operations.max(1)
    }

    fn record_permit_snapshot(&self, backend: &str) {
        metrics::record_backend_permit_snapshot(
            backend,
            self.max_concurrent_operations(),
            self.concurrency_limiter.available_permits(),
        );
    }

    /// Run one backend call under a semaphore permit, recording wait time,
    /// request size and outcome.
    async fn limited<T, F>(&self, op: &'static str, query: &str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let backend = self.backend.name();
        let started = Instant::now();
        metrics::record_backend_query_bytes_total(backend, op, query.len());

        let permit = match self.concurrency_limiter.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                let error = TripleStoreError::SemaphoreClosed;
                metrics::record_backend_operation(backend, op, Some(&error), started.elapsed());
                return Err(error);
            }
        };
        metrics::record_backend_permit_wait(backend, op, started.elapsed());
        self.record_permit_snapshot(backend);

        let result = call.await;
        drop(permit);
        self.record_permit_snapshot(backend);
        metrics::record_backend_operation(backend, op, result.as_ref().err(), started.elapsed());
        result
    }

    pub(crate) async fn backend_update(&self, query: &str, timeout: Duration) -> Result<()> {
        self.limited("update", query, self.backend.update(query, timeout))
            .await
    }

    pub(crate) async fn backend_ask(&self, query: &str, timeout: Duration) -> Result<bool> {
        self.limited("ask", query, self.backend.ask(query, timeout))
            .await
    }

    pub(crate) async fn backend_select(
        &self,
        query: &str,
        timeout: Duration,
    ) -> Result<SelectResult> {
        let result = self
            .limited("select", query, self.backend.select(query, timeout))
            .await;
        if let Ok(rows) = &result {
            metrics::record_backend_result_rows(self.backend.name(), "select", rows.rows.len());
        }
        result
    }
}

type HandleCell = Arc<OnceCell<Arc<RepositoryHandle>>>;

/// Connection manager: one shared [`RepositoryHandle`] per (server,
/// repository) pair, created lazily on first open.
///
/// Concurrent first opens of the same pair wait on one initialization
/// instead of racing to connect.
#[derive(Default)]
pub struct RepositoryRegistry {
    handles: DashMap<RepositoryKey, HandleCell>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for `config`, initializing it on first use.
    ///
    /// A failed initialization is not cached; the next call tries again.
    pub async fn handle(&self, config: &TripleStoreConfig) -> Result<Arc<RepositoryHandle>> {
        let key = RepositoryKey::from_config(config);
        // Clone the cell out so no map guard is held across the await below
        let cell = Arc::clone(self.handles.entry(key.clone()).or_default().value());
        if let Some(existing) = cell.get() {
            metrics::record_repository_handle(&key.repository_id, "reused");
            return Ok(Arc::clone(existing));
        }

        let mut created = false;
        let initializing = &mut created;
        let result = cell
            .get_or_try_init(|| async move {
                *initializing = true;
                RepositoryHandle::initialize(config).await.map(Arc::new)
            })
            .await
            .map(Arc::clone);

        match result {
            Ok(handle) => {
                let outcome = if created { "created" } else { "reused" };
                metrics::record_repository_handle(&key.repository_id, outcome);
                Ok(handle)
            }
            Err(error) => {
                self.handles.remove_if(&key, |_, current| {
                    Arc::ptr_eq(current, &cell) && !current.initialized()
                });
                metrics::record_repository_handle(&key.repository_id, "failed");
                tracing::error!(
                    url = %config.url,
                    repository = %config.repository_id,
                    error = %error,
                    "Can't connect to triplestore"
                );
                Err(error)
            }
        }
    }

    /// Register a handle built around a custom backend. An existing handle
    /// for the same pair wins.
    pub fn register(&self, handle: RepositoryHandle) -> Arc<RepositoryHandle> {
        let key = handle.key().clone();
        let cell = Arc::clone(self.handles.entry(key).or_default().value());
        let handle = Arc::new(handle);
        match cell.set(Arc::clone(&handle)) {
            Ok(()) => handle,
            Err(_) => cell.get().map(Arc::clone).unwrap_or(handle),
        }
    }

    /// Open a fresh connection to the repository described by `config`.
    pub async fn open(&self, config: &TripleStoreConfig) -> Result<Connection> {
        let handle = self.handle(config).await?;
        Ok(Connection::new(handle, config.transaction_mode))
    }

    /// Open a connection to another repository of the same server.
    pub async fn open_repository(
        &self,
        config: &TripleStoreConfig,
        repository_id: &str,
    ) -> Result<Connection> {
        self.open(&config.for_repository(repository_id)).await
    }

    /// Drop the registry's reference to a handle. Connections already opened
    /// keep it alive until they are gone.
    pub fn evict(&self, key: &RepositoryKey) -> Option<Arc<RepositoryHandle>> {
        self.handles
            .remove(key)
            .and_then(|(_, cell)| cell.get().map(Arc::clone))
    }

    /// Number of initialized handles.
    pub fn len(&self) -> usize {
        self.handles
            .iter()
            .filter(|entry| entry.value().initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
