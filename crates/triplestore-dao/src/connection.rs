use std::sync::Arc;

use crate::{
    backend::SelectResult,
    config::TransactionMode,
    error::{Result, TripleStoreError},
    metrics,
    query::{Statement, StatementKind},
    repository::RepositoryHandle,
    transaction::TransactionState,
};

/// Session on one repository, owned by a single DAO for one unit of work.
///
/// Not `Clone`: every state change (`update`, `begin`, `commit`, `close`)
/// takes `&mut self`, so a connection cannot be driven from two places at
/// once.
pub struct Connection {
    handle: Arc<RepositoryHandle>,
    mode: TransactionMode,
    closed: bool,
    pub(crate) transaction: Option<TransactionState>,
}

impl Connection {
    pub(crate) fn new(handle: Arc<RepositoryHandle>, mode: TransactionMode) -> Self {
        metrics::record_connection_event(handle.repository_id(), "open");
        tracing::trace!(
            repository = %handle.repository_id(),
            backend = %handle.backend_name(),
            mode = ?mode,
            "Opened triple store connection"
        );
        Self {
            handle,
            mode,
            closed: false,
            transaction: None,
        }
    }

    /// Connection over a handle that was not obtained through a registry,
    /// using the transaction mode the handle was configured with.
    pub fn from_handle(handle: Arc<RepositoryHandle>) -> Self {
        let mode = handle.config().transaction_mode;
        Self::new(handle, mode)
    }

    pub fn handle(&self) -> &Arc<RepositoryHandle> {
        &self.handle
    }

    pub fn repository_id(&self) -> &str {
        self.handle.repository_id()
    }

    /// Mode requested by the config this connection was opened with; two
    /// connections sharing a handle may differ.
    pub fn transaction_mode(&self) -> TransactionMode {
        self.mode
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(TripleStoreError::ConnectionClosed {
                repository: self.repository_id().to_string(),
            });
        }
        Ok(())
    }

    fn expect_kind(statement: &Statement, expected: StatementKind) -> Result<()> {
        if statement.kind() != expected {
            return Err(TripleStoreError::QueryBuild {
                reason: format!(
                    "expected a {expected:?} statement, got {:?}",
                    statement.kind()
                ),
            });
        }
        Ok(())
    }

    /// Run a SELECT statement.
    pub async fn select(&self, statement: &Statement) -> Result<SelectResult> {
        self.ensure_open()?;
        Self::expect_kind(statement, StatementKind::Select)?;
        tracing::debug!(
            repository = %self.repository_id(),
            query = %statement,
            "SPARQL query"
        );
        let timeout = self.handle.config().timeouts.query_timeout();
        self.handle.backend_select(statement.as_str(), timeout).await
    }

    /// Run an ASK statement.
    pub async fn ask(&self, statement: &Statement) -> Result<bool> {
        self.ensure_open()?;
        Self::expect_kind(statement, StatementKind::Ask)?;
        tracing::debug!(
            repository = %self.repository_id(),
            query = %statement,
            "SPARQL query"
        );
        let timeout = self.handle.config().timeouts.ask_timeout();
        self.handle.backend_ask(statement.as_str(), timeout).await
    }

    /// Submit an INSERT/DELETE statement.
    ///
    /// Inside a buffered transaction the statement is queued until `commit`;
    /// otherwise it is executed right away.
    pub async fn update(&mut self, statement: Statement) -> Result<()> {
        self.ensure_open()?;
        Self::expect_kind(&statement, StatementKind::Update)?;

        if let Some(transaction) = self.transaction.as_mut()
            && transaction.mode == TransactionMode::Buffered
        {
            tracing::debug!(
                repository = %self.handle.repository_id(),
                query = %statement,
                queued = transaction.queued.len() + 1,
                "SPARQL update queued"
            );
            transaction.queued.push(statement.into_text());
            return Ok(());
        }

        tracing::debug!(
            repository = %self.repository_id(),
            query = %statement,
            "SPARQL update"
        );
        let timeout = self.handle.config().timeouts.update_timeout();
        self.handle
            .backend_update(statement.as_str(), timeout)
            .await
            .map_err(|error| match error {
                TripleStoreError::Backend { .. } | TripleStoreError::Evaluation { .. } => {
                    TripleStoreError::MutationExecution {
                        reason: error.to_string(),
                    }
                }
                other => other,
            })?;

        if let Some(transaction) = self.transaction.as_mut() {
            transaction.applied += 1;
        }
        Ok(())
    }

    /// Release the connection. Idempotent.
    ///
    /// An open transaction is rolled back first: queued statements are
    /// discarded, statements already applied stay applied.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        if self.transaction.is_some() {
            self.discard_transaction("close");
        }
        self.closed = true;
        metrics::record_connection_event(self.handle.repository_id(), "close");
        tracing::trace!(
            repository = %self.handle.repository_id(),
            "Closed triple store connection"
        );
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}
