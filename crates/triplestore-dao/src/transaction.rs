//! Transaction lifecycle over a store that executes every request on its own.
//!
//! What `rollback` can undo depends on [`TransactionMode`]: in `immediate`
//! mode nothing already submitted is undone, in `buffered` mode nothing has
//! been submitted before `commit`.

use async_trait::async_trait;

use crate::{
    config::TransactionMode,
    connection::Connection,
    error::{Result, TripleStoreError},
    metrics,
};

pub(crate) struct TransactionState {
    pub(crate) mode: TransactionMode,
    /// Statements executed against the store since `begin` (immediate mode)
    pub(crate) applied: usize,
    /// Statements waiting for `commit` (buffered mode)
    pub(crate) queued: Vec<String>,
}

/// What a rollback actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollbackOutcome {
    /// Queued statements dropped without reaching the store
    pub discarded: usize,
    /// Statements the store already applied and that remain in effect
    pub already_applied: usize,
}

impl Connection {
    fn ensure_open_for_transaction(&self) -> Result<()> {
        if self.is_closed() {
            return Err(TripleStoreError::Transaction {
                reason: format!("connection to {} is closed", self.repository_id()),
            });
        }
        Ok(())
    }

    pub fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    /// Open a transaction. Fails when one is already open.
    pub fn begin(&mut self) -> Result<()> {
        self.ensure_open_for_transaction()?;
        if self.transaction.is_some() {
            return Err(TripleStoreError::Transaction {
                reason: "a transaction is already active".to_string(),
            });
        }

        let mode = self.transaction_mode();
        tracing::debug!(
            repository = %self.repository_id(),
            mode = ?mode,
            "Transaction started"
        );
        self.transaction = Some(TransactionState {
            mode,
            applied: 0,
            queued: Vec::new(),
        });
        Ok(())
    }

    /// Hook for stores whose protocol opens a transaction with the first
    /// statement. Nothing to do for SPARQL over HTTP.
    pub fn start_transaction(&mut self) {}

    /// Finalize every statement issued since `begin`.
    ///
    /// Returns how many statements the transaction carried. In buffered mode
    /// the queue is sent as one update request; if that request fails the
    /// transaction is closed and nothing was applied by this layer.
    pub async fn commit(&mut self) -> Result<usize> {
        self.ensure_open_for_transaction()?;
        let state = self
            .transaction
            .take()
            .ok_or_else(|| TripleStoreError::Transaction {
                reason: "commit without an active transaction".to_string(),
            })?;

        match state.mode {
            TransactionMode::Immediate => {
                metrics::record_transaction(
                    self.repository_id(),
                    state.mode,
                    "committed",
                    state.applied,
                );
                tracing::debug!(
                    repository = %self.repository_id(),
                    statements = state.applied,
                    "Transaction committed"
                );
                Ok(state.applied)
            }
            TransactionMode::Buffered => {
                let statements = state.queued.len();
                if statements == 0 {
                    metrics::record_transaction(self.repository_id(), state.mode, "committed", 0);
                    return Ok(0);
                }

                let request = state.queued.join(" ;\n");
                let timeout = self.handle().config().timeouts.update_timeout();
                tracing::debug!(
                    repository = %self.repository_id(),
                    statements,
                    "Committing buffered transaction"
                );

                match self.handle().backend_update(&request, timeout).await {
                    Ok(()) => {
                        metrics::record_transaction(
                            self.repository_id(),
                            state.mode,
                            "committed",
                            statements,
                        );
                        Ok(statements)
                    }
                    Err(error) => {
                        metrics::record_transaction(
                            self.repository_id(),
                            state.mode,
                            "commit_failed",
                            statements,
                        );
                        tracing::error!(
                            repository = %self.repository_id(),
                            statements,
                            error = %error,
                            "Transaction commit failed"
                        );
                        Err(TripleStoreError::MutationExecution {
                            reason: error.to_string(),
                        })
                    }
                }
            }
        }
    }

    /// Discard what the transaction can still discard.
    pub async fn rollback(&mut self) -> Result<RollbackOutcome> {
        self.ensure_open_for_transaction()?;
        if self.transaction.is_none() {
            return Err(TripleStoreError::Transaction {
                reason: "rollback without an active transaction".to_string(),
            });
        }
        Ok(self.discard_transaction("rollback"))
    }

    pub(crate) fn discard_transaction(&mut self, cause: &str) -> RollbackOutcome {
        let Some(state) = self.transaction.take() else {
            return RollbackOutcome {
                discarded: 0,
                already_applied: 0,
            };
        };

        let outcome = RollbackOutcome {
            discarded: state.queued.len(),
            already_applied: state.applied,
        };

        if outcome.already_applied > 0 {
            tracing::warn!(
                repository = %self.repository_id(),
                applied = outcome.already_applied,
                cause,
                "Rollback cannot undo statements already applied by the store"
            );
        } else {
            tracing::debug!(
                repository = %self.repository_id(),
                discarded = outcome.discarded,
                cause,
                "Transaction rolled back"
            );
        }
        metrics::record_transaction(
            self.repository_id(),
            state.mode,
            "rolled_back",
            outcome.discarded + outcome.already_applied,
        );
        outcome
    }
}

/// Lifecycle shared by every entity DAO.
///
/// Entity DAOs own a [`Connection`] and expose it here; the lifecycle
/// methods come for free.
#[async_trait]
pub trait TripleStoreDao: Send {
    fn connection(&self) -> &Connection;

    fn connection_mut(&mut self) -> &mut Connection;

    /// Begin the unit of work's transaction
    fn init_connection(&mut self) -> Result<()> {
        self.connection_mut().begin()
    }

    fn start_transaction(&mut self) {
        self.connection_mut().start_transaction();
    }

    async fn commit_transaction(&mut self) -> Result<usize> {
        self.connection_mut().commit().await
    }

    async fn rollback_transaction(&mut self) -> Result<RollbackOutcome> {
        self.connection_mut().rollback().await
    }

    fn close_connection(&mut self) {
        self.connection_mut().close();
    }
}
