//! Generic access layer over a SPARQL triple store.
//!
//! [`RepositoryRegistry`] hands out [`Connection`]s that share one
//! [`RepositoryHandle`] per (server, repository) pair. A connection builds
//! and runs existence checks, single-value lookups and relationship batches,
//! and carries the transaction lifecycle that entity DAOs expose through
//! [`TripleStoreDao`].

mod backend;
mod batch;
mod config;
mod connection;
pub mod error;
mod metrics;
mod pagination;
mod pattern;
pub mod query;
mod repository;
mod transaction;

pub use backend::{
    OxigraphBackend, Rdf4jBackend, SelectResult, SelectRow, SelectValue, TripleStoreBackend,
};
pub use config::{
    OxigraphStoreConfig, PaginationConfig, TimeoutConfig, TransactionMode,
    TripleStoreBackendType, TripleStoreConfig,
};
pub use connection::Connection;
pub use error::{Result, TripleStoreError};
pub use pagination::Pagination;
pub use pattern::string_value;
pub use query::{SparqlQueryBuilder, Statement, StatementKind, Term, TriplePattern};
pub use repository::{RepositoryHandle, RepositoryKey, RepositoryRegistry};
pub use transaction::{RollbackOutcome, TripleStoreDao};

#[cfg(test)]
mod tests;
