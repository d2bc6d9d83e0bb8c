use std::time::Duration;

use triplestore_observability as observability;

use crate::{config::TransactionMode, error::TripleStoreError};

pub(crate) fn record_backend_query_bytes_total(backend: &str, op: &str, bytes: usize) {
    observability::record_triple_store_backend_query_bytes_total(backend, op, bytes);
}

pub(crate) fn record_backend_result_rows(backend: &str, op: &str, rows: usize) {
    observability::record_triple_store_backend_result_rows(backend, op, rows);
}

pub(crate) fn record_backend_permit_wait(backend: &str, op: &str, wait: Duration) {
    observability::record_triple_store_backend_permit_wait(backend, op, wait);
}

pub(crate) fn record_backend_permit_snapshot(backend: &str, max: usize, available: usize) {
    observability::record_triple_store_backend_permit_snapshot(backend, max, available);
}

pub(crate) fn record_backend_operation(
    backend: &str,
    op: &str,
    error: Option<&TripleStoreError>,
    duration: Duration,
) {
    let status = if error.is_some() { "error" } else { "ok" };
    let error_class = error.map_or("none", classify_error);

    observability::record_triple_store_backend_operation(
        backend,
        op,
        status,
        error_class,
        duration,
    );
}

pub(crate) fn record_repository_handle(repository: &str, outcome: &str) {
    observability::record_triple_store_repository_handle(repository, outcome);
}

pub(crate) fn record_connection_event(repository: &str, event: &str) {
    observability::record_triple_store_connection_event(repository, event);
}

pub(crate) fn record_transaction(
    repository: &str,
    mode: TransactionMode,
    outcome: &str,
    statements: usize,
) {
    let mode = match mode {
        TransactionMode::Immediate => "immediate",
        TransactionMode::Buffered => "buffered",
    };
    observability::record_triple_store_transaction(repository, mode, outcome, statements);
}

pub(crate) fn record_dao_operation(op: &str, outcome: &str) {
    observability::record_dao_operation(op, outcome);
}

fn classify_error(error: &TripleStoreError) -> &'static str {
    match error {
        TripleStoreError::SemaphoreClosed => "semaphore_closed",
        TripleStoreError::Http(e) if e.is_timeout() => "timeout",
        TripleStoreError::Http(_) => "http",
        TripleStoreError::Io(_) => "io",
        TripleStoreError::Connectivity { .. } | TripleStoreError::ConnectionFailed { .. } => {
            "connectivity"
        }
        TripleStoreError::QueryBuild { .. } => "query_build",
        TripleStoreError::Backend { status, .. } if *status >= 500 => "backend_5xx",
        TripleStoreError::Backend { .. } => "backend_4xx",
        TripleStoreError::Evaluation { .. } => "evaluation",
        TripleStoreError::MutationExecution { .. } => "mutation",
        TripleStoreError::ParseError { .. } => "parse",
        TripleStoreError::Transaction { .. } => "transaction",
        TripleStoreError::ConnectionClosed { .. } => "closed",
        TripleStoreError::Other(_) => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_backend_status() {
        let server = TripleStoreError::Backend {
            status: 503,
            message: String::new(),
        };
        let client = TripleStoreError::Backend {
            status: 400,
            message: String::new(),
        };
        assert_eq!(classify_error(&server), "backend_5xx");
        assert_eq!(classify_error(&client), "backend_4xx");
        assert_eq!(
            classify_error(&TripleStoreError::query_build("empty")),
            "query_build"
        );
    }
}
