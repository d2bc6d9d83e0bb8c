use std::time::Duration;

use metrics::{counter, gauge, histogram};

pub fn record_triple_store_backend_operation(
    backend: &str,
    op: &str,
    status: &str,
    error_class: &str,
    duration: Duration,
) {
    counter!(
        "triplestore_backend_operations_total",
        "backend" => backend.to_string(),
        "op" => op.to_string(),
        "status" => status.to_string(),
        "error_class" => error_class.to_string()
    )
    .increment(1);
    histogram!(
        "triplestore_backend_operation_duration_seconds",
        "backend" => backend.to_string(),
        "op" => op.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
}

pub fn record_triple_store_backend_query_bytes_total(backend: &str, op: &str, bytes: usize) {
    counter!(
        "triplestore_backend_query_bytes_total",
        "backend" => backend.to_string(),
        "op" => op.to_string()
    )
    .increment(bytes as u64);
}

pub fn record_triple_store_backend_result_rows(backend: &str, op: &str, rows: usize) {
    histogram!(
        "triplestore_backend_result_rows",
        "backend" => backend.to_string(),
        "op" => op.to_string()
    )
    .record(rows as f64);
}

pub fn record_triple_store_backend_permit_wait(backend: &str, op: &str, wait: Duration) {
    histogram!(
        "triplestore_backend_permit_wait_seconds",
        "backend" => backend.to_string(),
        "op" => op.to_string()
    )
    .record(wait.as_secs_f64());
}

pub fn record_triple_store_backend_permit_snapshot(backend: &str, max: usize, available: usize) {
    gauge!(
        "triplestore_backend_permits_max",
        "backend" => backend.to_string()
    )
    .set(max as f64);
    gauge!(
        "triplestore_backend_permits_in_use",
        "backend" => backend.to_string()
    )
    .set(max.saturating_sub(available) as f64);
}

pub fn record_triple_store_repository_handle(repository: &str, outcome: &str) {
    counter!(
        "triplestore_repository_handles_total",
        "repository" => repository.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

pub fn record_triple_store_connection_event(repository: &str, event: &str) {
    counter!(
        "triplestore_connection_events_total",
        "repository" => repository.to_string(),
        "event" => event.to_string()
    )
    .increment(1);
}

pub fn record_triple_store_transaction(repository: &str, mode: &str, outcome: &str, statements: usize) {
    counter!(
        "triplestore_transactions_total",
        "repository" => repository.to_string(),
        "mode" => mode.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
    histogram!(
        "triplestore_transaction_statements",
        "repository" => repository.to_string(),
        "mode" => mode.to_string()
    )
    .record(statements as f64);
}
