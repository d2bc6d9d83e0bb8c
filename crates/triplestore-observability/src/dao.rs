use metrics::counter;

/// Outcome of a DAO-level operation (`exists`, `add_relationships`, ...).
///
/// `outcome` is one of `found`, `not_found`, `ok`, `empty`, `failed`, `degraded`.
pub fn record_dao_operation(op: &str, outcome: &str) {
    counter!(
        "triplestore_dao_operations_total",
        "op" => op.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Result of an entity DAO write (`check_and_insert`, `check_and_update_list`).
pub fn record_entity_write(entity: &str, op: &str, status: u16) {
    counter!(
        "triplestore_entity_writes_total",
        "entity" => entity.to_string(),
        "op" => op.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}
