#![allow(clippy::unwrap_used)]

//! Integration tests against a running RDF4J server.
//!
//! The repository must exist beforehand. Start a server with:
//! `docker run -d -p 8080:8080 eclipse/rdf4j-workbench` and create the
//! `triplestore-dao-test` repository (in-memory store) from the workbench.

use super::{GRAPH, PREDICATE, SUBJECT, object};
use crate::{
    RepositoryRegistry, TimeoutConfig, TransactionMode, TripleStoreBackendType,
    TripleStoreConfig, config::OxigraphStoreConfig,
};

fn rdf4j_config(mode: TransactionMode) -> TripleStoreConfig {
    TripleStoreConfig {
        backend: TripleStoreBackendType::Rdf4j,
        url: std::env::var("RDF4J_URL")
            .unwrap_or_else(|_| "http://localhost:8080/rdf4j-server".to_string()),
        repository_id: std::env::var("RDF4J_REPOSITORY")
            .unwrap_or_else(|_| "triplestore-dao-test".to_string()),
        username: std::env::var("RDF4J_USERNAME").ok(),
        password: std::env::var("RDF4J_PASSWORD").ok(),
        connect_max_retries: 3,
        connect_retry_frequency_ms: 1000,
        timeouts: TimeoutConfig {
            query_ms: 30000,
            update_ms: 60000,
            ask_ms: 10000,
        },
        max_concurrent_operations: 16,
        transaction_mode: mode,
        oxigraph: OxigraphStoreConfig::default(),
    }
}

#[tokio::test]
async fn test_rdf4j_relationship_roundtrip() {
    if !super::require_rdf4j() {
        return;
    }

    let registry = RepositoryRegistry::new();
    let mut connection = match registry.open(&rdf4j_config(TransactionMode::Immediate)).await {
        Ok(connection) => connection,
        Err(e) => {
            eprintln!("Skipping test - RDF4J not available: {e}");
            return;
        }
    };

    let objects = [object(101), object(102)];
    assert!(
        connection
            .add_relationships(SUBJECT, PREDICATE, &objects, Some(GRAPH))
            .await
    );
    assert!(
        connection
            .exists(Some(SUBJECT), Some(PREDICATE), Some(objects[0].as_str()))
            .await
            .unwrap()
    );
    assert!(connection.exists_identifier(&objects[1]).await);
    assert!(
        connection
            .lookup_single_value(Some(SUBJECT), Some(PREDICATE))
            .await
            .unwrap()
            .is_some()
    );

    assert!(
        connection
            .remove_relationships(SUBJECT, PREDICATE, &objects, Some(GRAPH))
            .await
    );
    assert!(
        !connection
            .exists(Some(SUBJECT), Some(PREDICATE), Some(objects[0].as_str()))
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_rdf4j_buffered_commit() {
    if !super::require_rdf4j() {
        return;
    }

    let registry = RepositoryRegistry::new();
    let mut connection = match registry.open(&rdf4j_config(TransactionMode::Buffered)).await {
        Ok(connection) => connection,
        Err(e) => {
            eprintln!("Skipping test - RDF4J not available: {e}");
            return;
        }
    };

    let objects = [object(201)];
    connection.begin().unwrap();
    assert!(
        connection
            .add_relationships(SUBJECT, PREDICATE, &objects, None)
            .await
    );
    assert!(
        connection
            .remove_relationships(SUBJECT, PREDICATE, &objects, None)
            .await
    );
    assert_eq!(connection.commit().await.unwrap(), 2);
    assert!(!connection.exists_identifier(&objects[0]).await);
}

#[tokio::test]
async fn test_rdf4j_unscoped_removal_of_graph_triples() {
    if !super::require_rdf4j() {
        return;
    }

    let registry = RepositoryRegistry::new();
    let mut connection = match registry.open(&rdf4j_config(TransactionMode::Immediate)).await {
        Ok(connection) => connection,
        Err(e) => {
            eprintln!("Skipping test - RDF4J not available: {e}");
            return;
        }
    };

    let objects = [object(301)];
    assert!(
        connection
            .add_relationships(SUBJECT, PREDICATE, &objects, Some(GRAPH))
            .await
    );
    assert!(
        connection
            .remove_relationships(SUBJECT, PREDICATE, &objects, None)
            .await
    );
    assert!(
        !connection
            .exists(Some(SUBJECT), Some(PREDICATE), Some(objects[0].as_str()))
            .await
            .unwrap()
    );
}
