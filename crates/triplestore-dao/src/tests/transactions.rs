#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use super::{PREDICATE, RejectingBackend, SUBJECT, object, oxigraph_config};
use crate::{
    Connection, RepositoryHandle, RepositoryRegistry, RollbackOutcome, TransactionMode,
    TripleStoreDao, TripleStoreError,
};

struct VarietyDao {
    connection: Connection,
}

impl TripleStoreDao for VarietyDao {
    fn connection(&self) -> &Connection {
        &self.connection
    }

    fn connection_mut(&mut self) -> &mut Connection {
        &mut self.connection
    }
}

async fn variety_exists(connection: &Connection, index: usize) -> bool {
    connection
        .exists(Some(SUBJECT), Some(PREDICATE), Some(object(index).as_str()))
        .await
        .unwrap()
}

#[tokio::test]
async fn buffered_statements_are_invisible_until_commit() {
    let registry = RepositoryRegistry::new();
    let config = oxigraph_config("buffered-commit", TransactionMode::Buffered);
    let mut writer = registry.open(&config).await.unwrap();
    let reader = registry.open(&config).await.unwrap();

    writer.begin().unwrap();
    assert!(writer.in_transaction());
    assert!(
        writer
            .add_relationships(SUBJECT, PREDICATE, &[object(1), object(2)], None)
            .await
    );
    assert!(
        writer
            .add_relationships(SUBJECT, PREDICATE, &[object(3)], None)
            .await
    );
    assert!(!variety_exists(&reader, 1).await);
    assert!(!variety_exists(&writer, 3).await);

    assert_eq!(writer.commit().await.unwrap(), 2);
    assert!(!writer.in_transaction());
    assert!(variety_exists(&reader, 1).await);
    assert!(variety_exists(&reader, 2).await);
    assert!(variety_exists(&reader, 3).await);
}

#[tokio::test]
async fn buffered_rollback_leaves_store_unchanged() {
    let registry = RepositoryRegistry::new();
    let config = oxigraph_config("buffered-rollback", TransactionMode::Buffered);
    let mut connection = registry.open(&config).await.unwrap();
    assert!(
        connection
            .add_relationships(SUBJECT, PREDICATE, &[object(1)], None)
            .await
    );

    connection.begin().unwrap();
    assert!(
        connection
            .remove_relationships(SUBJECT, PREDICATE, &[object(1)], None)
            .await
    );
    assert!(
        connection
            .add_relationships(SUBJECT, PREDICATE, &[object(2)], None)
            .await
    );

    let outcome = connection.rollback().await.unwrap();
    assert_eq!(
        outcome,
        RollbackOutcome {
            discarded: 2,
            already_applied: 0,
        }
    );
    assert!(variety_exists(&connection, 1).await);
    assert!(!variety_exists(&connection, 2).await);
}

#[tokio::test]
async fn immediate_statements_apply_at_once() {
    let registry = RepositoryRegistry::new();
    let config = oxigraph_config("immediate", TransactionMode::Immediate);
    let mut connection = registry.open(&config).await.unwrap();
    assert!(!connection.transaction_mode().rollback_is_atomic());

    connection.begin().unwrap();
    assert!(
        connection
            .add_relationships(SUBJECT, PREDICATE, &[object(1)], None)
            .await
    );
    assert!(variety_exists(&connection, 1).await);

    let outcome = connection.rollback().await.unwrap();
    assert_eq!(outcome.already_applied, 1);
    assert_eq!(outcome.discarded, 0);
    assert!(variety_exists(&connection, 1).await);

    connection.begin().unwrap();
    assert!(
        connection
            .add_relationships(SUBJECT, PREDICATE, &[object(2)], None)
            .await
    );
    assert_eq!(connection.commit().await.unwrap(), 1);
}

#[tokio::test]
async fn lifecycle_misuse_is_a_transaction_error() {
    let registry = RepositoryRegistry::new();
    let config = oxigraph_config("misuse", TransactionMode::Buffered);
    let mut connection = registry.open(&config).await.unwrap();

    assert!(matches!(
        connection.commit().await,
        Err(TripleStoreError::Transaction { .. })
    ));
    assert!(matches!(
        connection.rollback().await,
        Err(TripleStoreError::Transaction { .. })
    ));

    connection.begin().unwrap();
    assert!(matches!(
        connection.begin(),
        Err(TripleStoreError::Transaction { .. })
    ));

    connection.close();
    assert!(!connection.in_transaction());
    assert!(matches!(
        connection.begin(),
        Err(TripleStoreError::Transaction { .. })
    ));
}

#[tokio::test]
async fn closing_discards_queued_statements() {
    let registry = RepositoryRegistry::new();
    let config = oxigraph_config("close-discards", TransactionMode::Buffered);
    let mut connection = registry.open(&config).await.unwrap();

    connection.begin().unwrap();
    assert!(
        connection
            .add_relationships(SUBJECT, PREDICATE, &[object(1)], None)
            .await
    );
    connection.close();

    let reader = registry.open(&config).await.unwrap();
    assert!(!variety_exists(&reader, 1).await);
}

#[tokio::test]
async fn dao_lifecycle_goes_through_the_connection() {
    let registry = RepositoryRegistry::new();
    let config = oxigraph_config("dao-lifecycle", TransactionMode::Buffered);
    let mut dao = VarietyDao {
        connection: registry.open(&config).await.unwrap(),
    };

    dao.init_connection().unwrap();
    dao.start_transaction();
    assert!(
        dao.connection_mut()
            .add_relationships(SUBJECT, PREDICATE, &[object(1)], None)
            .await
    );
    assert_eq!(dao.commit_transaction().await.unwrap(), 1);
    assert!(variety_exists(dao.connection(), 1).await);

    dao.init_connection().unwrap();
    assert_eq!(dao.rollback_transaction().await.unwrap().discarded, 0);

    dao.close_connection();
    assert!(dao.connection().is_closed());
}

#[tokio::test]
async fn failed_buffered_commit_closes_the_transaction() {
    let config = oxigraph_config("rejecting", TransactionMode::Buffered);
    let handle = RepositoryHandle::from_backend(Box::new(RejectingBackend), config);
    let mut connection = Connection::from_handle(Arc::new(handle));

    connection.begin().unwrap();
    assert!(
        connection
            .add_relationships(SUBJECT, PREDICATE, &[object(1)], None)
            .await
    );

    let error = connection.commit().await.err().unwrap();
    assert!(matches!(error, TripleStoreError::MutationExecution { .. }));
    assert!(!connection.in_transaction());
}
