//! Relationship batches: one subject, one predicate, many objects.
//!
//! Objects go through [`Term::parse`], so IRIs can be passed bare and
//! literals already rendered (`"\"text\""`).

use crate::{
    connection::Connection,
    error::Result,
    metrics,
    query::{SparqlQueryBuilder, Term, TriplePattern},
};

fn relationship_triples<S: AsRef<str>>(
    subject: &str,
    predicate: &str,
    objects: &[S],
) -> Vec<TriplePattern> {
    objects
        .iter()
        .map(|object| {
            TriplePattern::new(
                Term::parse(subject),
                Term::parse(predicate),
                Term::parse(object.as_ref()),
            )
        })
        .collect()
}

impl Connection {
    /// Insert `(subject, predicate, o)` for every `o` in `objects` as a single
    /// INSERT DATA, into `graph` when given.
    ///
    /// Returns false (and logs) when the store rejects the statement. An
    /// empty `objects` sends nothing and reports success.
    pub async fn add_relationships<S: AsRef<str>>(
        &mut self,
        subject: &str,
        predicate: &str,
        objects: &[S],
        graph: Option<&str>,
    ) -> bool {
        match self.try_add_relationships(subject, predicate, objects, graph).await {
            Ok(()) => true,
            Err(error) => {
                tracing::error!(
                    repository = %self.repository_id(),
                    subject,
                    predicate,
                    objects = objects.len(),
                    error = %error,
                    "Failed to insert relationships"
                );
                false
            }
        }
    }

    /// [`Connection::add_relationships`] keeping the error.
    pub async fn try_add_relationships<S: AsRef<str>>(
        &mut self,
        subject: &str,
        predicate: &str,
        objects: &[S],
        graph: Option<&str>,
    ) -> Result<()> {
        if objects.is_empty() {
            metrics::record_dao_operation("add_relationships", "empty");
            return Ok(());
        }

        let triples = relationship_triples(subject, predicate, objects);
        let result = match SparqlQueryBuilder::build_insert(graph, &triples) {
            Ok(statement) => self.update(statement).await,
            Err(error) => Err(error),
        };
        metrics::record_dao_operation(
            "add_relationships",
            if result.is_ok() { "ok" } else { "failed" },
        );
        result
    }

    /// Delete `(subject, predicate, o)` for every `o` in `objects` with one
    /// DELETE WHERE over their conjunction, scoped to `graph` when given and
    /// reaching every graph otherwise.
    ///
    /// If any of the triples is missing the pattern matches nothing and the
    /// store is left untouched. Returns false (and logs) when the store
    /// rejects the statement.
    pub async fn remove_relationships<S: AsRef<str>>(
        &mut self,
        subject: &str,
        predicate: &str,
        objects: &[S],
        graph: Option<&str>,
    ) -> bool {
        match self
            .try_remove_relationships(subject, predicate, objects, graph)
            .await
        {
            Ok(()) => true,
            Err(error) => {
                tracing::error!(
                    repository = %self.repository_id(),
                    subject,
                    predicate,
                    objects = objects.len(),
                    error = %error,
                    "Failed to delete relationships"
                );
                false
            }
        }
    }

    /// [`Connection::remove_relationships`] keeping the error.
    pub async fn try_remove_relationships<S: AsRef<str>>(
        &mut self,
        subject: &str,
        predicate: &str,
        objects: &[S],
        graph: Option<&str>,
    ) -> Result<()> {
        if objects.is_empty() {
            metrics::record_dao_operation("remove_relationships", "empty");
            return Ok(());
        }

        let triples = relationship_triples(subject, predicate, objects);
        let result = match SparqlQueryBuilder::build_delete_where(graph, &triples) {
            Ok(statement) => self.update(statement).await,
            Err(error) => Err(error),
        };
        metrics::record_dao_operation(
            "remove_relationships",
            if result.is_ok() { "ok" } else { "failed" },
        );
        result
    }
}
