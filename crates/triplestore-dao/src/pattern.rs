//! Existence checks and single-value lookups.

use crate::{
    backend::SelectRow,
    connection::Connection,
    error::Result,
    metrics,
    query::{SparqlQueryBuilder, Term, variables},
};

impl Connection {
    /// True iff at least one triple matches. A `None` position matches
    /// anything.
    ///
    /// Not finding anything is `Ok(false)`; store failures are errors.
    pub async fn exists(
        &self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
    ) -> Result<bool> {
        let mut query = SparqlQueryBuilder::new();
        query.select(None);
        query.add_triple_pattern(subject, predicate, object, None);
        query.add_limit(1);

        let result = self.select(&query.render()?).await;
        let found = result.map(|rows| !rows.is_empty());
        metrics::record_dao_operation("exists", outcome_label(&found));
        found
    }

    /// True iff `identifier` occurs as subject, predicate or object of any
    /// triple.
    ///
    /// A failing query also yields `false` (after a warning), so callers
    /// cannot tell a missing identifier from a store error here; use
    /// [`Connection::exists_identifier_checked`] when that matters.
    pub async fn exists_identifier(&self, identifier: &str) -> bool {
        if identifier.is_empty() {
            return false;
        }

        match self.exists_identifier_checked(identifier).await {
            Ok(found) => found,
            Err(error) => {
                metrics::record_dao_operation("exists_identifier", "degraded");
                tracing::warn!(
                    repository = %self.repository_id(),
                    identifier,
                    error = %error,
                    "Identifier existence query failed; reporting absent"
                );
                false
            }
        }
    }

    /// Same as [`Connection::exists_identifier`] but keeps store errors.
    pub async fn exists_identifier_checked(&self, identifier: &str) -> Result<bool> {
        // rdf, rdfs and owl vocabularies only count if they are loaded in the store
        let mut query = SparqlQueryBuilder::new();
        let identifier = Term::parse(identifier);
        query.add_ask(&format!(
            "VALUES (?r) {{ ({identifier}) }}\n  \
             {{ ?r ?p ?o }}\n  \
             UNION\n  \
             {{ ?s ?r ?o }}\n  \
             UNION\n  \
             {{ ?s ?p ?r }}"
        ));

        let found = self.ask(&query.render()?).await;
        metrics::record_dao_operation("exists_identifier", outcome_label(&found));
        found
    }

    /// First value bound to the object of `(subject, predicate, ?x)`.
    ///
    /// `Ok(None)` when either argument is absent or nothing matches. Only
    /// one value is returned even if several triples match.
    pub async fn lookup_single_value(
        &self,
        subject: Option<&str>,
        predicate: Option<&str>,
    ) -> Result<Option<String>> {
        let (Some(subject), Some(predicate)) = (subject, predicate) else {
            return Ok(None);
        };

        let object = format!("?{}", variables::VALUE);
        let mut query = SparqlQueryBuilder::new();
        query.select(Some(&[variables::VALUE][..]));
        query.add_triple_pattern(Some(subject), Some(predicate), Some(&object), None);
        query.add_limit(1);

        let result = self.select(&query.render()?).await?;
        let value = result.first_str(variables::VALUE).map(str::to_string);
        tracing::trace!(value = ?value, "Single value lookup");
        metrics::record_dao_operation(
            "lookup_single_value",
            if value.is_some() { "found" } else { "not_found" },
        );
        Ok(value)
    }
}

/// String value of `variable` in `row`, if bound.
pub fn string_value(row: &SelectRow, variable: &str) -> Option<String> {
    row.get_str(variable).map(str::to_string)
}

fn outcome_label(result: &Result<bool>) -> &'static str {
    match result {
        Ok(true) => "found",
        Ok(false) => "not_found",
        Err(_) => "failed",
    }
}
