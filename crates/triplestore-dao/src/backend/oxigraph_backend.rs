use std::{path::Path, time::Duration};

use async_trait::async_trait;
use oxigraph::{
    model::Term,
    sparql::{PreparedSparqlQuery, QueryResults, SparqlEvaluator},
    store::Store,
};

use super::{SelectResult, SelectRow, SelectValue, TripleStoreBackend};
use crate::error::{Result, TripleStoreError};

/// Oxigraph embedded triple store backend
///
/// Queries see the union of all named graphs as their default graph, the
/// way an RDF4J repository evaluates queries without a dataset clause.
pub struct OxigraphBackend {
    store: Store,
}

impl OxigraphBackend {
    /// Create a new Oxigraph backend with persistent storage
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let store = Store::open(&path).map_err(|e| {
            TripleStoreError::Other(format!("Failed to open Oxigraph store: {}", e))
        })?;

        tracing::info!(
            path = %path.as_ref().display(),
            "Opened Oxigraph persistent store"
        );

        Ok(Self { store })
    }

    /// Create a new in-memory Oxigraph backend
    pub fn in_memory() -> Result<Self> {
        let store = Store::new().map_err(|e| {
            TripleStoreError::Other(format!("Failed to create in-memory Oxigraph store: {}", e))
        })?;

        tracing::info!("Created in-memory Oxigraph store");

        Ok(Self { store })
    }

    /// Number of quads currently held, across all graphs
    pub fn len(&self) -> Result<usize> {
        self.store
            .len()
            .map_err(|e| TripleStoreError::Other(format!("Failed to count quads: {}", e)))
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn prepare_query(query: &str, form: &str) -> Result<PreparedSparqlQuery> {
        let mut prepared = SparqlEvaluator::new().parse_query(query).map_err(|e| {
            TripleStoreError::Evaluation {
                reason: format!("Failed to parse SPARQL {form}: {e}"),
            }
        })?;
        prepared.dataset_mut().set_default_graph_as_union();
        Ok(prepared)
    }
}

fn select_value(term: &Term) -> SelectValue {
    match term {
        Term::NamedNode(node) => SelectValue::Uri(node.as_str().to_string()),
        Term::BlankNode(node) => SelectValue::BlankNode(node.as_str().to_string()),
        Term::Literal(literal) => SelectValue::Literal {
            value: literal.value().to_string(),
            datatype: Some(literal.datatype().as_str().to_string()),
            language: literal.language().map(str::to_string),
        },
        #[allow(unreachable_patterns)]
        other => SelectValue::Literal {
            value: other.to_string(),
            datatype: None,
            language: None,
        },
    }
}

#[async_trait]
impl TripleStoreBackend for OxigraphBackend {
    fn name(&self) -> &'static str {
        "oxigraph"
    }

    async fn health_check(&self) -> Result<bool> {
        // Embedded: a working store answers a trivial ASK
        let result = Self::prepare_query("ASK { ?s ?p ?o }", "ASK")?
            .on_store(&self.store)
            .execute()
            .map_err(|e| TripleStoreError::Other(format!("Health check query failed: {}", e)))?;

        match result {
            QueryResults::Boolean(_) => Ok(true),
            _ => Ok(false),
        }
    }

    async fn repository_exists(&self) -> Result<bool> {
        // The opened store is the repository
        Ok(true)
    }

    async fn create_repository(&self) -> Result<()> {
        Ok(())
    }

    async fn update(&self, query: &str, _timeout: Duration) -> Result<()> {
        let prepared = SparqlEvaluator::new().parse_update(query).map_err(|e| {
            TripleStoreError::Evaluation {
                reason: format!("Failed to parse SPARQL UPDATE: {}", e),
            }
        })?;

        // Execute on blocking thread pool since Oxigraph's update may involve disk I/O
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || {
            prepared
                .on_store(&store)
                .execute()
                .map_err(|e| TripleStoreError::Evaluation {
                    reason: format!("SPARQL UPDATE failed: {}", e),
                })
        })
        .await
        .map_err(|e| TripleStoreError::Other(format!("Task join error: {}", e)))??;

        Ok(())
    }

    async fn ask(&self, query: &str, _timeout: Duration) -> Result<bool> {
        let prepared = Self::prepare_query(query, "ASK")?;

        let store = self.store.clone();
        tokio::task::spawn_blocking(move || {
            let result = prepared.on_store(&store).execute().map_err(|e| {
                TripleStoreError::Evaluation {
                    reason: format!("SPARQL ASK failed: {}", e),
                }
            })?;

            match result {
                QueryResults::Boolean(value) => Ok(value),
                _ => Err(TripleStoreError::Evaluation {
                    reason: "Expected ASK to return boolean result".to_string(),
                }),
            }
        })
        .await
        .map_err(|e| TripleStoreError::Other(format!("Task join error: {}", e)))?
    }

    async fn select(&self, query: &str, _timeout: Duration) -> Result<SelectResult> {
        let prepared = Self::prepare_query(query, "SELECT")?;

        let store = self.store.clone();
        tokio::task::spawn_blocking(move || {
            let result = prepared.on_store(&store).execute().map_err(|e| {
                TripleStoreError::Evaluation {
                    reason: format!("SPARQL SELECT failed: {}", e),
                }
            })?;

            match result {
                QueryResults::Solutions(solutions) => {
                    let variables = solutions
                        .variables()
                        .iter()
                        .map(|variable| variable.as_str().to_string())
                        .collect();

                    let mut rows = Vec::new();
                    for solution in solutions {
                        let solution = solution.map_err(|e| TripleStoreError::Evaluation {
                            reason: format!("Failed to read solution: {}", e),
                        })?;
                        let bindings = solution
                            .iter()
                            .map(|(variable, term)| {
                                (variable.as_str().to_string(), select_value(term))
                            })
                            .collect();
                        rows.push(SelectRow { bindings });
                    }

                    Ok(SelectResult { variables, rows })
                }
                _ => Err(TripleStoreError::Evaluation {
                    reason: "Expected SELECT to return solutions".to_string(),
                }),
            }
        })
        .await
        .map_err(|e| TripleStoreError::Other(format!("Task join error: {}", e)))?
    }
}
