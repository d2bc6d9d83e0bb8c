mod oxigraph_backend;
mod rdf4j;

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
pub use oxigraph_backend::OxigraphBackend;
pub use rdf4j::Rdf4jBackend;

use crate::error::Result;

/// Value from a SPARQL SELECT binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectValue {
    /// URI/IRI value
    Uri(String),
    /// Literal value with optional datatype and language tag
    Literal {
        value: String,
        datatype: Option<String>,
        language: Option<String>,
    },
    /// Blank node
    BlankNode(String),
}

impl SelectValue {
    /// Get the string value regardless of type
    pub fn as_str(&self) -> &str {
        match self {
            Self::Uri(s) | Self::BlankNode(s) => s,
            Self::Literal { value, .. } => value,
        }
    }
}

/// A row from a SPARQL SELECT query result
#[derive(Debug, Clone, Default)]
pub struct SelectRow {
    pub bindings: HashMap<String, SelectValue>,
}

impl SelectRow {
    /// Get a binding value by variable name
    pub fn get(&self, var: &str) -> Option<&SelectValue> {
        self.bindings.get(var.trim_start_matches('?'))
    }

    /// Get a binding value as a string
    pub fn get_str(&self, var: &str) -> Option<&str> {
        self.get(var).map(SelectValue::as_str)
    }
}

/// Result from a SPARQL SELECT query
#[derive(Debug, Clone, Default)]
pub struct SelectResult {
    pub variables: Vec<String>,
    pub rows: Vec<SelectRow>,
}

impl SelectResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First bound value of `var`, if any row binds it.
    pub fn first_str(&self, var: &str) -> Option<&str> {
        self.rows.iter().find_map(|row| row.get_str(var))
    }
}

/// Trait for triple store backends
///
/// Implementations provide the low-level SPARQL execution against
/// specific triple store systems (RDF4J servers, embedded Oxigraph)
#[async_trait]
pub trait TripleStoreBackend: Send + Sync {
    /// Backend name for logging/debugging
    fn name(&self) -> &'static str;

    /// Health check - verify the triple store is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Check if the configured repository exists
    async fn repository_exists(&self) -> Result<bool>;

    /// Create the repository, for backends that can
    async fn create_repository(&self) -> Result<()>;

    /// Execute a SPARQL UPDATE (INSERT DATA / DELETE WHERE, possibly several
    /// operations separated by `;`)
    async fn update(&self, query: &str, timeout: Duration) -> Result<()>;

    /// Execute a SPARQL ASK query
    async fn ask(&self, query: &str, timeout: Duration) -> Result<bool>;

    /// Execute a SPARQL SELECT query
    async fn select(&self, query: &str, timeout: Duration) -> Result<SelectResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_row_lookup_accepts_question_mark() {
        let mut row = SelectRow::default();
        row.bindings.insert(
            "label".to_string(),
            SelectValue::Literal {
                value: "Drought".to_string(),
                datatype: None,
                language: Some("en".to_string()),
            },
        );

        assert_eq!(row.get_str("label"), Some("Drought"));
        assert_eq!(row.get_str("?label"), Some("Drought"));
        assert_eq!(row.get_str("uri"), None);
    }

    #[test]
    fn first_str_skips_unbound_rows() {
        let mut bound = SelectRow::default();
        bound.bindings.insert(
            "x".to_string(),
            SelectValue::Uri("http://example.org/a".to_string()),
        );
        let result = SelectResult {
            variables: vec!["x".to_string()],
            rows: vec![SelectRow::default(), bound],
        };

        assert_eq!(result.first_str("x"), Some("http://example.org/a"));
        assert!(!result.is_empty());
    }
}
