//! SPARQL statement construction.
//!
//! The builder only assembles text. IRIs are wrapped in angle brackets
//! without validation, so a malformed IRI surfaces when the store evaluates
//! the statement.

use std::fmt;

use super::term::{Term, TriplePattern};
use crate::error::{Result, TripleStoreError};

/// Query form of a rendered statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Ask,
    Update,
}

/// Fully rendered statement, ready to hand to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    kind: StatementKind,
    text: String,
}

impl Statement {
    pub(crate) fn new(kind: StatementKind, text: String) -> Self {
        Self { kind, text }
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub(crate) fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Clone)]
enum Projection {
    /// `SELECT *`
    All,
    Variables(Vec<String>),
    Count { variable: String, alias: String },
}

#[derive(Debug, Clone)]
enum Form {
    Select { projection: Projection, distinct: bool },
    Ask { body: Option<String> },
}

/// Incremental builder for SELECT and ASK queries, plus the associated
/// INSERT DATA / DELETE WHERE constructors.
#[derive(Debug, Clone, Default)]
pub struct SparqlQueryBuilder {
    form: Option<Form>,
    patterns: Vec<TriplePattern>,
    clauses: Vec<String>,
    order_by: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl SparqlQueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the projection. `None` selects every variable of the pattern.
    pub fn select(&mut self, variables: Option<&[&str]>) -> &mut Self {
        let projection = match variables {
            None => Projection::All,
            Some(variables) => Projection::Variables(
                variables
                    .iter()
                    .map(|name| name.trim_start_matches('?').to_string())
                    .collect(),
            ),
        };
        self.form = Some(Form::Select {
            projection,
            distinct: self.is_distinct(),
        });
        self
    }

    /// `SELECT (COUNT(DISTINCT ?variable) AS ?alias)`
    pub fn select_count(&mut self, variable: &str, alias: &str) -> &mut Self {
        self.form = Some(Form::Select {
            projection: Projection::Count {
                variable: variable.trim_start_matches('?').to_string(),
                alias: alias.trim_start_matches('?').to_string(),
            },
            distinct: self.is_distinct(),
        });
        self
    }

    pub fn distinct(&mut self) -> &mut Self {
        match &mut self.form {
            Some(Form::Select { distinct, .. }) => *distinct = true,
            _ => {
                self.form = Some(Form::Select {
                    projection: Projection::All,
                    distinct: true,
                })
            }
        }
        self
    }

    fn is_distinct(&self) -> bool {
        matches!(self.form, Some(Form::Select { distinct: true, .. }))
    }

    /// Append one pattern line. A `None` position becomes a fresh variable
    /// named after its position (`?s`, `?p`, `?o`, then `?s1`, `?p1`, ...).
    pub fn add_triple_pattern(
        &mut self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
        graph: Option<&str>,
    ) -> &mut Self {
        let suffix = match self.patterns.len() {
            0 => String::new(),
            index => index.to_string(),
        };
        let position = |value: Option<&str>, name: &str| match value {
            Some(value) => Term::parse(value),
            None => Term::variable(format!("{name}{suffix}")),
        };

        let pattern = TriplePattern {
            subject: position(subject, "s"),
            predicate: position(predicate, "p"),
            object: position(object, "o"),
            graph: graph.map(str::to_string),
        };
        self.add_pattern(pattern)
    }

    pub fn add_pattern(&mut self, pattern: TriplePattern) -> &mut Self {
        self.patterns.push(pattern);
        self
    }

    /// Turn the statement into a boolean ASK around `body`, which may hold
    /// several patterns joined with UNION.
    pub fn add_ask(&mut self, body: &str) -> &mut Self {
        self.form = Some(Form::Ask {
            body: Some(body.trim_end().to_string()),
        });
        self
    }

    /// ASK over the patterns added so far
    pub fn ask(&mut self) -> &mut Self {
        self.form = Some(Form::Ask { body: None });
        self
    }

    /// `FILTER (expression)`
    pub fn add_filter(&mut self, expression: &str) -> &mut Self {
        self.clauses.push(format!("FILTER ({expression})"));
        self
    }

    /// `VALUES ?variable { v1 v2 ... }`
    pub fn add_values(&mut self, variable: &str, values: &[&str]) -> &mut Self {
        let rendered: Vec<String> = values.iter().map(|v| Term::parse(v).to_string()).collect();
        self.clauses.push(format!(
            "VALUES {} {{ {} }}",
            Term::variable(variable),
            rendered.join(" ")
        ));
        self
    }

    pub fn order_by(&mut self, variable: &str) -> &mut Self {
        self.order_by.push(Term::variable(variable).to_string());
        self
    }

    pub fn add_limit(&mut self, limit: u64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn add_offset(&mut self, offset: u64) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    fn write_where_body(&self, out: &mut String) {
        for pattern in &self.patterns {
            out.push_str(&format!("  {pattern}\n"));
        }
        for clause in &self.clauses {
            out.push_str(&format!("  {clause}\n"));
        }
    }

    fn write_modifiers(&self, out: &mut String) {
        if !self.order_by.is_empty() {
            out.push_str(&format!("ORDER BY {}\n", self.order_by.join(" ")));
        }
        if let Some(limit) = self.limit {
            out.push_str(&format!("LIMIT {limit}\n"));
        }
        if let Some(offset) = self.offset {
            out.push_str(&format!("OFFSET {offset}\n"));
        }
    }

    /// Render the final statement text.
    pub fn render(&self) -> Result<Statement> {
        let form = self
            .form
            .as_ref()
            .ok_or_else(|| TripleStoreError::query_build("no query form (SELECT or ASK) declared"))?;

        let mut out = String::new();
        match form {
            Form::Select {
                projection,
                distinct,
            } => {
                if self.patterns.is_empty() && self.clauses.is_empty() {
                    return Err(TripleStoreError::query_build("SELECT without any pattern"));
                }
                out.push_str("SELECT ");
                if *distinct {
                    out.push_str("DISTINCT ");
                }
                match projection {
                    Projection::All => out.push('*'),
                    Projection::Variables(variables) if variables.is_empty() => out.push('*'),
                    Projection::Variables(variables) => {
                        let rendered: Vec<String> =
                            variables.iter().map(|v| format!("?{v}")).collect();
                        out.push_str(&rendered.join(" "));
                    }
                    Projection::Count { variable, alias } => {
                        out.push_str(&format!("(COUNT(DISTINCT ?{variable}) AS ?{alias})"));
                    }
                }
                out.push_str("\nWHERE {\n");
                self.write_where_body(&mut out);
                out.push_str("}\n");
                self.write_modifiers(&mut out);
                Ok(Statement::new(StatementKind::Select, out))
            }
            Form::Ask { body } => {
                if body.is_none() && self.patterns.is_empty() && self.clauses.is_empty() {
                    return Err(TripleStoreError::query_build("ASK without any pattern"));
                }
                out.push_str("ASK {\n");
                if let Some(body) = body {
                    out.push_str(&format!("  {body}\n"));
                }
                self.write_where_body(&mut out);
                out.push_str("}\n");
                Ok(Statement::new(StatementKind::Ask, out))
            }
        }
    }

    /// One INSERT DATA statement covering every triple, optionally scoped to
    /// one graph.
    pub fn build_insert(graph: Option<&str>, triples: &[TriplePattern]) -> Result<Statement> {
        if triples.is_empty() {
            return Err(TripleStoreError::query_build("INSERT DATA without triples"));
        }
        if let Some(open) = triples.iter().find(|triple| !triple.is_ground()) {
            return Err(TripleStoreError::query_build(format!(
                "INSERT DATA cannot contain variables: {}",
                open.render_triple()
            )));
        }

        let mut out = String::from("INSERT DATA {\n");
        write_block(&mut out, graph.map(Term::parse).as_ref(), triples);
        out.push_str("}\n");
        Ok(Statement::new(StatementKind::Update, out))
    }

    /// One DELETE WHERE statement whose pattern is the conjunction of every
    /// triple: nothing is removed unless all of them match.
    ///
    /// Without a graph the triples are removed from the default graph and
    /// from every named graph holding all of them, since a plain DELETE WHERE
    /// only reaches the default graph on some stores.
    pub fn build_delete_where(graph: Option<&str>, triples: &[TriplePattern]) -> Result<Statement> {
        if triples.is_empty() {
            return Err(TripleStoreError::query_build("DELETE WHERE without triples"));
        }

        let mut out = String::new();
        match graph {
            Some(graph) => {
                out.push_str("DELETE WHERE {\n");
                write_block(&mut out, Some(&Term::parse(graph)), triples);
                out.push_str("}\n");
            }
            None => {
                let any_graph = Term::variable(ANY_GRAPH);
                out.push_str("DELETE {\n");
                write_block(&mut out, Some(&any_graph), triples);
                out.push_str("}\nWHERE {\n");
                write_block(&mut out, Some(&any_graph), triples);
                out.push_str("} ;\nDELETE WHERE {\n");
                write_block(&mut out, None, triples);
                out.push_str("}\n");
            }
        }
        Ok(Statement::new(StatementKind::Update, out))
    }
}

/// Variable standing for the graph of an unscoped delete
const ANY_GRAPH: &str = "deleteGraph";

/// Triple lines, wrapped in `GRAPH g { ... }` when a graph is given.
fn write_block(out: &mut String, graph: Option<&Term>, triples: &[TriplePattern]) {
    match graph {
        Some(graph) => {
            out.push_str(&format!("  GRAPH {graph} {{\n"));
            for triple in triples {
                out.push_str(&format!("    {}\n", triple.render_triple()));
            }
            out.push_str("  }\n");
        }
        None => {
            for triple in triples {
                out.push_str(&format!("  {}\n", triple.render_triple()));
            }
        }
    }
}
