use std::fmt::{self, Write as _};

/// One position of a triple pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// IRI, rendered `<value>`
    Iri(String),
    /// Plain literal, rendered `"value"` with quotes, backslashes and line
    /// breaks escaped
    Literal(String),
    /// Unbound query variable, rendered `?name`
    Variable(String),
    /// Already rendered fragment (typed literal, blank node, prefixed name)
    Raw(String),
}

impl Term {
    pub fn iri(value: impl Into<String>) -> Self {
        Term::Iri(value.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal(value.into())
    }

    pub fn variable(name: impl AsRef<str>) -> Self {
        Term::Variable(name.as_ref().trim_start_matches('?').to_string())
    }

    /// Interpret a caller-supplied string.
    ///
    /// `?x` is a variable, `<...>` an IRI, anything starting with `"` or `_:`
    /// is taken as already rendered, and every other string is an IRI.
    pub fn parse(value: &str) -> Self {
        if let Some(name) = value.strip_prefix('?') {
            Term::Variable(name.to_string())
        } else if let Some(inner) = value
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
        {
            Term::Iri(inner.to_string())
        } else if value.starts_with('"') || value.starts_with("_:") {
            Term::Raw(value.to_string())
        } else {
            Term::Iri(value.to_string())
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(value) => write!(f, "<{value}>"),
            Term::Literal(value) => {
                f.write_str("\"")?;
                for c in value.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        c => f.write_char(c)?,
                    }
                }
                f.write_str("\"")
            }
            Term::Variable(name) => write!(f, "?{name}"),
            Term::Raw(fragment) => f.write_str(fragment),
        }
    }
}

impl From<&str> for Term {
    fn from(value: &str) -> Self {
        Term::parse(value)
    }
}

/// (subject, predicate, object) with an optional graph scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriplePattern {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
    pub graph: Option<String>,
}

impl TriplePattern {
    pub fn new(subject: impl Into<Term>, predicate: impl Into<Term>, object: impl Into<Term>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            graph: None,
        }
    }

    pub fn in_graph(mut self, graph: impl Into<String>) -> Self {
        self.graph = Some(graph.into());
        self
    }

    /// True when no position is a variable.
    pub fn is_ground(&self) -> bool {
        !(self.subject.is_variable() || self.predicate.is_variable() || self.object.is_variable())
    }

    /// `s p o .` without graph wrapping
    pub(crate) fn render_triple(&self) -> String {
        format!("{} {} {} .", self.subject, self.predicate, self.object)
    }
}

impl fmt::Display for TriplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.graph {
            Some(graph) => write!(f, "GRAPH {} {{ {} }}", Term::parse(graph), self.render_triple()),
            None => f.write_str(&self.render_triple()),
        }
    }
}
