mod builder;
mod term;
pub mod variables;

pub use builder::{SparqlQueryBuilder, Statement, StatementKind};
pub use term::{Term, TriplePattern};
