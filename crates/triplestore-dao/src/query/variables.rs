//! SPARQL variable names shared by entity DAOs.
//!
//! Using the same names everywhere lets result rows be read with the same
//! keys regardless of which DAO built the query.

/// Resource identifier of the listed entity
pub const URI: &str = "uri";

/// `rdf:type` of the listed entity
pub const RDF_TYPE: &str = "rdfType";

pub const LABEL: &str = "label";

pub const COMMENT: &str = "comment";

/// Alias of `COUNT(...)` projections
pub const COUNT: &str = "count";

/// Object binding of single-value lookups
pub const VALUE: &str = "x";
