//! Project vocabulary.
//!
//! Projects are described with the OpenSILEX ontology, names with
//! `rdfs:label`.

pub const OESO: &str = "http://www.opensilex.org/vocabulary/oeso#";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

/// Class of every project resource
pub const PROJECT: &str = "http://www.opensilex.org/vocabulary/oeso#Project";

pub const HAS_ACRONYM: &str = "http://www.opensilex.org/vocabulary/oeso#hasShortname";

pub const HAS_SUBPROJECT_TYPE: &str =
    "http://www.opensilex.org/vocabulary/oeso#hasSubprojectType";

pub const HAS_FINANCIAL_FUNDING: &str =
    "http://www.opensilex.org/vocabulary/oeso#hasFinancialFunding";

pub const HAS_FINANCIAL_REFERENCE: &str =
    "http://www.opensilex.org/vocabulary/oeso#hasFinancialReference";

pub const START_DATE: &str = "http://www.opensilex.org/vocabulary/oeso#startDate";

pub const END_DATE: &str = "http://www.opensilex.org/vocabulary/oeso#endDate";

pub const HAS_KEYWORD: &str = "http://www.opensilex.org/vocabulary/oeso#hasKeyword";

pub const HAS_PARENT_PROJECT: &str = "http://www.opensilex.org/vocabulary/oeso#hasParentProject";

pub const HAS_WEBSITE: &str = "http://www.opensilex.org/vocabulary/oeso#hasWebsite";

/// Every predicate a project update rewrites
pub(crate) const PROJECT_PROPERTIES: [&str; 10] = [
    RDFS_LABEL,
    HAS_ACRONYM,
    HAS_SUBPROJECT_TYPE,
    HAS_FINANCIAL_FUNDING,
    HAS_FINANCIAL_REFERENCE,
    START_DATE,
    END_DATE,
    HAS_KEYWORD,
    HAS_PARENT_PROJECT,
    HAS_WEBSITE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_terms_share_the_ontology_namespace() {
        assert!(PROJECT.starts_with(OESO));
        assert!(
            PROJECT_PROPERTIES
                .iter()
                .filter(|predicate| **predicate != RDFS_LABEL)
                .all(|predicate| predicate.starts_with(OESO))
        );
    }
}
