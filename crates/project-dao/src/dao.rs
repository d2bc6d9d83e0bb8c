use std::collections::{HashMap, HashSet};

use hyper::StatusCode;
use serde::{Deserialize, Serialize};
use triplestore_dao::{
    Connection, Pagination, PaginationConfig, RepositoryRegistry, Result, SparqlQueryBuilder,
    Statement, Term, TripleStoreConfig, TripleStoreDao, TriplePattern, query::variables,
    string_value,
};
use triplestore_observability::record_entity_write;

use crate::{
    model::{Project, ProjectDetails, ProjectFilter},
    result::{PostResult, ResultStatus},
    vocabulary,
};

const ENTITY: &str = "project";

/// Where project resources live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectDaoConfig {
    /// Base of generated project URIs: `{namespace}/id/project/{acronym}`
    pub namespace: String,
    /// Named graph holding every project triple
    pub graph: String,
}

impl Default for ProjectDaoConfig {
    fn default() -> Self {
        Self {
            namespace: "http://www.phenome-fppn.fr/diaphen".to_string(),
            graph: "http://www.phenome-fppn.fr/diaphen/set/projects".to_string(),
        }
    }
}

/// Projects stored in one repository.
///
/// Search criteria and paging are set on the DAO before calling
/// [`ProjectDao::count`] or [`ProjectDao::all_paginate`].
pub struct ProjectDao {
    connection: Connection,
    config: ProjectDaoConfig,
    filter: ProjectFilter,
    pagination: Pagination,
}

impl ProjectDao {
    pub fn new(
        connection: Connection,
        config: ProjectDaoConfig,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            connection,
            config,
            filter: ProjectFilter::default(),
            pagination: Pagination::new(pagination),
        }
    }

    /// Open a DAO on the configured repository, or on `repository_id` of the
    /// same server when given.
    pub async fn open(
        registry: &RepositoryRegistry,
        store: &TripleStoreConfig,
        repository_id: Option<&str>,
        config: ProjectDaoConfig,
        pagination: PaginationConfig,
    ) -> Result<Self> {
        let connection = match repository_id {
            Some(repository_id) => registry.open_repository(store, repository_id).await?,
            None => registry.open(store).await?,
        };
        Ok(Self::new(connection, config, pagination))
    }

    /// Restrict every search to the project `uri`.
    pub fn for_project(mut self, uri: impl Into<String>) -> Self {
        self.filter.uri = Some(uri.into());
        self
    }

    pub fn filter(&self) -> &ProjectFilter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut ProjectFilter {
        &mut self.filter
    }

    pub fn set_filter(&mut self, filter: ProjectFilter) {
        self.filter = filter;
    }

    pub fn set_page(&mut self, page: i64) {
        self.pagination.set_page(page);
    }

    pub fn set_page_size(&mut self, page_size: i64) {
        self.pagination.set_page_size(page_size);
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// URI a new project with `acronym` is stored under.
    pub fn project_uri(&self, acronym: &str) -> String {
        let slug: String = acronym
            .trim()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '-'
                }
            })
            .collect();
        format!("{}/id/project/{slug}", self.config.namespace.trim_end_matches('/'))
    }

    fn search_query(&self) -> SparqlQueryBuilder {
        let mut query = SparqlQueryBuilder::new();
        query.add_triple_pattern(
            Some("?uri"),
            Some(vocabulary::RDF_TYPE),
            Some(vocabulary::PROJECT),
            None,
        );

        let filter = &self.filter;
        if let Some(uri) = &filter.uri {
            query.add_values(variables::URI, &[uri.as_str()]);
        }

        let text_filters = [
            (&filter.name, vocabulary::RDFS_LABEL, "name"),
            (&filter.acronym, vocabulary::HAS_ACRONYM, "acronym"),
            (&filter.subproject_type, vocabulary::HAS_SUBPROJECT_TYPE, "subprojectType"),
            (&filter.financial_support, vocabulary::HAS_FINANCIAL_FUNDING, "financialSupport"),
            (&filter.financial_name, vocabulary::HAS_FINANCIAL_REFERENCE, "financialName"),
            (&filter.keywords, vocabulary::HAS_KEYWORD, "keyword"),
        ];
        for (value, predicate, variable) in text_filters {
            if let Some(value) = value {
                let bound = format!("?{variable}");
                query
                    .add_triple_pattern(Some("?uri"), Some(predicate), Some(bound.as_str()), None)
                    .add_filter(&format!(
                        "contains(lcase(str(?{variable})), lcase({}))",
                        Term::literal(value.as_str())
                    ));
            }
        }

        let date_filters = [
            (&filter.date_start, vocabulary::START_DATE, "dateStart"),
            (&filter.date_end, vocabulary::END_DATE, "dateEnd"),
        ];
        for (value, predicate, variable) in date_filters {
            if let Some(value) = value {
                let bound = format!("?{variable}");
                query
                    .add_triple_pattern(Some("?uri"), Some(predicate), Some(bound.as_str()), None)
                    .add_filter(&format!(
                        "str(?{variable}) = {}",
                        Term::literal(value.as_str())
                    ));
            }
        }

        if let Some(parent) = &filter.parent_project {
            query.add_triple_pattern(
                Some("?uri"),
                Some(vocabulary::HAS_PARENT_PROJECT),
                Some(parent.as_str()),
                None,
            );
        }
        if let Some(website) = &filter.website {
            query.add_triple_pattern(
                Some("?uri"),
                Some(vocabulary::HAS_WEBSITE),
                Some(website.as_str()),
                None,
            );
        }

        query
    }

    /// Number of projects matching the filter, `None` when the store fails.
    pub async fn count(&self) -> Option<u64> {
        let mut query = self.search_query();
        query.select_count(variables::URI, variables::COUNT);

        let counted = match query.render() {
            Ok(statement) => self.connection.select(&statement).await,
            Err(error) => Err(error),
        };
        match counted {
            Ok(result) => {
                let count = result
                    .first_str(variables::COUNT)
                    .and_then(|count| count.parse().ok())
                    .unwrap_or(0);
                tracing::debug!(count, "Counted projects");
                Some(count)
            }
            Err(error) => {
                tracing::error!(error = %error, "Failed to count projects");
                None
            }
        }
    }

    /// Current page of projects matching the filter, ordered by URI. `None`
    /// when the store fails.
    pub async fn all_paginate(&self) -> Option<Vec<Project>> {
        match self.try_all_paginate().await {
            Ok(projects) => Some(projects),
            Err(error) => {
                tracing::error!(
                    page = self.pagination.effective_page(),
                    page_size = self.pagination.effective_page_size(),
                    error = %error,
                    "Failed to list projects"
                );
                None
            }
        }
    }

    async fn try_all_paginate(&self) -> Result<Vec<Project>> {
        let mut query = self.search_query();
        query
            .distinct()
            .select(Some(&[variables::URI][..]))
            .order_by(variables::URI);
        self.pagination.apply_to(&mut query);

        let page = self.connection.select(&query.render()?).await?;
        let uris: Vec<String> = page
            .rows
            .iter()
            .filter_map(|row| string_value(row, variables::URI))
            .collect();
        if uris.is_empty() {
            return Ok(Vec::new());
        }

        self.fetch_projects(&uris).await
    }

    /// Every stored property of `uris`, one project per URI in input order.
    async fn fetch_projects(&self, uris: &[String]) -> Result<Vec<Project>> {
        let uri_refs: Vec<&str> = uris.iter().map(String::as_str).collect();
        let mut query = SparqlQueryBuilder::new();
        query
            .select(Some(&[variables::URI, "p", "o"][..]))
            .add_triple_pattern(Some("?uri"), Some("?p"), Some("?o"), None)
            .add_values(variables::URI, &uri_refs);

        let result = self.connection.select(&query.render()?).await?;

        let mut projects: HashMap<&str, Project> = uris
            .iter()
            .map(|uri| {
                (
                    uri.as_str(),
                    Project {
                        uri: uri.clone(),
                        details: ProjectDetails::default(),
                    },
                )
            })
            .collect();

        for row in &result.rows {
            let (Some(uri), Some(predicate), Some(value)) = (
                row.get_str(variables::URI),
                row.get_str("p"),
                string_value(row, "o"),
            ) else {
                continue;
            };
            let Some(project) = projects.get_mut(uri) else {
                continue;
            };
            let details = &mut project.details;
            match predicate {
                vocabulary::RDFS_LABEL => details.name = value,
                vocabulary::HAS_ACRONYM => details.acronym = value,
                vocabulary::HAS_SUBPROJECT_TYPE => details.subproject_type = Some(value),
                vocabulary::HAS_FINANCIAL_FUNDING => details.financial_support = Some(value),
                vocabulary::HAS_FINANCIAL_REFERENCE => details.financial_name = Some(value),
                vocabulary::START_DATE => details.date_start = value,
                vocabulary::END_DATE => details.date_end = Some(value),
                vocabulary::HAS_KEYWORD => details.keywords.push(value),
                vocabulary::HAS_PARENT_PROJECT => details.parent_project = Some(value),
                vocabulary::HAS_WEBSITE => details.website = Some(value),
                _ => {}
            }
        }

        Ok(uris
            .iter()
            .filter_map(|uri| projects.remove(uri.as_str()))
            .map(|mut project| {
                project.details.keywords.sort();
                project
            })
            .collect())
    }

    fn property_triples(uri: &str, details: &ProjectDetails) -> Vec<TriplePattern> {
        let subject = Term::iri(uri);
        let mut triples = Vec::new();
        let mut push = |predicate: &str, object: Term| {
            triples.push(TriplePattern::new(subject.clone(), Term::iri(predicate), object));
        };

        push(vocabulary::RDFS_LABEL, Term::literal(details.name.as_str()));
        push(vocabulary::HAS_ACRONYM, Term::literal(details.acronym.as_str()));
        push(vocabulary::START_DATE, Term::literal(details.date_start.as_str()));
        let optional_literals = [
            (vocabulary::HAS_SUBPROJECT_TYPE, &details.subproject_type),
            (vocabulary::HAS_FINANCIAL_FUNDING, &details.financial_support),
            (vocabulary::HAS_FINANCIAL_REFERENCE, &details.financial_name),
            (vocabulary::END_DATE, &details.date_end),
        ];
        for (predicate, value) in optional_literals {
            if let Some(value) = value {
                push(predicate, Term::literal(value.as_str()));
            }
        }
        for keyword in &details.keywords {
            push(vocabulary::HAS_KEYWORD, Term::literal(keyword.as_str()));
        }
        if let Some(parent) = &details.parent_project {
            push(vocabulary::HAS_PARENT_PROJECT, Term::iri(parent.as_str()));
        }
        if let Some(website) = &details.website {
            push(vocabulary::HAS_WEBSITE, Term::iri(website.as_str()));
        }
        triples
    }

    /// Validate `projects`, reject duplicates, then insert them all.
    ///
    /// 400 when a project is invalid, 409 when its URI is already taken (in
    /// the store or earlier in the batch), 500 on store failure, 201 with
    /// the new URIs otherwise. Nothing is written unless every project
    /// passes the checks.
    pub async fn check_and_insert(&mut self, projects: &[ProjectDetails]) -> PostResult {
        let result = self.insert_checked(projects).await;
        record_entity_write(ENTITY, "insert", result.status.as_u16());
        result
    }

    async fn insert_checked(&mut self, projects: &[ProjectDetails]) -> PostResult {
        if projects.is_empty() {
            return PostResult::new(
                StatusCode::BAD_REQUEST,
                vec![ResultStatus::error("Request error", "Empty project(s) to add")],
            );
        }

        let invalid = invalid_statuses(projects.iter());
        if !invalid.is_empty() {
            return PostResult::new(StatusCode::BAD_REQUEST, invalid);
        }

        let mut conflicts = Vec::new();
        let mut seen = HashSet::new();
        let mut uris = Vec::with_capacity(projects.len());
        for project in projects {
            let uri = self.project_uri(&project.acronym);
            if !seen.insert(uri.clone()) {
                conflicts.push(ResultStatus::error(
                    "Duplicated project",
                    format!("{uri} appears twice in the request"),
                ));
                continue;
            }
            match self.connection.exists_identifier_checked(&uri).await {
                Ok(true) => conflicts.push(ResultStatus::error(
                    "Already existing data",
                    format!("{uri} already exists"),
                )),
                Ok(false) => {}
                Err(error) => return store_failure("check project existence", &error),
            }
            uris.push(uri);
        }
        if !conflicts.is_empty() {
            return PostResult::new(StatusCode::CONFLICT, conflicts);
        }

        let statements = uris
            .iter()
            .zip(projects)
            .map(|(uri, project)| {
                let mut triples = vec![TriplePattern::new(
                    Term::iri(uri.as_str()),
                    Term::iri(vocabulary::RDF_TYPE),
                    Term::iri(vocabulary::PROJECT),
                )];
                triples.extend(Self::property_triples(uri, project));
                SparqlQueryBuilder::build_insert(Some(self.config.graph.as_str()), &triples)
            })
            .collect::<Result<Vec<_>>>();
        let outcome = match statements {
            Ok(statements) => self.write_in_transaction(statements).await,
            Err(error) => Err(error),
        };
        if let Err(error) = outcome {
            return store_failure("insert projects", &error);
        }

        tracing::info!(created = uris.len(), "Projects inserted");
        let mut result = PostResult::new(
            StatusCode::CREATED,
            vec![ResultStatus::info(
                "Resources created",
                format!("{} new resource(s) created", uris.len()),
            )],
        );
        result.created_resources = uris;
        result
    }

    /// Validate `projects`, require each to exist, then replace their
    /// properties.
    ///
    /// 400 when a project is invalid, 404 when one is unknown, 500 on store
    /// failure, 200 otherwise.
    pub async fn check_and_update_list(&mut self, projects: &[Project]) -> PostResult {
        let result = self.update_checked(projects).await;
        record_entity_write(ENTITY, "update", result.status.as_u16());
        result
    }

    async fn update_checked(&mut self, projects: &[Project]) -> PostResult {
        if projects.is_empty() {
            return PostResult::new(
                StatusCode::BAD_REQUEST,
                vec![ResultStatus::error("Request error", "Empty project(s) to update")],
            );
        }

        let invalid = invalid_statuses(projects.iter().map(|project| &project.details));
        if !invalid.is_empty() {
            return PostResult::new(StatusCode::BAD_REQUEST, invalid);
        }

        let mut unknown = Vec::new();
        for project in projects {
            let found = self
                .connection
                .exists(
                    Some(project.uri.as_str()),
                    Some(vocabulary::RDF_TYPE),
                    Some(vocabulary::PROJECT),
                )
                .await;
            match found {
                Ok(true) => {}
                Ok(false) => unknown.push(ResultStatus::error(
                    "Unknown project",
                    format!("{} does not exist", project.uri),
                )),
                Err(error) => return store_failure("check project existence", &error),
            }
        }
        if !unknown.is_empty() {
            return PostResult::new(StatusCode::NOT_FOUND, unknown);
        }

        let mut statements = Vec::new();
        for project in projects {
            match self.replacement_statements(project) {
                Ok(replacement) => statements.extend(replacement),
                Err(error) => return store_failure("build project update", &error),
            }
        }
        let outcome = self.write_in_transaction(statements).await;
        if let Err(error) = outcome {
            return store_failure("update projects", &error);
        }

        tracing::info!(updated = projects.len(), "Projects updated");
        PostResult::new(
            StatusCode::OK,
            vec![ResultStatus::info(
                "Resources updated",
                format!("{} resource(s) updated", projects.len()),
            )],
        )
    }

    /// DELETE WHERE per managed predicate, then INSERT DATA of the new
    /// values. The `rdf:type` triple is kept.
    fn replacement_statements(&self, project: &Project) -> Result<Vec<Statement>> {
        let graph = Some(self.config.graph.as_str());
        let mut statements = Vec::with_capacity(vocabulary::PROJECT_PROPERTIES.len() + 1);
        for predicate in vocabulary::PROJECT_PROPERTIES {
            let stale = [TriplePattern::new(
                Term::iri(project.uri.as_str()),
                Term::iri(predicate),
                Term::variable("o"),
            )];
            statements.push(SparqlQueryBuilder::build_delete_where(graph, &stale)?);
        }
        let triples = Self::property_triples(&project.uri, &project.details);
        statements.push(SparqlQueryBuilder::build_insert(graph, &triples)?);
        Ok(statements)
    }

    /// Submit `statements` inside a transaction, unless the caller already
    /// opened one with [`TripleStoreDao::init_connection`]; then committing
    /// is up to the caller.
    async fn write_in_transaction(&mut self, statements: Vec<Statement>) -> Result<()> {
        let owned = !self.connection.in_transaction();
        if owned {
            self.connection.begin()?;
        }

        let mut outcome = Ok(());
        for statement in statements {
            if let Err(error) = self.connection.update(statement).await {
                outcome = Err(error);
                break;
            }
        }

        if !owned {
            return outcome;
        }
        match outcome {
            Ok(()) => self.connection.commit().await.map(|_| ()),
            Err(error) => {
                if let Ok(rollback) = self.connection.rollback().await
                    && rollback.already_applied > 0
                {
                    tracing::warn!(
                        applied = rollback.already_applied,
                        "Project write failed after partial application"
                    );
                }
                Err(error)
            }
        }
    }
}

impl TripleStoreDao for ProjectDao {
    fn connection(&self) -> &Connection {
        &self.connection
    }

    fn connection_mut(&mut self) -> &mut Connection {
        &mut self.connection
    }
}

fn invalid_statuses<'a>(projects: impl Iterator<Item = &'a ProjectDetails>) -> Vec<ResultStatus> {
    projects
        .enumerate()
        .flat_map(|(index, project)| {
            project
                .validate()
                .into_iter()
                .map(move |problem| {
                    ResultStatus::error("Wrong value", format!("project {index}: {problem}"))
                })
        })
        .collect()
}

fn store_failure(action: &str, error: &triplestore_dao::TripleStoreError) -> PostResult {
    tracing::error!(action, error = %error, "Project write failed");
    PostResult::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        vec![ResultStatus::error(
            "Triplestore error",
            format!("failed to {action}: {error}"),
        )],
    )
}
