use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;

use super::{SelectResult, SelectRow, SelectValue, TripleStoreBackend};
use crate::{
    config::TripleStoreConfig,
    error::{Result, TripleStoreError},
};

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// RDF4J (Sesame) HTTP server backend
///
/// Speaks the RDF4J REST protocol against one repository of the server.
pub struct Rdf4jBackend {
    client: Client,
    config: TripleStoreConfig,
}

impl Rdf4jBackend {
    /// Create a new RDF4J backend with its own connection pool
    pub fn new(config: TripleStoreConfig) -> Result<Self> {
        let client = Client::builder()
            // Connection pooling: keep up to 10 idle connections per host
            .pool_max_idle_per_host(10)
            // Close idle connections after 30 seconds
            .pool_idle_timeout(Duration::from_secs(30))
            // TCP keepalive to detect dead connections
            .tcp_keepalive(Duration::from_secs(60))
            // Timeout for establishing new connections
            .connect_timeout(Duration::from_secs(10))
            // Default request timeout (overridden per-request)
            .timeout(config.timeouts.query_timeout())
            .build()?;

        Ok(Self { client, config })
    }

    /// Build request with optional authentication
    fn auth_headers(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match (&self.config.username, &self.config.password) {
            (Some(user), Some(pass)) => builder.basic_auth(user, Some(pass)),
            _ => builder,
        }
    }

    async fn post_query(&self, query: &str, timeout: Duration) -> Result<String> {
        let response = self
            .auth_headers(self.client.post(self.config.repository_endpoint()))
            .header("Content-Type", "application/sparql-query")
            .header("Accept", SPARQL_RESULTS_JSON)
            .timeout(timeout)
            .body(query.to_string())
            .send()
            .await?;

        let response = error_for_status(response).await?;
        Ok(response.text().await?)
    }
}

async fn error_for_status(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(TripleStoreError::Backend { status, message })
}

#[async_trait]
impl TripleStoreBackend for Rdf4jBackend {
    fn name(&self) -> &'static str {
        "rdf4j"
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .auth_headers(self.client.get(self.config.protocol_endpoint()))
            .timeout(Duration::from_secs(10))
            .send()
            .await?;

        Ok(response.status().is_success())
    }

    async fn repository_exists(&self) -> Result<bool> {
        let response = self
            .auth_headers(self.client.get(self.config.size_endpoint()))
            .timeout(Duration::from_secs(10))
            .send()
            .await?;

        // 404 means the repository is unknown to the server
        if response.status().as_u16() == 404 {
            Ok(false)
        } else {
            Ok(response.status().is_success())
        }
    }

    async fn create_repository(&self) -> Result<()> {
        Err(TripleStoreError::Connectivity {
            url: self.config.url.clone(),
            repository: self.config.repository_id.clone(),
            reason: "repository does not exist on the RDF4J server".to_string(),
        })
    }

    async fn update(&self, query: &str, timeout: Duration) -> Result<()> {
        let response = self
            .auth_headers(self.client.post(self.config.statements_endpoint()))
            .header("Content-Type", "application/sparql-update")
            .timeout(timeout)
            .body(query.to_string())
            .send()
            .await?;

        error_for_status(response).await?;
        Ok(())
    }

    async fn ask(&self, query: &str, timeout: Duration) -> Result<bool> {
        let body = self.post_query(query, timeout).await?;
        parse_ask_json(&body)
    }

    async fn select(&self, query: &str, timeout: Duration) -> Result<SelectResult> {
        let body = self.post_query(query, timeout).await?;
        parse_select_json(&body)
    }
}

#[derive(Deserialize)]
struct SparqlAskResponse {
    boolean: bool,
}

fn parse_ask_json(json: &str) -> Result<bool> {
    let response: SparqlAskResponse =
        serde_json::from_str(json).map_err(|e| TripleStoreError::ParseError {
            reason: format!("Failed to parse ASK response: {e}"),
        })?;

    Ok(response.boolean)
}

#[derive(Deserialize)]
struct SparqlSelectResponse {
    head: SparqlSelectHead,
    results: SparqlSelectResults,
}

#[derive(Deserialize)]
struct SparqlSelectHead {
    #[serde(default)]
    vars: Vec<String>,
}

#[derive(Deserialize)]
struct SparqlSelectResults {
    bindings: Vec<HashMap<String, SparqlSelectBinding>>,
}

#[derive(Deserialize)]
struct SparqlSelectBinding {
    #[serde(rename = "type")]
    kind: String,
    value: String,
    datatype: Option<String>,
    #[serde(rename = "xml:lang")]
    language: Option<String>,
}

impl From<SparqlSelectBinding> for SelectValue {
    fn from(binding: SparqlSelectBinding) -> Self {
        match binding.kind.as_str() {
            "uri" => SelectValue::Uri(binding.value),
            "bnode" => SelectValue::BlankNode(binding.value),
            // "literal" and the legacy "typed-literal"
            _ => SelectValue::Literal {
                value: binding.value,
                datatype: binding.datatype,
                language: binding.language,
            },
        }
    }
}

fn parse_select_json(json: &str) -> Result<SelectResult> {
    let response: SparqlSelectResponse =
        serde_json::from_str(json).map_err(|e| TripleStoreError::ParseError {
            reason: format!("Failed to parse SELECT response: {e}"),
        })?;

    let rows = response
        .results
        .bindings
        .into_iter()
        .map(|binding| SelectRow {
            bindings: binding
                .into_iter()
                .map(|(var, value)| (var, SelectValue::from(value)))
                .collect(),
        })
        .collect();

    Ok(SelectResult {
        variables: response.head.vars,
        rows,
    })
}
