use hyper::StatusCode;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusSeverity {
    Info,
    Error,
}

/// One human-readable line of a write result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultStatus {
    pub message: String,
    pub severity: StatusSeverity,
    pub details: Option<String>,
}

impl ResultStatus {
    pub fn info(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: StatusSeverity::Info,
            details: Some(details.into()),
        }
    }

    pub fn error(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: StatusSeverity::Error,
            details: Some(details.into()),
        }
    }
}

/// Outcome of `check_and_insert` / `check_and_update_list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostResult {
    /// 201 created, 200 updated, 400 invalid, 404 unknown, 409 duplicate,
    /// 500 store failure
    pub status: StatusCode,
    pub status_list: Vec<ResultStatus>,
    /// URIs of the created resources, on 201 only
    pub created_resources: Vec<String>,
}

impl PostResult {
    pub(crate) fn new(status: StatusCode, status_list: Vec<ResultStatus>) -> Self {
        Self {
            status,
            status_list,
            created_resources: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ResultStatus> {
        self.status_list
            .iter()
            .filter(|status| status.severity == StatusSeverity::Error)
    }
}
