use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stored project, as returned by searches and accepted by updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub uri: String,
    #[serde(flatten)]
    pub details: ProjectDetails,
}

/// Everything a client supplies about a project. The URI is derived from the
/// acronym at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    pub name: String,
    #[serde(rename = "acronyme")]
    pub acronym: String,
    #[serde(default)]
    pub subproject_type: Option<String>,
    #[serde(default)]
    pub financial_support: Option<String>,
    #[serde(default)]
    pub financial_name: Option<String>,
    /// `YYYY-MM-DD`
    pub date_start: String,
    #[serde(default)]
    pub date_end: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub parent_project: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

impl ProjectDetails {
    /// Human-readable reasons the project cannot be stored; empty when valid.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.name.trim().is_empty() {
            problems.push("name is required".to_string());
        }
        if self.acronym.trim().is_empty() {
            problems.push("acronyme is required".to_string());
        }
        let start = parse_ymd(&self.date_start);
        if start.is_none() {
            problems.push(format!(
                "dateStart must be a YYYY-MM-DD date, got '{}'",
                self.date_start
            ));
        }
        if let Some(date_end) = &self.date_end {
            match (parse_ymd(date_end), start) {
                (None, _) => {
                    problems.push(format!("dateEnd must be a YYYY-MM-DD date, got '{date_end}'"))
                }
                (Some(end), Some(start)) if end < start => {
                    problems.push("dateEnd is before dateStart".to_string())
                }
                _ => {}
            }
        }
        if let Some(website) = &self.website
            && !(website.starts_with("http://") || website.starts_with("https://"))
        {
            problems.push(format!("website must be an http(s) URL, got '{website}'"));
        }
        problems
    }
}

/// Calendar date written as exactly `YYYY-MM-DD`.
fn parse_ymd(value: &str) -> Option<NaiveDate> {
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Search criteria; unset fields do not constrain the search.
///
/// Text fields match case-insensitively as substrings, dates and IRIs
/// exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectFilter {
    pub uri: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "acronyme")]
    pub acronym: Option<String>,
    pub subproject_type: Option<String>,
    pub financial_support: Option<String>,
    pub financial_name: Option<String>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub keywords: Option<String>,
    pub parent_project: Option<String>,
    pub website: Option<String>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn drops() -> ProjectDetails {
        ProjectDetails {
            name: "Drought-tolerant yielding plants".to_string(),
            acronym: "DROPS".to_string(),
            date_start: "2015-07-07".to_string(),
            date_end: Some("2016-07-07".to_string()),
            keywords: vec!["maize".to_string(), "drought".to_string()],
            website: Some("http://www.drops-project.eu".to_string()),
            ..ProjectDetails::default()
        }
    }

    #[test]
    fn valid_project_has_no_problems() {
        assert!(drops().validate().is_empty());
    }

    #[test]
    fn reports_every_problem() {
        let project = ProjectDetails {
            name: " ".to_string(),
            acronym: String::new(),
            date_start: "07/07/2015".to_string(),
            website: Some("www.drops-project.eu".to_string()),
            ..ProjectDetails::default()
        };
        assert_eq!(project.validate().len(), 4);

        let reversed = ProjectDetails {
            date_end: Some("2014-01-01".to_string()),
            ..drops()
        };
        assert_eq!(reversed.validate(), vec!["dateEnd is before dateStart"]);
    }

    #[test]
    fn dates_must_exist_on_the_calendar() {
        for date in ["2015-13-45", "2015-99-99", "2015-02-30", "2015-7-7", "+2015-07-07"] {
            let project = ProjectDetails {
                date_start: date.to_string(),
                date_end: None,
                ..drops()
            };
            assert_eq!(project.validate().len(), 1, "{date} accepted");
        }

        let leap_day = ProjectDetails {
            date_start: "2016-02-29".to_string(),
            ..drops()
        };
        assert!(leap_day.validate().is_empty());

        let impossible_end = ProjectDetails {
            date_end: Some("2016-04-31".to_string()),
            ..drops()
        };
        assert_eq!(
            impossible_end.validate(),
            vec!["dateEnd must be a YYYY-MM-DD date, got '2016-04-31'"]
        );
    }

    #[test]
    fn rest_field_names() {
        let json = serde_json::to_value(Project {
            uri: "http://www.phenome-fppn.fr/diaphen/id/project/drops".to_string(),
            details: drops(),
        })
        .unwrap();
        assert_eq!(json["acronyme"], "DROPS");
        assert_eq!(json["dateStart"], "2015-07-07");
        assert_eq!(json["uri"], "http://www.phenome-fppn.fr/diaphen/id/project/drops");

        let filter: ProjectFilter =
            serde_json::from_str(r#"{"acronyme": "DROPS", "financialName": "H2020"}"#).unwrap();
        assert_eq!(filter.acronym.as_deref(), Some("DROPS"));
        assert_eq!(filter.financial_name.as_deref(), Some("H2020"));
    }
}
