use clap::ArgMatches;
use project_dao::{PostResult, Project, ProjectDao, ProjectDetails, ProjectFilter};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::{Target, print_json, str_arg};
use crate::error::AppError;

async fn open_dao(target: &Target<'_>) -> Result<ProjectDao, AppError> {
    let dao = ProjectDao::open(
        target.registry,
        &target.config.triple_store,
        target.repository,
        target.config.projects.clone(),
        target.config.pagination.clone(),
    )
    .await?;
    Ok(dao)
}

/// Search criteria from the filter flags of a project listing command.
fn filter_from(args: &ArgMatches) -> ProjectFilter {
    let value = |id: &str| str_arg(args, id).map(str::to_string);
    ProjectFilter {
        uri: value("uri"),
        name: value("name"),
        acronym: value("acronym"),
        subproject_type: value("subproject_type"),
        financial_support: value("financial_support"),
        financial_name: value("financial_name"),
        date_start: value("date_start"),
        date_end: value("date_end"),
        keywords: value("keyword"),
        parent_project: value("parent_project"),
        website: value("website"),
    }
}

pub(super) async fn count(target: &Target<'_>, args: &ArgMatches) -> Result<(), AppError> {
    let mut dao = open_dao(target).await?;
    dao.set_filter(filter_from(args));
    let total = dao
        .count()
        .await
        .ok_or_else(|| AppError::Other("failed to count projects".to_string()))?;
    print_json(&total)
}

pub(super) async fn list(target: &Target<'_>, args: &ArgMatches) -> Result<(), AppError> {
    let mut dao = open_dao(target).await?;
    dao.set_filter(filter_from(args));
    if let Some(page) = args.get_one::<i64>("page") {
        dao.set_page(*page);
    }
    if let Some(page_size) = args.get_one::<i64>("page_size") {
        dao.set_page_size(*page_size);
    }

    let projects = dao
        .all_paginate()
        .await
        .ok_or_else(|| AppError::Other("failed to list projects".to_string()))?;
    print_json(&json!({
        "page": dao.pagination().effective_page(),
        "pageSize": dao.pagination().effective_page_size(),
        "projects": projects,
    }))
}

pub(super) async fn insert(target: &Target<'_>, args: &ArgMatches) -> Result<(), AppError> {
    let projects: Vec<ProjectDetails> = read_json(args)?;
    let mut dao = open_dao(target).await?;
    report(dao.check_and_insert(&projects).await)
}

pub(super) async fn update(target: &Target<'_>, args: &ArgMatches) -> Result<(), AppError> {
    let projects: Vec<Project> = read_json(args)?;
    let mut dao = open_dao(target).await?;
    report(dao.check_and_update_list(&projects).await)
}

fn read_json<T: DeserializeOwned>(args: &ArgMatches) -> Result<T, AppError> {
    let path = str_arg(args, "file")
        .ok_or_else(|| AppError::Other("a JSON file is required".to_string()))?;
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn report(result: PostResult) -> Result<(), AppError> {
    print_json(&json!({
        "status": result.status.as_u16(),
        "statusList": result.status_list,
        "createdResources": result.created_resources,
    }))?;
    if result.is_success() {
        Ok(())
    } else {
        Err(AppError::Other(format!(
            "request rejected with status {}",
            result.status
        )))
    }
}
