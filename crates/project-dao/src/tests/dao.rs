#![allow(clippy::unwrap_used)]

use hyper::StatusCode;
use triplestore_dao::{RepositoryRegistry, TripleStoreDao};

use super::{open_dao, project, unavailable_dao};
use crate::{Project, ProjectFilter, StatusSeverity};

#[tokio::test]
async fn insert_then_count_list_and_page() {
    let registry = RepositoryRegistry::new();
    let mut dao = open_dao(&registry, "projects-listing").await;

    let result = dao
        .check_and_insert(&[
            project("DROPS", "Drought-tolerant yielding plants"),
            project("EPPN", "European Plant Phenotyping Network"),
        ])
        .await;
    assert_eq!(result.status, StatusCode::CREATED);
    assert_eq!(
        result.created_resources,
        vec![
            "http://www.phenome-fppn.fr/diaphen/id/project/drops".to_string(),
            "http://www.phenome-fppn.fr/diaphen/id/project/eppn".to_string(),
        ]
    );
    assert_eq!(dao.count().await, Some(2));

    let all = dao.all_paginate().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].details, project("DROPS", "Drought-tolerant yielding plants"));
    assert_eq!(all[1].details.acronym, "EPPN");

    dao.set_page_size(1);
    dao.set_page(1);
    let second_page = dao.all_paginate().await.unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].details.acronym, "EPPN");

    dao.set_page(5);
    assert_eq!(dao.all_paginate().await.unwrap(), Vec::<Project>::new());
}

#[tokio::test]
async fn filters_narrow_the_search() {
    let registry = RepositoryRegistry::new();
    let mut dao = open_dao(&registry, "projects-filters").await;
    let mut eppn = project("EPPN", "European Plant Phenotyping Network");
    eppn.keywords = vec!["phenotyping".to_string()];
    eppn.date_start = "2012-01-01".to_string();

    let result = dao
        .check_and_insert(&[project("DROPS", "Drought-tolerant \"yielding\" plants"), eppn])
        .await;
    assert_eq!(result.status, StatusCode::CREATED);

    dao.filter_mut().name = Some("yielding".to_string());
    assert_eq!(dao.count().await, Some(1));

    dao.set_filter(ProjectFilter {
        keywords: Some("PHENO".to_string()),
        ..ProjectFilter::default()
    });
    let found = dao.all_paginate().await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].details.acronym, "EPPN");

    dao.set_filter(ProjectFilter {
        date_start: Some("2015-07-07".to_string()),
        website: Some("http://www.drops.eu".to_string()),
        ..ProjectFilter::default()
    });
    let found = dao.all_paginate().await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].details.name, "Drought-tolerant \"yielding\" plants");

    dao.set_filter(ProjectFilter {
        financial_name: Some("FP7".to_string()),
        ..ProjectFilter::default()
    });
    assert_eq!(dao.count().await, Some(0));
}

#[tokio::test]
async fn single_project_scope() {
    let registry = RepositoryRegistry::new();
    let mut dao = open_dao(&registry, "projects-scope").await;
    let result = dao
        .check_and_insert(&[project("DROPS", "Drops"), project("EPPN", "Eppn")])
        .await;
    let drops = result.created_resources[0].clone();

    let scoped = open_dao(&registry, "projects-scope").await.for_project(&drops);
    assert_eq!(scoped.count().await, Some(1));
    assert_eq!(scoped.all_paginate().await.unwrap()[0].uri, drops);
}

#[tokio::test]
async fn duplicate_insert_is_a_conflict() {
    let registry = RepositoryRegistry::new();
    let mut dao = open_dao(&registry, "projects-conflict").await;

    assert!(dao.check_and_insert(&[project("DROPS", "Drops")]).await.is_success());

    let again = dao.check_and_insert(&[project("drops", "Drops again")]).await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert!(again.created_resources.is_empty());

    let twice = dao
        .check_and_insert(&[project("EPPN", "Eppn"), project("EPPN", "Eppn")])
        .await;
    assert_eq!(twice.status, StatusCode::CONFLICT);
    assert_eq!(twice.errors().count(), 1);
    assert_eq!(dao.count().await, Some(1));
}

#[tokio::test]
async fn invalid_or_empty_batch_is_rejected() {
    let registry = RepositoryRegistry::new();
    let mut dao = open_dao(&registry, "projects-invalid").await;

    let empty = dao.check_and_insert(&[]).await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let mut broken = project("BAD", "");
    broken.date_start = "yesterday".to_string();
    broken.date_end = None;
    let invalid = dao
        .check_and_insert(&[project("DROPS", "Drops"), broken])
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(invalid.errors().count(), 2);
    assert_eq!(dao.count().await, Some(0));
}

#[tokio::test]
async fn update_replaces_properties() {
    let registry = RepositoryRegistry::new();
    let mut dao = open_dao(&registry, "projects-update").await;
    let created = dao.check_and_insert(&[project("DROPS", "Drops")]).await;
    let uri = created.created_resources[0].clone();

    let mut details = project("DROPS", "Drought-tolerant yielding plants");
    details.keywords = vec!["water".to_string()];
    details.website = None;
    let updated = dao
        .check_and_update_list(&[Project {
            uri: uri.clone(),
            details: details.clone(),
        }])
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.status_list[0].severity, StatusSeverity::Info);

    let stored = dao.all_paginate().await.unwrap();
    assert_eq!(stored, vec![Project { uri, details }]);
}

#[tokio::test]
async fn update_of_unknown_project_is_not_found() {
    let registry = RepositoryRegistry::new();
    let mut dao = open_dao(&registry, "projects-unknown").await;

    let result = dao
        .check_and_update_list(&[Project {
            uri: "http://www.phenome-fppn.fr/diaphen/id/project/ghost".to_string(),
            details: project("GHOST", "Ghost"),
        }])
        .await;
    assert_eq!(result.status, StatusCode::NOT_FOUND);
    assert_eq!(dao.count().await, Some(0));
}

#[tokio::test]
async fn caller_owned_transaction_is_left_to_the_caller() {
    let registry = RepositoryRegistry::new();
    let mut dao = open_dao(&registry, "projects-caller-tx").await;

    dao.init_connection().unwrap();
    let result = dao.check_and_insert(&[project("DROPS", "Drops")]).await;
    assert_eq!(result.status, StatusCode::CREATED);
    assert!(dao.connection().in_transaction());
    assert_eq!(dao.count().await, Some(0));

    assert_eq!(dao.commit_transaction().await.unwrap(), 1);
    assert_eq!(dao.count().await, Some(1));
    dao.close_connection();
}

#[tokio::test]
async fn store_failures_surface_as_none_and_500() {
    let mut dao = unavailable_dao();

    assert_eq!(dao.count().await, None);
    assert_eq!(dao.all_paginate().await, None);

    let result = dao.check_and_insert(&[project("DROPS", "Drops")]).await;
    assert_eq!(result.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!result.is_success());
}
