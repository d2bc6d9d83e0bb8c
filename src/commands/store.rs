use clap::ArgMatches;
use serde_json::json;

use super::{Target, print_json, str_arg};
use crate::error::AppError;

pub(super) async fn health(target: &Target<'_>) -> Result<(), AppError> {
    let connection = target.connect().await?;
    let handle = connection.handle();
    tracing::info!(
        backend = handle.backend_name(),
        repository = %handle.repository_id(),
        "Repository is reachable"
    );
    print_json(&json!({
        "repository": handle.repository_id(),
        "backend": handle.backend_name(),
        "transactionMode": connection.transaction_mode(),
        "healthy": true,
    }))
}

pub(super) async fn exists(target: &Target<'_>, args: &ArgMatches) -> Result<(), AppError> {
    let connection = target.connect().await?;
    let found = match str_arg(args, "identifier") {
        Some(identifier) => connection.exists_identifier_checked(identifier).await?,
        None => {
            connection
                .exists(
                    str_arg(args, "subject"),
                    str_arg(args, "predicate"),
                    str_arg(args, "object"),
                )
                .await?
        }
    };
    print_json(&found)
}

pub(super) async fn lookup(target: &Target<'_>, args: &ArgMatches) -> Result<(), AppError> {
    let connection = target.connect().await?;
    let value = connection
        .lookup_single_value(str_arg(args, "subject"), str_arg(args, "predicate"))
        .await?;
    print_json(&value)
}

pub(super) async fn add(target: &Target<'_>, args: &ArgMatches) -> Result<(), AppError> {
    apply_relationships(target, args, Mutation::Add).await
}

pub(super) async fn remove(target: &Target<'_>, args: &ArgMatches) -> Result<(), AppError> {
    apply_relationships(target, args, Mutation::Remove).await
}

#[derive(Clone, Copy)]
enum Mutation {
    Add,
    Remove,
}

async fn apply_relationships(
    target: &Target<'_>,
    args: &ArgMatches,
    mutation: Mutation,
) -> Result<(), AppError> {
    let (Some(subject), Some(predicate)) = (str_arg(args, "subject"), str_arg(args, "predicate"))
    else {
        return Err(AppError::Other("subject and predicate are required".to_string()));
    };
    let objects: Vec<&str> = args
        .get_many::<String>("objects")
        .map(|values| values.map(String::as_str).collect())
        .unwrap_or_default();
    let graph = str_arg(args, "graph");

    let mut connection = target.connect().await?;
    connection.begin()?;
    let submitted = match mutation {
        Mutation::Add => {
            connection
                .try_add_relationships(subject, predicate, &objects, graph)
                .await
        }
        Mutation::Remove => {
            connection
                .try_remove_relationships(subject, predicate, &objects, graph)
                .await
        }
    };

    if let Err(error) = submitted {
        let rollback = connection.rollback().await?;
        tracing::warn!(
            discarded = rollback.discarded,
            already_applied = rollback.already_applied,
            "Relationship batch rolled back"
        );
        return Err(error.into());
    }
    let statements = connection.commit().await?;
    connection.close();

    print_json(&json!({
        "subject": subject,
        "predicate": predicate,
        "objects": objects.len(),
        "statements": statements,
    }))
}
