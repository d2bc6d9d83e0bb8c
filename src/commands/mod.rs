//! One handler per CLI subcommand. Handlers print their result as JSON on
//! stdout and log on stderr.

mod projects;
mod store;

use clap::ArgMatches;
use serde::Serialize;
use triplestore_dao::{Connection, RepositoryRegistry, Result as StoreResult};

use crate::{cli, config::Config, error::AppError};

pub(crate) async fn execute(config: &Config, matches: &ArgMatches) -> Result<(), AppError> {
    let registry = RepositoryRegistry::new();
    let target = Target {
        registry: &registry,
        config,
        repository: cli::global_arg(matches, "repository"),
    };

    let Some((name, args)) = matches.subcommand() else {
        return Err(AppError::Other("no command given".to_string()));
    };
    tracing::debug!(command = name, repository = %target.repository_id(), "Running command");

    match name {
        "health" => store::health(&target).await,
        "exists" => store::exists(&target, args).await,
        "lookup" => store::lookup(&target, args).await,
        "add" => store::add(&target, args).await,
        "remove" => store::remove(&target, args).await,
        "count-projects" => projects::count(&target, args).await,
        "list-projects" => projects::list(&target, args).await,
        "insert-projects" => projects::insert(&target, args).await,
        "update-projects" => projects::update(&target, args).await,
        other => Err(AppError::Other(format!("unknown command '{other}'"))),
    }
}

/// Repository a command runs against.
pub(crate) struct Target<'a> {
    registry: &'a RepositoryRegistry,
    config: &'a Config,
    repository: Option<&'a str>,
}

impl Target<'_> {
    fn repository_id(&self) -> &str {
        self.repository
            .unwrap_or(&self.config.triple_store.repository_id)
    }

    async fn connect(&self) -> StoreResult<Connection> {
        match self.repository {
            Some(repository_id) => {
                self.registry
                    .open_repository(&self.config.triple_store, repository_id)
                    .await
            }
            None => self.registry.open(&self.config.triple_store).await,
        }
    }
}

fn print_json(value: &impl Serialize) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn str_arg<'a>(args: &'a ArgMatches, id: &str) -> Option<&'a str> {
    args.get_one::<String>(id).map(String::as_str)
}
