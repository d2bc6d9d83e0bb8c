mod cli;
mod commands;
mod config;
mod error;
mod logger;

use std::process::ExitCode;

use dotenvy::dotenv;

pub async fn run() -> ExitCode {
    dotenv().ok();

    let matches = cli::command().get_matches();
    let config = match config::load_configuration(cli::global_arg(&matches, "config")) {
        Ok(config) => config,
        Err(error) => {
            // Logger is configured by the file that failed to load
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };
    logger::initialize(&config.logger, &config.telemetry);

    tracing::info!(
        backend = ?config.triple_store.backend,
        repository = %config.triple_store.repository_id,
        transaction_mode = ?config.triple_store.transaction_mode,
        "Configuration loaded"
    );

    match commands::execute(&config, &matches).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(error = %error, "Command failed");
            ExitCode::FAILURE
        }
    }
}
