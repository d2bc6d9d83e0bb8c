//! Typed default configuration, the lowest layer under `config.toml`.

use std::{net::SocketAddr, path::PathBuf};

use project_dao::ProjectDaoConfig;
use triplestore_dao::{
    OxigraphStoreConfig, PaginationConfig, TimeoutConfig, TransactionMode,
    TripleStoreBackendType, TripleStoreConfig,
};

use super::Config;
use crate::logger::{LogFormat, LoggerConfig, MetricsExporterConfig, TelemetryConfig};

pub(crate) fn config() -> Config {
    Config {
        triple_store: triple_store(),
        pagination: PaginationConfig::default(),
        projects: ProjectDaoConfig::default(),
        logger: LoggerConfig {
            level: "info".to_string(),
            dependencies: "warn".to_string(),
            format: LogFormat::Pretty,
        },
        telemetry: TelemetryConfig {
            metrics: MetricsExporterConfig {
                enabled: false,
                listen_address: SocketAddr::from(([127, 0, 0, 1], 9464)),
            },
        },
    }
}

// Embedded persistent store so the CLI works without a running server.
fn triple_store() -> TripleStoreConfig {
    TripleStoreConfig {
        backend: TripleStoreBackendType::Oxigraph,
        url: "http://localhost:8080/rdf4j-server".to_string(),
        repository_id: "diaphen".to_string(),
        username: None,
        password: None,
        connect_max_retries: 5,
        connect_retry_frequency_ms: 2_000,
        timeouts: TimeoutConfig::default(),
        max_concurrent_operations: 16,
        transaction_mode: TransactionMode::Buffered,
        oxigraph: OxigraphStoreConfig {
            data_path: Some(PathBuf::from("data/triple-store")),
        },
    }
}
