use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// `[logger]` section.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct LoggerConfig {
    /// Either a bare level applied to this tool's own crates, or a full
    /// `EnvFilter` directive list such as `triplestore_dao=debug,oxigraph=info`
    pub level: String,
    /// Level for every other crate when `level` is a bare level
    pub dependencies: String,
    pub format: LogFormat,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum LogFormat {
    Pretty,
    /// Single line per event, no span context
    Compact,
    Json,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct TelemetryConfig {
    pub metrics: MetricsExporterConfig,
}

/// Prometheus scrape endpoint, off by default for one-shot commands.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct MetricsExporterConfig {
    pub enabled: bool,
    pub listen_address: SocketAddr,
}
