//! Tracing subscriber and metrics exporter setup for the CLI.
//!
//! Events go to stderr so stdout only carries command output. `RUST_LOG`
//! overrides the configured filter.

mod config;

pub(crate) use config::{LogFormat, LoggerConfig, MetricsExporterConfig, TelemetryConfig};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose events a bare `logger.level` applies to.
const OWN_CRATES: [&str; 3] = ["triplestore_access", "triplestore_dao", "project_dao"];

pub(crate) fn initialize(logger_config: &LoggerConfig, telemetry_config: &TelemetryConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(logger_config)));
    let registry = tracing_subscriber::registry().with(filter);
    let layer = fmt::layer().with_writer(std::io::stderr);

    match logger_config.format {
        LogFormat::Pretty => registry.with(layer.with_target(true)).init(),
        LogFormat::Compact => registry.with(layer.compact().with_target(false)).init(),
        LogFormat::Json => registry.with(layer.json().with_current_span(false)).init(),
    }

    initialize_metrics(&telemetry_config.metrics);
}

/// `EnvFilter` directives for `logger_config`.
///
/// A bare level such as `debug` is scoped to this tool's crates and every
/// other target gets `dependencies`; anything else is used as written.
fn filter_directives(logger_config: &LoggerConfig) -> String {
    let level = logger_config.level.trim();
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }

    let mut directives = logger_config.dependencies.trim().to_string();
    for krate in OWN_CRATES {
        directives.push_str(&format!(",{krate}={level}"));
    }
    directives.trim_start_matches(',').to_string()
}

fn initialize_metrics(metrics_config: &MetricsExporterConfig) {
    if !metrics_config.enabled {
        return;
    }

    let listen_address = metrics_config.listen_address;
    match PrometheusBuilder::new()
        .with_http_listener(listen_address)
        .install()
    {
        Ok(()) => tracing::info!(%listen_address, "Serving Prometheus metrics"),
        Err(error) => tracing::warn!(
            %listen_address,
            error = %error,
            "Metrics exporter not started"
        ),
    }
}
