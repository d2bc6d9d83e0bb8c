use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use super::{Config, ConfigError, defaults};

const ENV_PREFIX: &str = "TRIPLESTORE_";

/// Build the configuration from, lowest priority first: typed defaults,
/// `config.toml` in the working directory, the `--config` file, then
/// `TRIPLESTORE_`-prefixed environment variables (`__` separates sections,
/// e.g. `TRIPLESTORE_TRIPLE_STORE__URL`).
pub(crate) fn load_configuration(custom_config_path: Option<&str>) -> Result<Config, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(defaults::config()));

    // User overrides from config.toml
    if Path::new("config.toml").exists() {
        figment = figment.merge(Toml::file("config.toml"));
    }

    if let Some(config_path) = custom_config_path {
        if !Path::new(config_path).exists() {
            return Err(ConfigError::FileNotFound(config_path.into()));
        }
        figment = figment.merge(Toml::file(config_path));
    }

    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract().map_err(Box::new)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::io::Write;

    use triplestore_dao::{TransactionMode, TripleStoreBackendType};

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_are_valid() {
        let config = defaults::config();
        config.validate().unwrap();
        assert_eq!(config.triple_store.backend, TripleStoreBackendType::Oxigraph);
        assert_eq!(config.pagination.default_page_size, 20);
    }

    #[test]
    fn custom_file_overrides_defaults() {
        let file = write_config(
            r#"
            [triple_store]
            backend = "rdf4j"
            url = "http://rdf4j.example.org/rdf4j-server"
            repository_id = "phis"
            transaction_mode = "immediate"

            [pagination]
            default_page_size = 50
            "#,
        );

        let config = load_configuration(file.path().to_str()).unwrap();
        assert_eq!(config.triple_store.backend, TripleStoreBackendType::Rdf4j);
        assert_eq!(config.triple_store.repository_id, "phis");
        assert_eq!(config.triple_store.transaction_mode, TransactionMode::Immediate);
        assert_eq!(config.triple_store.max_concurrent_operations, 16);
        assert_eq!(config.pagination.default_page_size, 50);
        assert_eq!(config.pagination.max_page_size, 5_000);
    }

    #[test]
    fn logging_and_metrics_sections() {
        let file = write_config(
            r#"
            [logger]
            level = "debug"
            format = "compact"

            [telemetry.metrics]
            enabled = true
            listen_address = "0.0.0.0:9100"
            "#,
        );

        let config = load_configuration(file.path().to_str()).unwrap();
        assert_eq!(config.logger.level, "debug");
        assert_eq!(config.logger.dependencies, "warn");
        assert_eq!(config.logger.format, crate::logger::LogFormat::Compact);
        assert!(config.telemetry.metrics.enabled);
        assert_eq!(config.telemetry.metrics.listen_address.port(), 9100);

        let unparsable = write_config(
            r#"
            [telemetry.metrics]
            listen_address = "localhost"
            "#,
        );
        let error = load_configuration(unparsable.path().to_str()).err().unwrap();
        assert!(matches!(error, ConfigError::Load(_)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = write_config(
            r#"
            [pagination]
            page_limit = 10
            "#,
        );

        let error = load_configuration(file.path().to_str()).err().unwrap();
        assert!(matches!(error, ConfigError::Load(_)));
    }

    #[test]
    fn inconsistent_paging_is_rejected() {
        let file = write_config(
            r#"
            [pagination]
            default_page_size = 100
            max_page_size = 10
            "#,
        );

        let error = load_configuration(file.path().to_str()).err().unwrap();
        assert!(matches!(
            error,
            ConfigError::InvalidValue {
                key: "pagination.default_page_size",
                ..
            }
        ));
    }

    #[test]
    fn missing_custom_file_is_reported() {
        let error = load_configuration(Some("does-not-exist.toml")).err().unwrap();
        assert!(
            matches!(error, ConfigError::FileNotFound(path) if path == Path::new("does-not-exist.toml"))
        );
    }
}
