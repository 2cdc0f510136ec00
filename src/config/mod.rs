//! Configuration management for Pan-Tort
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use pantort::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Server listening on: {}", config.server.bind_addr);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `PANTORT__<section>__<key>`
//!
//! Examples:
//! - `PANTORT__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `PANTORT__ELASTICSEARCH__HOST=es.internal`
//! - `PANTORT__READINESS__MAX_ATTEMPTS=10`
//!
//! The Autofocus API key is a secret and is only read from `AUTOFOCUS_API_KEY`
//! (or `PANTORT_AUTOFOCUS_API_KEY`).
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/pantort.toml`.
//! This can be overridden using the `PANTORT_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use crate::humanize::ByteSize;
pub use models::{
    API_KEY_NOT_SET, ApiLimits, AutofocusConfig, Config, ElasticsearchConfig, KibanaConfig,
    LoggingConfig, OutputConfig, ReadinessConfig, ServerConfig,
};
pub use validation::ValidationError;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`PANTORT__*`)
    /// 2. TOML file (default: `config/pantort.toml`)
    /// 3. Default values
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file is malformed
    /// - Validation fails (bad URLs, zero ports, etc.)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_secrets(sources::default_path())
    }

    /// Like [`Config::load`] but reads the TOML file from `path`.
    pub fn load_with_secrets(path: PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path, without secrets
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        fs::write(&config_path, "[kibana]\nhost = \"dash.local\"\n").unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(config.kibana.host, "dash.local");
        assert_eq!(config.kibana.port, 5601);
    }

    #[test]
    fn test_validation_catches_bad_url() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[autofocus]
search_url = "autofocus.paloaltonetworks.com/api/v1.0/samples/search"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(ValidationError::InvalidServiceUrl { .. })
        ));
    }

    #[test]
    fn test_malformed_file_is_a_load_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        fs::write(&config_path, "[server\nbind_addr = ").unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(result.unwrap_err(), ConfigError::LoadError(_)));
    }

    #[test]
    fn test_full_config_example() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[server]
bind_addr = "0.0.0.0:5010"
public_host = "localhost"

[server.api]
max_payload_bytes = "2MB"

[output]
report_dir = "templates/output"

[logging]
level = "debug"

[readiness]
interval_ms = 2000
max_attempts = 15
request_timeout_ms = 500

[autofocus]
hostname = "autofocus.paloaltonetworks.com"
search_url = "https://autofocus.paloaltonetworks.com/api/v1.0/samples/search"
results_url = "https://autofocus.paloaltonetworks.com/api/v1.0/samples/results/"
tag_url = "https://autofocus.paloaltonetworks.com/api/v1.0/tag/"

[elasticsearch]
host = "elasticsearch"
port = 9200

[kibana]
host = "kibana"
port = 5601
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();

        assert_eq!(config.server.api.max_payload_bytes.as_u64(), 2 * 1024 * 1024);
        assert_eq!(config.output.report_dir, PathBuf::from("templates/output"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.readiness.max_attempts, 15);
        assert_eq!(config.readiness.request_timeout_ms, 500);
        assert_eq!(config.kibana.base_url(), "http://kibana:5601");
    }
}
