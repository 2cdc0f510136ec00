use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "PANTORT_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/pantort.toml";
const ENV_PREFIX: &str = "PANTORT";
const ENV_SEPARATOR: &str = "__";

/// Path of the TOML file: `PANTORT_CONFIG` or `config/pantort.toml`
pub fn default_path() -> PathBuf {
    env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load(config_path: PathBuf) -> Result<Config, ConfigError> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let mut config = load_from_sources(config_path)?;
    load_secrets(&mut config);

    Ok(config)
}

/// Secrets are never stored in TOML files, only in environment
fn load_secrets(config: &mut Config) {
    config.autofocus.api_key = env::var("AUTOFOCUS_API_KEY")
        .or_else(|_| env::var("PANTORT_AUTOFOCUS_API_KEY"))
        .ok();

    if let Ok(auth) = env::var("ELASTICSEARCH_HTTP_AUTH") {
        config.elasticsearch.http_auth = Some(auth).filter(|a| !a.is_empty());
    }
}

/// Load configuration from a specific path and environment
/// Useful for testing with custom config files
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // PANTORT__SERVER__BIND_ADDR -> server.bind_addr
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    builder.build()?.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_only() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:5010");
        assert_eq!(config.output.report_dir, PathBuf::from("data/output"));
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[server]
bind_addr = "127.0.0.1:9000"
public_host = "127.0.0.1"

[server.api]
max_payload_bytes = "512KB"

[output]
report_dir = "/var/lib/pantort/output"

[readiness]
interval_ms = 250
max_attempts = 4

[elasticsearch]
host = "es.internal"
port = 9201
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.server.bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.server.api.max_payload_bytes.as_u64(), 512 * 1024);
        assert_eq!(config.output.report_dir, PathBuf::from("/var/lib/pantort/output"));
        assert_eq!(config.readiness.interval_ms, 250);
        assert_eq!(config.readiness.max_attempts, 4);
        // Untouched fields keep their defaults
        assert_eq!(config.readiness.request_timeout_ms, 1000);
        assert_eq!(config.elasticsearch.host, "es.internal");
        assert_eq!(config.elasticsearch.port, 9201);
    }

    #[test]
    fn test_api_key_in_toml_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        fs::write(&config_path, "[autofocus]\napi_key = \"from-file\"\n").unwrap();

        let config = load_from_sources(config_path).unwrap();
        assert!(config.autofocus.api_key.is_none());
    }
}
