use crate::humanize::ByteSize;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Placeholder the API key carries until an operator sets a real one.
pub const API_KEY_NOT_SET: &str = "NOT-SET";

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub readiness: ReadinessConfig,
    #[serde(default)]
    pub autofocus: AutofocusConfig,
    #[serde(default)]
    pub elasticsearch: ElasticsearchConfig,
    #[serde(default)]
    pub kibana: KibanaConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Host the readiness probe uses to reach this server
    #[serde(default = "default_public_host")]
    pub public_host: String,
    #[serde(default)]
    pub api: ApiLimits,
}

/// API request limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiLimits {
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: ByteSize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            public_host: default_public_host(),
            api: ApiLimits::default(),
        }
    }
}

impl Default for ApiLimits {
    fn default() -> Self {
        Self {
            max_payload_bytes: default_max_payload_bytes(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5010))
}

fn default_public_host() -> String {
    "localhost".to_string()
}

fn default_max_payload_bytes() -> ByteSize {
    ByteSize(1024 * 1024) // 1 MB
}

/// Where text-mode reports live
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_dir: default_report_dir(),
        }
    }
}

fn default_report_dir() -> PathBuf {
    PathBuf::from("data/output")
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Startup readiness probe
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReadinessConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_attempts: default_max_attempts(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_interval_ms() -> u64 {
    2000
}

fn default_max_attempts() -> u32 {
    30
}

fn default_request_timeout_ms() -> u64 {
    1000
}

/// Autofocus threat-intelligence service
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AutofocusConfig {
    #[serde(default = "default_af_hostname")]
    pub hostname: String,
    #[serde(default = "default_af_search_url")]
    pub search_url: String,
    #[serde(default = "default_af_results_url")]
    pub results_url: String,
    #[serde(default = "default_af_tag_url")]
    pub tag_url: String,
    /// API key (loaded from environment, not from config file)
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl AutofocusConfig {
    /// True when a usable key is present.
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .map(str::trim)
            .is_some_and(|key| !key.is_empty() && key != API_KEY_NOT_SET)
    }
}

impl Default for AutofocusConfig {
    fn default() -> Self {
        Self {
            hostname: default_af_hostname(),
            search_url: default_af_search_url(),
            results_url: default_af_results_url(),
            tag_url: default_af_tag_url(),
            api_key: None,
        }
    }
}

fn default_af_hostname() -> String {
    "autofocus.paloaltonetworks.com".to_string()
}

fn default_af_search_url() -> String {
    "https://autofocus.paloaltonetworks.com/api/v1.0/samples/search".to_string()
}

fn default_af_results_url() -> String {
    "https://autofocus.paloaltonetworks.com/api/v1.0/samples/results/".to_string()
}

fn default_af_tag_url() -> String {
    "https://autofocus.paloaltonetworks.com/api/v1.0/tag/".to_string()
}

/// Index store endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ElasticsearchConfig {
    #[serde(default = "default_es_host")]
    pub host: String,
    #[serde(default = "default_es_port")]
    pub port: u16,
    /// Basic auth as `user:password` (loaded from environment, not from config file)
    #[serde(skip)]
    pub http_auth: Option<String>,
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            host: default_es_host(),
            port: default_es_port(),
            http_auth: None,
        }
    }
}

fn default_es_host() -> String {
    "elasticsearch".to_string()
}

fn default_es_port() -> u16 {
    9200
}

/// Dashboard linked from the display page
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KibanaConfig {
    #[serde(default = "default_kibana_host")]
    pub host: String,
    #[serde(default = "default_kibana_port")]
    pub port: u16,
}

impl KibanaConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Default for KibanaConfig {
    fn default() -> Self {
        Self {
            host: default_kibana_host(),
            port: default_kibana_port(),
        }
    }
}

fn default_kibana_host() -> String {
    "kibana".to_string()
}

fn default_kibana_port() -> u16 {
    5601
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:5010");
        assert_eq!(config.server.public_host, "localhost");
        assert_eq!(config.server.api.max_payload_bytes.as_u64(), 1024 * 1024);
        assert_eq!(config.readiness.interval_ms, 2000);
        assert_eq!(config.elasticsearch.port, 9200);
        assert_eq!(config.kibana.base_url(), "http://kibana:5601");
        assert!(!config.autofocus.has_api_key());
    }

    #[test]
    fn test_api_key_placeholder_is_not_a_key() {
        let mut autofocus = AutofocusConfig::default();

        autofocus.api_key = Some(API_KEY_NOT_SET.to_string());
        assert!(!autofocus.has_api_key());

        autofocus.api_key = Some("   ".to_string());
        assert!(!autofocus.has_api_key());

        autofocus.api_key = Some("0123abcd".to_string());
        assert!(autofocus.has_api_key());
    }
}
