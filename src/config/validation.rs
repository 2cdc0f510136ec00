use super::models::Config;
use thiserror::Error;

/// Upper bound for request bodies; hash batches never get near it
const MAX_PAYLOAD_BYTES: u64 = 5 * 1024 * 1024; // 5 MB

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Autofocus {field} must be an http(s) URL, got '{value}'")]
    InvalidServiceUrl { field: &'static str, value: String },

    #[error("{field} port must be non-zero")]
    InvalidPort { field: &'static str },

    #[error("max_payload_bytes ({actual}) must be between 1 and {limit}")]
    PayloadLimitOutOfRange { actual: u64, limit: u64 },

    #[error("Readiness {field} must be positive")]
    InvalidReadiness { field: &'static str },

    #[error("server.public_host must not be empty")]
    EmptyPublicHost,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_server(config)?;
    validate_service_urls(config)?;
    validate_ports(config)?;
    validate_readiness(config)?;
    Ok(())
}

fn validate_server(config: &Config) -> Result<(), ValidationError> {
    if config.server.public_host.trim().is_empty() {
        return Err(ValidationError::EmptyPublicHost);
    }

    let actual = config.server.api.max_payload_bytes.as_u64();
    if actual == 0 || actual > MAX_PAYLOAD_BYTES {
        return Err(ValidationError::PayloadLimitOutOfRange {
            actual,
            limit: MAX_PAYLOAD_BYTES,
        });
    }

    Ok(())
}

fn validate_service_urls(config: &Config) -> Result<(), ValidationError> {
    let urls = [
        ("search_url", &config.autofocus.search_url),
        ("results_url", &config.autofocus.results_url),
        ("tag_url", &config.autofocus.tag_url),
    ];

    for (field, value) in urls {
        if !value.starts_with("http://") && !value.starts_with("https://") {
            return Err(ValidationError::InvalidServiceUrl {
                field,
                value: value.clone(),
            });
        }
    }

    Ok(())
}

fn validate_ports(config: &Config) -> Result<(), ValidationError> {
    if config.elasticsearch.port == 0 {
        return Err(ValidationError::InvalidPort {
            field: "elasticsearch",
        });
    }
    if config.kibana.port == 0 {
        return Err(ValidationError::InvalidPort { field: "kibana" });
    }
    Ok(())
}

fn validate_readiness(config: &Config) -> Result<(), ValidationError> {
    let readiness = &config.readiness;

    if readiness.interval_ms == 0 {
        return Err(ValidationError::InvalidReadiness {
            field: "interval_ms",
        });
    }
    if readiness.max_attempts == 0 {
        return Err(ValidationError::InvalidReadiness {
            field: "max_attempts",
        });
    }
    if readiness.request_timeout_ms == 0 {
        return Err(ValidationError::InvalidReadiness {
            field: "request_timeout_ms",
        });
    }

    Ok(())
}
