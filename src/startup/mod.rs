//! Startup checks: API key preflight and the readiness probe.

mod readiness;

pub use readiness::{ReadinessHandle, ReadinessOutcome, ReadinessProbe};

use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("API key for Autofocus is not set (AUTOFOCUS_API_KEY)")]
    MissingApiKey,
}

/// Refuses to start without a usable Autofocus API key.
pub fn preflight(config: &Config) -> Result<(), StartupError> {
    if !config.autofocus.has_api_key() {
        return Err(StartupError::MissingApiKey);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::API_KEY_NOT_SET;

    #[test]
    fn preflight_requires_api_key() {
        let mut config = Config::default();
        assert!(matches!(preflight(&config), Err(StartupError::MissingApiKey)));

        config.autofocus.api_key = Some(API_KEY_NOT_SET.to_string());
        assert!(preflight(&config).is_err());

        config.autofocus.api_key = Some("af-key".to_string());
        assert!(preflight(&config).is_ok());
    }
}
