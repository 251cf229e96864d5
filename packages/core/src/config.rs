//! Client Configuration
//!
//! Settings for talking to the node backend, read from the environment:
//!
//! - `OPCSIM_API_URL`: backend base URL (default `http://127.0.0.1:8000`)
//! - `OPCSIM_CSRF_TOKEN`: token sent as `X-CSRFToken` on mutating requests
//! - `OPCSIM_TIMEOUT_SECS`: request timeout in seconds (default 30)
//! - `OPCSIM_MAX_BATCH_SIZE`: largest batch accepted by the validator (default 10000)

use crate::operations::DEFAULT_MAX_BATCH_SIZE;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_URL: &str = "OPCSIM_API_URL";
pub const ENV_CSRF_TOKEN: &str = "OPCSIM_CSRF_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "OPCSIM_TIMEOUT_SECS";
pub const ENV_MAX_BATCH_SIZE: &str = "OPCSIM_MAX_BATCH_SIZE";

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn invalid_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

/// Backend client settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL the `/api/nodes/` paths are appended to
    pub base_url: String,
    pub csrf_token: Option<String>,
    pub timeout_secs: u64,
    pub max_batch_size: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            csrf_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

impl ClientConfig {
    /// Default settings pointed at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_max_batch_size(mut self, max_batch_size: u64) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    /// Read settings from the process environment, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = non_empty(lookup(ENV_API_URL)) {
            config.base_url = url;
        }
        config.csrf_token = non_empty(lookup(ENV_CSRF_TOKEN));
        if let Some(raw) = non_empty(lookup(ENV_TIMEOUT_SECS)) {
            config.timeout_secs = parse_number(ENV_TIMEOUT_SECS, &raw)?;
        }
        if let Some(raw) = non_empty(lookup(ENV_MAX_BATCH_SIZE)) {
            config.max_batch_size = parse_number(ENV_MAX_BATCH_SIZE, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the settings are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::invalid("base_url must not be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::invalid(format!(
                "base_url must start with http:// or https://, got '{}'",
                url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid("timeout_secs must be greater than 0"));
        }
        if self.max_batch_size == 0 {
            return Err(ConfigError::invalid("max_batch_size must be greater than 0"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_number(key: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.parse::<u64>()
        .map_err(|_| ConfigError::invalid_value(key, raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.max_batch_size, DEFAULT_MAX_BATCH_SIZE);
    }

    #[test]
    fn test_reads_every_variable() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_URL, "http://sim.local:9000/"),
            (ENV_CSRF_TOKEN, "abc123"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_MAX_BATCH_SIZE, "250"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://sim.local:9000/");
        assert_eq!(config.csrf_token.as_deref(), Some("abc123"));
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.max_batch_size, 250);
    }

    #[test]
    fn test_blank_token_is_absent() {
        let config = ClientConfig::from_lookup(lookup(&[(ENV_CSRF_TOKEN, "   ")])).unwrap();
        assert_eq!(config.csrf_token, None);
    }

    #[test]
    fn test_unparseable_number_is_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert_eq!(err, ConfigError::invalid_value(ENV_TIMEOUT_SECS, "soon"));
    }

    #[test]
    fn test_validate() {
        assert!(ClientConfig::new("ftp://x").validate().is_err());
        assert!(ClientConfig::default().with_timeout_secs(0).validate().is_err());
        assert!(ClientConfig::default().with_max_batch_size(0).validate().is_err());
        assert!(ClientConfig::new("https://x").validate().is_ok());
    }
}
