//! Dev server configuration
//!
//! - `DEV_SERVER_PORT`: port to listen on (default 3001)
//! - `DEV_SERVER_CSRF_TOKEN`: when set, mutating requests must carry it in `X-CSRFToken`

use opcsim_core::ConfigError;

pub const DEFAULT_PORT: u16 = 3001;

pub const ENV_PORT: &str = "DEV_SERVER_PORT";
pub const ENV_CSRF_TOKEN: &str = "DEV_SERVER_CSRF_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevServerConfig {
    pub port: u16,
    pub csrf_token: Option<String>,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            csrf_token: None,
        }
    }
}

impl DevServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup(ENV_PORT).map(|p| p.trim().to_string()) {
            Some(raw) if !raw.is_empty() => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::invalid_value(ENV_PORT, raw))?,
            _ => DEFAULT_PORT,
        };

        let csrf_token = lookup(ENV_CSRF_TOKEN)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(Self { port, csrf_token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(DevServerConfig::from_lookup(|_| None).unwrap(), DevServerConfig::default());
    }

    #[test]
    fn test_reads_port_and_token() {
        let config = DevServerConfig::from_lookup(|key| match key {
            ENV_PORT => Some("4010".to_string()),
            ENV_CSRF_TOKEN => Some("secret".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.port, 4010);
        assert_eq!(config.csrf_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_invalid_port() {
        let err = DevServerConfig::from_lookup(|key| (key == ENV_PORT).then(|| "70000".to_string()))
            .unwrap_err();
        assert_eq!(err, ConfigError::invalid_value(ENV_PORT, "70000"));
    }
}
