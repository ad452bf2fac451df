//! Runtime configuration.

use std::time::Duration;

use thiserror::Error;

use crate::cache::DEFAULT_POLL_INTERVAL;
use crate::client::DEFAULT_BASE_URL;
use crate::listener::ReconnectPolicy;

pub const ENV_API_URL: &str = "DEVBOX_API_URL";
pub const ENV_POLL_INTERVAL_MS: &str = "DEVBOX_POLL_INTERVAL_MS";
pub const ENV_RECONNECT_MAX_SECS: &str = "DEVBOX_RECONNECT_MAX_SECS";

/// Errors from loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid API URL '{0}': expected http:// or https://")]
    InvalidApiUrl(String),

    #[error("invalid poll interval '{0}': expected a positive number of milliseconds")]
    InvalidPollInterval(String),

    #[error("invalid reconnect backoff '{0}': expected a positive number of seconds")]
    InvalidReconnectMax(String),
}

/// Client configuration.
///
/// # Example
///
/// ```ignore
/// use devbox::config::DevboxConfig;
///
/// let config = DevboxConfig::default()
///     .with_base_url("http://127.0.0.1:10101/api/v1")
///     .with_poll_interval(Duration::from_secs(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevboxConfig {
    /// REST base URL, without a trailing slash
    pub base_url: String,
    /// Refetch period for subscribed queries
    pub poll_interval: Duration,
    /// Cap on the event stream reconnect delay
    pub reconnect_max: Duration,
}

impl Default for DevboxConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            reconnect_max: ReconnectPolicy::default().max_backoff,
        }
    }
}

impl DevboxConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_reconnect_max(mut self, max: Duration) -> Self {
        self.reconnect_max = max;
        self
    }

    /// Reconnect policy for the event listener.
    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy::default().with_max_backoff(self.reconnect_max)
    }

    /// Load from `DEVBOX_*` environment variables, using defaults for unset
    /// ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` in place of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            let url = url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidApiUrl(url.to_string()));
            }
            config = config.with_base_url(url);
        }

        if let Some(raw) = lookup(ENV_POLL_INTERVAL_MS) {
            let millis = parse_positive(&raw)
                .ok_or_else(|| ConfigError::InvalidPollInterval(raw.clone()))?;
            config = config.with_poll_interval(Duration::from_millis(millis));
        }

        if let Some(raw) = lookup(ENV_RECONNECT_MAX_SECS) {
            let secs = parse_positive(&raw)
                .ok_or_else(|| ConfigError::InvalidReconnectMax(raw.clone()))?;
            config = config.with_reconnect_max(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

fn parse_positive(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|v| *v > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DevboxConfig::default();
        assert_eq!(config.base_url, "http://localhost:10101/api/v1");
        assert_eq!(config.poll_interval, Duration::from_millis(5000));
        assert_eq!(config.reconnect_max, Duration::from_secs(30));
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let config = DevboxConfig::new().with_base_url("http://gw:8080/api/v1/");
        assert_eq!(config.base_url, "http://gw:8080/api/v1");
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = DevboxConfig::from_lookup(lookup(&[
            (ENV_API_URL, "https://inbox.test/api/v1/"),
            (ENV_POLL_INTERVAL_MS, "250"),
            (ENV_RECONNECT_MAX_SECS, "5"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://inbox.test/api/v1");
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.reconnect_policy().max_backoff, Duration::from_secs(5));
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        assert_eq!(
            DevboxConfig::from_lookup(lookup(&[(ENV_API_URL, "localhost:10101")])),
            Err(ConfigError::InvalidApiUrl("localhost:10101".to_string()))
        );
        assert_eq!(
            DevboxConfig::from_lookup(lookup(&[(ENV_POLL_INTERVAL_MS, "0")])),
            Err(ConfigError::InvalidPollInterval("0".to_string()))
        );
        assert!(matches!(
            DevboxConfig::from_lookup(lookup(&[(ENV_RECONNECT_MAX_SECS, "soon")])),
            Err(ConfigError::InvalidReconnectMax(_))
        ));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var(ENV_POLL_INTERVAL_MS, "1200");
        std::env::remove_var(ENV_API_URL);
        std::env::remove_var(ENV_RECONNECT_MAX_SECS);

        let config = DevboxConfig::from_env().unwrap();
        std::env::remove_var(ENV_POLL_INTERVAL_MS);

        assert_eq!(config.poll_interval, Duration::from_millis(1200));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
