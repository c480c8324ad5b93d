//! Configuration management for Lambda functions.

use std::env;
use std::time::Duration;

use crate::Result;

/// Default OpenWeather API root.
pub const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
/// Default ExchangeRate-API root.
pub const DEFAULT_EXCHANGE_BASE_URL: &str = "https://v6.exchangerate-api.com/v6";
/// Default bound on a single upstream call.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Application configuration loaded from environment variables.
///
/// Read once at cold start and handed to each proxy. A missing credential
/// puts the matching proxy into mock mode.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenWeather API key
    pub openweather_api_key: Option<String>,
    /// ExchangeRate-API key
    pub exchange_api_key: Option<String>,
    /// Quote source endpoint
    pub quotes_api_url: Option<String>,
    /// OpenWeather API root
    pub openweather_base_url: String,
    /// ExchangeRate-API root
    pub exchange_base_url: String,
    /// Timeout applied to every upstream call
    pub upstream_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openweather_api_key: None,
            exchange_api_key: None,
            quotes_api_url: None,
            openweather_base_url: DEFAULT_OPENWEATHER_BASE_URL.to_string(),
            exchange_base_url: DEFAULT_EXCHANGE_BASE_URL.to_string(),
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let upstream_timeout = non_empty("UPSTREAM_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT);

        Self {
            openweather_api_key: non_empty("OPENWEATHER_API_KEY"),
            exchange_api_key: non_empty("EXCHANGE_API_KEY"),
            quotes_api_url: non_empty("QUOTES_API_URL"),
            openweather_base_url: non_empty("OPENWEATHER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENWEATHER_BASE_URL.to_string()),
            exchange_base_url: non_empty("EXCHANGE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_EXCHANGE_BASE_URL.to_string()),
            upstream_timeout,
        }
    }

    pub fn with_openweather_api_key(mut self, key: impl Into<String>) -> Self {
        self.openweather_api_key = Some(key.into());
        self
    }

    pub fn with_exchange_api_key(mut self, key: impl Into<String>) -> Self {
        self.exchange_api_key = Some(key.into());
        self
    }

    pub fn with_quotes_api_url(mut self, url: impl Into<String>) -> Self {
        self.quotes_api_url = Some(url.into());
        self
    }

    pub fn with_openweather_base_url(mut self, url: impl Into<String>) -> Self {
        self.openweather_base_url = url.into();
        self
    }

    pub fn with_exchange_base_url(mut self, url: impl Into<String>) -> Self {
        self.exchange_base_url = url.into();
        self
    }

    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    /// Build the HTTP client used for upstream calls.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .timeout(self.upstream_timeout)
            .build()?;
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_empty_environment_is_all_mock() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert!(config.openweather_api_key.is_none());
        assert!(config.exchange_api_key.is_none());
        assert!(config.quotes_api_url.is_none());
        assert_eq!(config.openweather_base_url, DEFAULT_OPENWEATHER_BASE_URL);
        assert_eq!(config.exchange_base_url, DEFAULT_EXCHANGE_BASE_URL);
        assert_eq!(config.upstream_timeout, DEFAULT_UPSTREAM_TIMEOUT);
    }

    #[test]
    fn test_blank_keys_count_as_absent() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENWEATHER_API_KEY", "   "),
            ("EXCHANGE_API_KEY", ""),
        ]));
        assert!(config.openweather_api_key.is_none());
        assert!(config.exchange_api_key.is_none());
    }

    #[test]
    fn test_keys_and_overrides_are_read() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENWEATHER_API_KEY", "ow-key"),
            ("EXCHANGE_API_KEY", "fx-key"),
            ("QUOTES_API_URL", "https://quotes.example.com/random"),
            ("OPENWEATHER_BASE_URL", "http://localhost:9000"),
            ("UPSTREAM_TIMEOUT_SECS", "3"),
        ]));
        assert_eq!(config.openweather_api_key.as_deref(), Some("ow-key"));
        assert_eq!(config.exchange_api_key.as_deref(), Some("fx-key"));
        assert_eq!(
            config.quotes_api_url.as_deref(),
            Some("https://quotes.example.com/random")
        );
        assert_eq!(config.openweather_base_url, "http://localhost:9000");
        assert_eq!(config.upstream_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_bad_timeout_falls_back_to_default() {
        for raw in ["0", "soon", "-4"] {
            let config = Config::from_lookup(lookup_from(&[("UPSTREAM_TIMEOUT_SECS", raw)]));
            assert_eq!(config.upstream_timeout, DEFAULT_UPSTREAM_TIMEOUT);
        }
    }
}
