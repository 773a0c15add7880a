//! Client configuration.

use secrecy::SecretString;
use serde::Deserialize;

use crate::error::{ApiError, Result};

/// Default API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.datadoghq.com/";

/// Default request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const API_KEY_VARS: [&str; 2] = ["DD_API_KEY", "DATADOG_API_KEY"];
const APP_KEY_VARS: [&str; 2] = ["DD_APP_KEY", "DATADOG_APP_KEY"];
const HOST_VARS: [&str; 2] = ["DD_HOST", "DATADOG_HOST"];

/// Credentials and endpoint of the boards API.
///
/// Deserializable from the provider configuration block:
///
/// ```json
/// { "api_key": "...", "app_key": "...", "api_url": "https://api.datadoghq.eu/" }
/// ```
#[derive(Debug, Deserialize)]
pub struct ClientConfig {
    /// API key, sent as `DD-API-KEY`
    pub api_key: SecretString,

    /// Application key, sent as `DD-APPLICATION-KEY`
    pub app_key: SecretString,

    /// Base URL of the API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ClientConfig {
    /// Creates a configuration for the default endpoint.
    pub fn new(api_key: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            app_key: SecretString::from(app_key.into()),
            api_url: default_api_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Reads the configuration from the environment.
    ///
    /// Keys come from `DD_API_KEY` / `DATADOG_API_KEY` and `DD_APP_KEY` /
    /// `DATADOG_APP_KEY`. The endpoint comes from `DD_HOST` / `DATADOG_HOST`
    /// when set. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] when either key is missing.
    pub fn from_env() -> Result<Self> {
        let api_key = first_env(&API_KEY_VARS)
            .ok_or_else(|| ApiError::config("DD_API_KEY or DATADOG_API_KEY must be set"))?;
        let app_key = first_env(&APP_KEY_VARS)
            .ok_or_else(|| ApiError::config("DD_APP_KEY or DATADOG_APP_KEY must be set"))?;

        let mut config = Self::new(api_key, app_key);
        if let Some(host) = first_env(&HOST_VARS) {
            config.api_url = host;
        }
        Ok(config)
    }

    /// Overrides the API endpoint.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Overrides the request timeout.
    #[must_use]
    pub const fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// URL of the dashboard collection endpoint.
    #[must_use]
    pub fn dashboards_url(&self) -> String {
        let base = self.api_url.trim_end_matches('/');
        let base = if base.starts_with("http://") || base.starts_with("https://") {
            base.to_string()
        } else {
            format!("https://{base}")
        };
        format!("{base}/api/v1/dashboard")
    }
}

fn first_env(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_dashboards_url_trims_slash() {
        let config = ClientConfig::new("api", "app");
        assert_eq!(
            config.dashboards_url(),
            "https://api.datadoghq.com/api/v1/dashboard"
        );
    }

    #[test]
    fn test_dashboards_url_adds_scheme() {
        let config = ClientConfig::new("api", "app").with_api_url("api.datadoghq.eu");
        assert_eq!(
            config.dashboards_url(),
            "https://api.datadoghq.eu/api/v1/dashboard"
        );
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"api_key": "k1", "app_key": "k2"}"#).unwrap();
        assert_eq!(config.api_key.expose_secret(), "k1");
        assert_eq!(config.app_key.expose_secret(), "k2");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = ClientConfig::new("very-secret-api-key", "very-secret-app-key");
        let debug = format!("{config:?}");
        assert!(!debug.contains("very-secret-api-key"));
        assert!(!debug.contains("very-secret-app-key"));
    }

    #[test]
    fn test_from_env_prefers_short_names() {
        temp_env::with_vars(
            [
                ("DD_API_KEY", Some("short-api")),
                ("DATADOG_API_KEY", Some("long-api")),
                ("DD_APP_KEY", None),
                ("DATADOG_APP_KEY", Some("long-app")),
                ("DD_HOST", Some("https://api.us5.datadoghq.com")),
                ("DATADOG_HOST", None),
            ],
            || {
                let config = ClientConfig::from_env().unwrap();
                assert_eq!(config.api_key.expose_secret(), "short-api");
                assert_eq!(config.app_key.expose_secret(), "long-app");
                assert_eq!(config.api_url, "https://api.us5.datadoghq.com");
            },
        );
    }

    #[test]
    fn test_from_env_requires_keys() {
        temp_env::with_vars(
            [
                ("DD_API_KEY", Some("")),
                ("DATADOG_API_KEY", None::<&str>),
                ("DD_APP_KEY", Some("app")),
                ("DATADOG_APP_KEY", None),
            ],
            || {
                let err = ClientConfig::from_env().unwrap_err();
                assert!(matches!(err, ApiError::Config { .. }));
                assert!(err.to_string().contains("DD_API_KEY"));
            },
        );
    }
}
