//! Application configuration settings.

use serde::{Deserialize, Serialize};
use url::Url;

/// Default authorization server.
pub const DEFAULT_BASE_URL: &str = "https://injectionator.com";

/// Main configuration for n8r.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct N8rConfig {
    /// Authorization server settings.
    pub api: ApiConfig,
}

/// Authorization server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the authorization server.
    #[serde(with = "url_serde")]
    pub base_url: Url,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("valid default URL"),
            timeout_secs: 30,
        }
    }
}

/// Custom serde module for URL serialization.
mod url_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use url::Url;

    pub fn serialize<S>(url: &Url, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(url.as_str())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Url, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Url::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Environment variables that can override configuration.
pub mod env {
    pub const BASE_URL: &str = "N8R_BASE_URL";
    pub const LOG_LEVEL: &str = "N8R_LOG";
}

impl N8rConfig {
    /// Apply environment variable overrides to the configuration.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_base_url_override(std::env::var(env::BASE_URL).ok().as_deref())
    }

    fn with_base_url_override(mut self, value: Option<&str>) -> Self {
        if let Some(raw) = value {
            match Url::parse(raw) {
                Ok(parsed) => self.api.base_url = parsed,
                Err(e) => tracing::warn!(value = raw, error = %e, "ignoring invalid {}", env::BASE_URL),
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_production_server() {
        let config = N8rConfig::default();
        assert_eq!(config.api.base_url.as_str(), "https://injectionator.com/");
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: N8rConfig = toml::from_str(
            r#"
            [api]
            timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.api.base_url.as_str(), "https://injectionator.com/");
    }

    #[test]
    fn toml_rejects_invalid_url() {
        let result: std::result::Result<N8rConfig, _> = toml::from_str(
            r#"
            [api]
            base_url = "not a url"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn base_url_override_applies_valid_url() {
        let config =
            N8rConfig::default().with_base_url_override(Some("http://localhost:8080"));
        assert_eq!(config.api.base_url.as_str(), "http://localhost:8080/");
    }

    #[test]
    fn base_url_override_ignores_invalid_url() {
        let config = N8rConfig::default().with_base_url_override(Some("::nope::"));
        assert_eq!(config.api.base_url.as_str(), "https://injectionator.com/");
    }
}
