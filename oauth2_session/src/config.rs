//! Central configuration for the oauth2_session crate

use std::{env, fmt, sync::LazyLock};

use thiserror::Error;

/// Route prefix under which the authentication endpoints are mounted
///
/// Default: "/auth"
pub static AUTH_ROUTE_PREFIX: LazyLock<String> =
    LazyLock::new(|| env::var("AUTH_ROUTE_PREFIX").unwrap_or_else(|_| "/auth".to_string()));

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration: {0} must be set and non-empty")]
    Missing(&'static str),
}

/// Settings the process cannot start without.
///
/// Read once at startup; every value must be present and non-empty.
#[derive(Clone)]
pub struct AuthConfig {
    pub github_client_id: String,
    pub github_client_secret: String,
    pub github_redirect_uri: String,
    /// `memory`, a `redis://` URL, or a bare `host:port`
    pub cache_store_url: String,
    /// `sqlite` or `postgres`
    pub data_store_type: String,
    pub data_store_url: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("github_client_id", &self.github_client_id)
            .field("github_client_secret", &"[redacted]")
            .field("github_redirect_uri", &self.github_redirect_uri)
            .field("cache_store_url", &self.cache_store_url)
            .field("data_store_type", &self.data_store_type)
            .field("data_store_url", &"[redacted]")
            .finish()
    }
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let cache_store_url = required("CACHE_STORE_URL")
            .or_else(|_| required("REDIS_ADDR"))
            .map_err(|_| ConfigError::Missing("CACHE_STORE_URL"))?;

        Ok(Self {
            github_client_id: required("GITHUB_CLIENT_ID")?,
            github_client_secret: required("GITHUB_CLIENT_SECRET")?,
            github_redirect_uri: required("GITHUB_REDIRECT_URI")?,
            cache_store_url,
            data_store_type: required("DATA_STORE_TYPE")?,
            data_store_url: required("DATA_STORE_URL")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("GITHUB_CLIENT_ID", "client-id"),
            ("GITHUB_CLIENT_SECRET", "client-secret"),
            ("GITHUB_REDIRECT_URI", "http://localhost:8000/auth/github/callback"),
            ("CACHE_STORE_URL", "memory"),
            ("DATA_STORE_TYPE", "sqlite"),
            ("DATA_STORE_URL", "sqlite::memory:"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<AuthConfig, ConfigError> {
        AuthConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn test_from_lookup_complete() {
        let config = load(&full_env()).unwrap();
        assert_eq!(config.github_client_id, "client-id");
        assert_eq!(config.cache_store_url, "memory");
        assert_eq!(config.data_store_type, "sqlite");
    }

    #[test]
    fn test_from_lookup_missing_value() {
        let mut vars = full_env();
        vars.remove("GITHUB_CLIENT_SECRET");
        assert_eq!(
            load(&vars).unwrap_err(),
            ConfigError::Missing("GITHUB_CLIENT_SECRET")
        );
    }

    #[test]
    fn test_from_lookup_blank_value_is_missing() {
        let mut vars = full_env();
        vars.insert("GITHUB_CLIENT_ID", "   ");
        assert_eq!(
            load(&vars).unwrap_err(),
            ConfigError::Missing("GITHUB_CLIENT_ID")
        );
    }

    #[test]
    fn test_from_lookup_falls_back_to_redis_addr() {
        let mut vars = full_env();
        vars.remove("CACHE_STORE_URL");
        vars.insert("REDIS_ADDR", "localhost:6379");
        let config = load(&vars).unwrap();
        assert_eq!(config.cache_store_url, "localhost:6379");

        vars.remove("REDIS_ADDR");
        assert_eq!(
            load(&vars).unwrap_err(),
            ConfigError::Missing("CACHE_STORE_URL")
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = load(&full_env()).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("client-secret"));
        assert!(debug.contains("[redacted]"));
    }
}
