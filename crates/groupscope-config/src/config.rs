//! Groupscope configuration.

use std::path::Path;
use std::time::Duration;

use groupscope_telemetry::LogConfig;
use serde::{Deserialize, Serialize};

use crate::duration;
use crate::error::{ConfigError, ConfigResult};

/// Default upstream API root.
pub const DEFAULT_BASE_URL: &str = "https://app.airfocus.com/api";

/// Prefix of every environment override.
pub const ENV_PREFIX: &str = "GROUPSCOPE_";

/// Top-level configuration.
///
/// The API token is deliberately absent: it is supplied per operation by the
/// caller and never stored in a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GroupscopeConfig {
    /// Upstream API settings.
    pub upstream: UpstreamSettings,
    /// Snapshot cache settings.
    pub cache: CacheSettings,
    /// Logging settings.
    pub logging: LogConfig,
}

impl GroupscopeConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> GroupscopeConfigBuilder {
        GroupscopeConfigBuilder::default()
    }

    /// Load configuration from a `.toml` or `.json` file.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing, unreadable, of another format, or does
    /// not parse.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        Self::from_str_with_format(&content, &extension)
    }

    /// Parse configuration from a string in the given format (`toml`/`json`).
    ///
    /// # Errors
    ///
    /// Fails on an unknown format or invalid content.
    pub fn from_str_with_format(content: &str, format: &str) -> ConfigResult<Self> {
        match format {
            "toml" => Ok(toml::from_str(content)?),
            "json" => Ok(serde_json::from_str(content)?),
            other => Err(ConfigError::unsupported_format(other)),
        }
    }

    /// Loads `.env` (if present), an optional file, then environment
    /// overrides, and validates the result.
    ///
    /// # Errors
    ///
    /// Any loading, override or validation failure.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        // A missing .env file is not an error.
        let _ = dotenvy::dotenv();

        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `GROUPSCOPE_*` environment variable overrides.
    ///
    /// | Variable | Field |
    /// |---|---|
    /// | `GROUPSCOPE_BASE_URL` | `upstream.base_url` |
    /// | `GROUPSCOPE_TIMEOUT` | `upstream.timeout` |
    /// | `GROUPSCOPE_CACHE_TTL` | `cache.ttl` |
    /// | `GROUPSCOPE_LOG_LEVEL` | `logging.level` |
    /// | `GROUPSCOPE_LOG_JSON` | `logging.json` |
    ///
    /// # Errors
    ///
    /// Fails when a duration or boolean variable does not parse.
    pub fn with_env_overrides(self) -> ConfigResult<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Fails when a duration or boolean variable does not parse.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            let key = format!("{ENV_PREFIX}{name}");
            lookup(&key).map(|value| (key, value))
        };

        if let Some((_, url)) = var("BASE_URL") {
            self.upstream.base_url = url;
        }

        if let Some((key, value)) = var("TIMEOUT") {
            self.upstream.timeout =
                duration::parse_duration(&value).map_err(|e| ConfigError::env_parse_error(key, e))?;
        }

        if let Some((key, value)) = var("CACHE_TTL") {
            self.cache.ttl =
                duration::parse_duration(&value).map_err(|e| ConfigError::env_parse_error(key, e))?;
        }

        if let Some((_, level)) = var("LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some((key, value)) = var("LOG_JSON") {
            self.logging.json = parse_bool(&value)
                .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
        }

        Ok(self)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Rejects a blank or non-http base URL and zero timeouts or TTL.
    pub fn validate(&self) -> ConfigResult<()> {
        let url = self.upstream.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::invalid_value("upstream.base_url", "is required"));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::invalid_value(
                "upstream.base_url",
                "must start with http:// or https://",
            ));
        }
        if self.upstream.timeout.is_zero() {
            return Err(ConfigError::invalid_value("upstream.timeout", "must be positive"));
        }
        if self.upstream.connect_timeout.is_zero() {
            return Err(ConfigError::invalid_value(
                "upstream.connect_timeout",
                "must be positive",
            ));
        }
        if self.cache.ttl.is_zero() {
            return Err(ConfigError::invalid_value("cache.ttl", "must be positive"));
        }
        Ok(())
    }
}

/// Upstream API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpstreamSettings {
    /// API root; paths such as `/team/users` are appended to it.
    pub base_url: String,
    /// Whole-request timeout.
    #[serde(with = "duration")]
    pub timeout: Duration,
    /// TCP connect timeout.
    #[serde(with = "duration")]
    pub connect_timeout: Duration,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

/// Snapshot cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheSettings {
    /// How long a snapshot stays fresh.
    #[serde(with = "duration")]
    pub ttl: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
        }
    }
}

/// Builder for [`GroupscopeConfig`].
#[derive(Debug, Default)]
pub struct GroupscopeConfigBuilder {
    config: GroupscopeConfig,
}

impl GroupscopeConfigBuilder {
    /// Set the upstream API root.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.upstream.base_url = url.into();
        self
    }

    /// Set the whole-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.config.upstream.timeout = timeout;
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.upstream.connect_timeout = timeout;
        self
    }

    /// Set the cache TTL.
    #[must_use]
    pub const fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache.ttl = ttl;
        self
    }

    /// Set the logging configuration.
    #[must_use]
    pub fn logging(mut self, logging: LogConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// See [`GroupscopeConfig::validate`].
    pub fn build(self) -> ConfigResult<GroupscopeConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
