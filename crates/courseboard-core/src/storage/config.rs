//! TOML-based dashboard configuration.
//!
//! Stores:
//! - Content and analytics service endpoints, tokens and timeouts
//! - Cache TTL
//! - Video timeline segment size
//! - Display labels and list limits
//! - Drill-down link base path
//!
//! Configuration is stored at `~/.config/courseboard/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data_dir;
use crate::error::ConfigError;

/// Environment variable overriding the content service token.
pub const CONTENT_TOKEN_ENV: &str = "COURSEBOARD_CONTENT_TOKEN";
/// Environment variable overriding the analytics service token.
pub const ANALYTICS_TOKEN_ENV: &str = "COURSEBOARD_ANALYTICS_TOKEN";

/// Connection settings for one upstream service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Seconds per video segment when the analytics record does not say.
    #[serde(default = "default_segment_size")]
    pub segment_size: u64,
}

/// Labels and limits used when building view models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_unknown_label")]
    pub unknown_label: String,
    #[serde(default = "default_top_countries")]
    pub top_countries: usize,
    #[serde(default = "default_answer_limit")]
    pub answer_chart_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    /// Prefix for drill-down URLs; empty for root-relative links.
    #[serde(default)]
    pub base_path: String,
}

/// Dashboard configuration.
///
/// Serialized to/from TOML at `~/.config/courseboard/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_content_service")]
    pub content_service: ServiceConfig,
    #[serde(default = "default_analytics_service")]
    pub analytics_service: ServiceConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub links: LinksConfig,
}

// Default functions
fn default_true() -> bool {
    true
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_ttl_secs() -> u64 {
    300
}
fn default_segment_size() -> u64 {
    crate::timeline::DEFAULT_SEGMENT_SIZE
}
fn default_unknown_label() -> String {
    "Unknown".into()
}
fn default_top_countries() -> usize {
    10
}
fn default_answer_limit() -> usize {
    12
}
fn default_content_service() -> ServiceConfig {
    ServiceConfig {
        base_url: "http://localhost:18000/api/courses/v1".into(),
        ..ServiceConfig::default()
    }
}
fn default_analytics_service() -> ServiceConfig {
    ServiceConfig {
        base_url: "http://localhost:8100/api/v0".into(),
        ..ServiceConfig::default()
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            segment_size: default_segment_size(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            unknown_label: default_unknown_label(),
            top_countries: default_top_countries(),
            answer_chart_limit: default_answer_limit(),
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_service: default_content_service(),
            analytics_service: default_analytics_service(),
            cache: CacheConfig::default(),
            timeline: TimelineConfig::default(),
            display: DisplayConfig::default(),
            links: LinksConfig::default(),
        }
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(ConfigError::MissingKey("config key is empty".into()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be created.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the default location, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
        toml::from_str(&content).map_err(|e| load_failed(e.to_string()))
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key without persisting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Replace service tokens with values from the environment when set.
    ///
    /// Apply this to the config used for requests, not to one that will be
    /// saved.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(token) = std::env::var(CONTENT_TOKEN_ENV) {
            self.content_service.token = token;
        }
        if let Ok(token) = std::env::var(ANALYTICS_TOKEN_ENV) {
            self.analytics_service.token = token;
        }
        self
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|err| {
            tracing::warn!(%err, "falling back to default configuration");
            Self::default()
        })
    }
}
