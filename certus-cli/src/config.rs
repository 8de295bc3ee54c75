//! Configuration loading for the CERTUS CLI.
//!
//! The connection fields are required. `[display]` and `[logging]` may be
//! omitted and fall back to their defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use certus_catalog::{RestCatalogConfig, RESOURCE_PLACEHOLDER};
use certus_render::{ChronoDateFormatter, DEFAULT_DATETIME_FORMAT, DEFAULT_DATE_FORMAT};
use serde::Deserialize;

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV: &str = "CERTUS_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    pub api_base_url: String,
    /// Searchable-fields path template containing `{resource}`.
    pub filters_path: String,
    pub enums_path: String,
    pub request_timeout_ms: u64,
    pub auth: AuthConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    pub api_key: Option<String>,
    pub bearer_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct DisplayConfig {
    pub date_format: String,
    pub datetime_format: String,
    pub compact: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
            compact: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`.
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "certus=info,warn".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or CERTUS_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl CliConfig {
    /// Load and validate the config at `path`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url",
                reason: "must not be empty".to_string(),
            });
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url",
                reason: "must start with http:// or https://".to_string(),
            });
        }
        if !self.filters_path.contains(RESOURCE_PLACEHOLDER) {
            return Err(ConfigError::InvalidValue {
                field: "filters_path",
                reason: format!("must contain {}", RESOURCE_PLACEHOLDER),
            });
        }
        if !self.filters_path.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "filters_path",
                reason: "must start with /".to_string(),
            });
        }
        if !self.enums_path.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "enums_path",
                reason: "must start with /".to_string(),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.auth.api_key.is_none() && self.auth.bearer_token.is_none() {
            return Err(ConfigError::InvalidValue {
                field: "auth",
                reason: "api_key or bearer_token must be provided".to_string(),
            });
        }
        self.display.date_formatter()?;
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "logging.filter",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn rest_config(&self) -> RestCatalogConfig {
        let mut rest = RestCatalogConfig::new(self.api_base_url.trim())
            .with_filters_path(self.filters_path.clone())
            .with_enums_path(self.enums_path.clone())
            .with_timeout(Duration::from_millis(self.request_timeout_ms));
        if let Some(api_key) = &self.auth.api_key {
            rest = rest.with_api_key(api_key.clone());
        }
        if let Some(token) = &self.auth.bearer_token {
            rest = rest.with_bearer_token(token.clone());
        }
        rest
    }
}

impl DisplayConfig {
    pub fn date_formatter(&self) -> Result<ChronoDateFormatter, ConfigError> {
        ChronoDateFormatter::new(self.date_format.clone(), self.datetime_format.clone()).map_err(
            |e| ConfigError::InvalidValue {
                field: "display",
                reason: e.to_string(),
            },
        )
    }
}
