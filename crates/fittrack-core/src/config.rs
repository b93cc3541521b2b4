use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "FITTRACK_API_URL";

/// Base URL used when neither the environment nor the config file set one.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Backend API settings
    pub api: ApiConfig,

    /// Display unit preferences
    #[serde(default)]
    pub units: UnitSettings,

    /// Local friends storage
    #[serde(default)]
    pub friends: FriendsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the sessions API, without the trailing `/sessions/`
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Distance display unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DistanceUnit {
    #[serde(rename = "m")]
    Meters,
    #[default]
    #[serde(rename = "km")]
    Kilometers,
    #[serde(rename = "mi")]
    Miles,
}

impl std::str::FromStr for DistanceUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m" => Ok(Self::Meters),
            "km" => Ok(Self::Kilometers),
            "mi" => Ok(Self::Miles),
            other => Err(format!("unknown distance unit '{}' (expected m, km or mi)", other)),
        }
    }
}

/// Duration display format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TimeUnit {
    #[default]
    #[serde(rename = "min")]
    Minutes,
    #[serde(rename = "hr:min")]
    HoursMinutes,
}

impl std::str::FromStr for TimeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "min" => Ok(Self::Minutes),
            "hr:min" => Ok(Self::HoursMinutes),
            other => Err(format!("unknown time unit '{}' (expected min or hr:min)", other)),
        }
    }
}

/// Unit preferences passed explicitly to every formatting function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UnitSettings {
    #[serde(default)]
    pub distance_unit: DistanceUnit,
    #[serde(default)]
    pub time_unit: TimeUnit,
}

impl UnitSettings {
    /// Apply a partial update, leaving unset fields as they were.
    pub fn updated(self, distance_unit: Option<DistanceUnit>, time_unit: Option<TimeUnit>) -> Self {
        Self {
            distance_unit: distance_unit.unwrap_or(self.distance_unit),
            time_unit: time_unit.unwrap_or(self.time_unit),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendsConfig {
    /// JSON file (relative to the config directory) holding friends and requests
    #[serde(default = "default_friends_store_file")]
    pub store_file: String,
}

fn default_friends_store_file() -> String {
    "friends.json".to_string()
}

impl Default for FriendsConfig {
    fn default() -> Self {
        Self {
            store_file: default_friends_store_file(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fittrack");

        Self {
            config_dir,
            api: ApiConfig::default(),
            units: UnitSettings::default(),
            friends: FriendsConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing,
    /// then apply environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let config = Self::load_from(&config_path)?;
        Ok(config.with_api_url_override(std::env::var(API_URL_ENV).ok()))
    }

    /// Load configuration from an explicit path, writing defaults there if
    /// the file does not exist yet.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::info!("No config at {}, writing defaults", config_path.display());
            let mut config = Self::default();
            if let Some(parent) = config_path.parent() {
                config.config_dir = parent.to_path_buf();
            }
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            ConfigError::ParseError(format!("{}: {}", config_path.display(), e))
        })?;

        Ok(config)
    }

    /// Load configuration, apply `api_url` over the file and environment
    /// values, and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns [`ConfigError::Invalid`] if validation fails with critical errors.
    pub fn load_validated(api_url: Option<String>) -> Result<(Self, ValidationResult)> {
        let config = Self::load()?.with_api_url_override(api_url);
        let validation = config.validated()?;
        Ok((config, validation))
    }

    /// Validate, turning errors into [`ConfigError::Invalid`] and logging warnings.
    pub fn validated(&self) -> Result<ValidationResult> {
        let validation = self.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(validation)
    }

    /// Replace the API base URL when an override is present and non-empty.
    pub fn with_api_url_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            tracing::debug!("API base URL overridden by {}: {}", API_URL_ENV, url);
            self.api.base_url = url.trim().to_string();
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.api.base_url, "api.base_url", &mut result);

        if self.api.timeout_secs == 0 {
            result.add_error("api.timeout_secs", "Timeout must be greater than 0");
        } else if self.api.timeout_secs > 120 {
            result.add_warning(
                "api.timeout_secs",
                "Timeout is unusually long (>120 seconds)",
            );
        }

        if self.friends.store_file.trim().is_empty() {
            result.add_error("friends.store_file", "Store file name cannot be empty");
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Path of the friends JSON store.
    pub fn friends_store_path(&self) -> PathBuf {
        self.config_dir.join(&self.friends.store_file)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("fittrack");

        Ok(config_dir.join("config.toml"))
    }
}
