use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Environment variable that overrides `weather.api_key`.
pub const API_KEY_ENV: &str = "SKYGLANCE_API_KEY";

/// Maximum result count the geocoding provider honours per request.
const PROVIDER_GEOCODE_CAP: u32 = 5;

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

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Weather provider settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Autocomplete timing and filtering
    #[serde(default)]
    pub autocomplete: AutocompleteConfig,
}

/// Measurement system requested from the forecast provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

/// A fixed latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeather API key (overridden by `SKYGLANCE_API_KEY`)
    #[serde(default)]
    pub api_key: String,

    /// Measurement system for temperatures and wind speed
    #[serde(default)]
    pub units: Units,

    /// Number of autocomplete suggestions requested per query
    #[serde(default = "default_suggest_limit")]
    pub suggest_limit: u32,

    /// City looked up on startup
    #[serde(default = "default_city")]
    pub default_city: String,

    #[serde(default = "default_geocode_url")]
    pub geocode_url: String,

    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,

    /// Base URL that icon codes are appended to
    #[serde(default = "default_icon_base_url")]
    pub icon_base_url: String,

    /// Per-request timeout in seconds; 0 waits indefinitely
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Position reported by hosts without geolocation hardware
    #[serde(default)]
    pub home_location: Option<Coordinates>,
}

fn default_suggest_limit() -> u32 {
    7
}

fn default_city() -> String {
    "Ulaanbaatar, MN".to_string()
}

fn default_geocode_url() -> String {
    "https://api.openweathermap.org/geo/1.0/direct".to_string()
}

fn default_forecast_url() -> String {
    "https://api.openweathermap.org/data/3.0/onecall".to_string()
}

fn default_icon_base_url() -> String {
    "https://openweathermap.org/img/wn".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            units: Units::default(),
            suggest_limit: default_suggest_limit(),
            default_city: default_city(),
            geocode_url: default_geocode_url(),
            forecast_url: default_forecast_url(),
            icon_base_url: default_icon_base_url(),
            request_timeout_secs: default_request_timeout(),
            home_location: None,
        }
    }
}

impl WeatherConfig {
    /// Check if an API key is present
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Request timeout, or `None` when disabled
    pub fn request_timeout(&self) -> Option<std::time::Duration> {
        (self.request_timeout_secs > 0)
            .then(|| std::time::Duration::from_secs(self.request_timeout_secs))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutocompleteConfig {
    /// Quiet period after the last keystroke before querying
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Delay between focus loss and closing the suggestion list
    #[serde(default = "default_blur_grace_ms")]
    pub blur_grace_ms: u64,

    /// Minimum trimmed query length that triggers a lookup
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// Drop suggestion responses overtaken by a newer request
    #[serde(default)]
    pub discard_stale_responses: bool,
}

fn default_debounce_ms() -> u64 {
    250
}

fn default_blur_grace_ms() -> u64 {
    120
}

fn default_min_query_len() -> usize {
    2
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            blur_grace_ms: default_blur_grace_ms(),
            min_query_len: default_min_query_len(),
            discard_stale_responses: false,
        }
    }
}


impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, writing defaults there if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str::<Config>(&contents)
                .map_err(|e| ConfigError::ParseError(e.to_string()))
                .context("Failed to parse config file")?
        } else {
            let config = Self::default();
            config.save_to(path)?;
            config
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                tracing::debug!("Using API key from {}", API_KEY_ENV);
                config.weather.api_key = key;
            }
        }

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()))
                .context("Configuration validation failed");
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.geocode_url, "weather.geocode_url", &mut result);
        self.validate_url(&self.weather.forecast_url, "weather.forecast_url", &mut result);
        self.validate_url(
            &self.weather.icon_base_url,
            "weather.icon_base_url",
            &mut result,
        );

        if !self.weather.is_configured() {
            result.add_warning(
                "weather.api_key",
                format!("No API key configured - set it in the config file or {API_KEY_ENV}"),
            );
        }

        if self.weather.suggest_limit == 0 {
            result.add_error("weather.suggest_limit", "Suggestion limit must be at least 1");
        } else if self.weather.suggest_limit > PROVIDER_GEOCODE_CAP {
            result.add_warning(
                "weather.suggest_limit",
                format!(
                    "Provider returns at most {PROVIDER_GEOCODE_CAP} results; extra suggestions will never appear"
                ),
            );
        }

        if self.weather.default_city.trim().is_empty() {
            result.add_warning("weather.default_city", "No startup city; nothing loads on launch");
        }

        if self.weather.request_timeout_secs == 0 {
            result.add_warning(
                "weather.request_timeout_secs",
                "Request timeout disabled; a hung request waits indefinitely",
            );
        }

        if let Some(home) = self.weather.home_location {
            if !(-90.0..=90.0).contains(&home.latitude)
                || !(-180.0..=180.0).contains(&home.longitude)
            {
                result.add_error(
                    "weather.home_location",
                    "Latitude must be -90 to 90 and longitude -180 to 180",
                );
            }
        }

        if self.autocomplete.min_query_len == 0 {
            result.add_error(
                "autocomplete.min_query_len",
                "Minimum query length must be at least 1",
            );
        }

        if self.autocomplete.debounce_ms == 0 {
            result.add_warning(
                "autocomplete.debounce_ms",
                "Debounce disabled; every keystroke issues a lookup",
            );
        }

        result
    }

    /// Validate a URL field
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
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("skyglance");

        Ok(config_dir.join("config.toml"))
    }
}
