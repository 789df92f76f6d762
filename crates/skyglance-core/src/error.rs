//! Centralized error types for Skyglance.
//!
//! Every failure that can reach the error banner is expressed here, and
//! `AppError::user_message()` yields the exact banner text.

use thiserror::Error;

/// Generic banner text when the forecast provider gives no reason.
pub const FORECAST_FALLBACK_MESSAGE: &str = "Weather request failed.";

/// Top-level application error type.
///
/// Use `user_message()` to get a UI-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Weather service error: {0}")]
    Weather(#[from] LookupFailure),

    #[error("Location error: {0}")]
    Location(#[from] LocationFailure),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns the message shown in the error banner.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Weather(e) => e.user_message(),
            AppError::Location(e) => e.user_message().to_string(),
            AppError::Config(e) => e.user_message().to_string(),
            AppError::Other(_) => "An unexpected error occurred. Please try again.".to_string(),
        }
    }
}

/// Weather lookup errors, as the user sees them.
#[derive(Debug, Error)]
pub enum LookupFailure {
    /// Search triggered with an empty text field
    #[error("Empty search text")]
    EmptyQuery,

    /// Geocoding succeeded but matched nothing
    #[error("No geocoding results for {0:?}")]
    CityNotFound(String),

    /// Geocoding request failed at the transport or provider level
    #[error("City lookup failed: {}", .message.as_deref().unwrap_or("no provider message"))]
    CityLookupFailed { message: Option<String> },

    /// Forecast request failed at the transport or provider level
    #[error("Forecast request failed: {}", .message.as_deref().unwrap_or("no provider message"))]
    ForecastFailed { message: Option<String> },
}

impl LookupFailure {
    pub fn user_message(&self) -> String {
        match self {
            LookupFailure::EmptyQuery => "Type a city name first.".to_string(),
            LookupFailure::CityNotFound(_) => "City not found.".to_string(),
            LookupFailure::CityLookupFailed { message } => message
                .clone()
                .unwrap_or_else(|| "City not found.".to_string()),
            LookupFailure::ForecastFailed { message } => message
                .clone()
                .unwrap_or_else(|| FORECAST_FALLBACK_MESSAGE.to_string()),
        }
    }
}

/// Device location errors.
#[derive(Debug, Error)]
pub enum LocationFailure {
    #[error("Geolocation is not supported")]
    Unsupported,

    #[error("Location request rejected: {0}")]
    Denied(String),
}

impl LocationFailure {
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationFailure::Unsupported => "Geolocation not supported on this device.",
            LocationFailure::Denied(_) => "Could not get your location.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}
