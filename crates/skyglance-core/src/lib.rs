pub mod config;
pub mod error;

pub use config::{
    AutocompleteConfig, Config, Coordinates, Units, ValidationResult, WeatherConfig,
};
pub use error::{AppError, ConfigError, LocationFailure, LookupFailure};

use anyhow::Result;

/// Initialize logging for the application.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    tracing::info!("Skyglance core initialized");
    Ok(())
}
