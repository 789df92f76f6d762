//! Weather data for Skyglance
//!
//! Geocoding and One Call forecast clients for the OpenWeather API, the
//! domain types they produce, and display formatting helpers.

pub mod format;
pub mod geocode;
mod http;
pub mod location;
mod models;
pub mod provider;
pub mod types;

pub use geocode::{filter_candidates, Geocoder, OpenWeatherGeocoder};
pub use location::{FixedLocation, LocationSource, NoLocation};
pub use provider::{ForecastSource, WeatherProvider};
pub use types::*;
