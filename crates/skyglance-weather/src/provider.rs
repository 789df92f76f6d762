//! Forecast client for the OpenWeather One Call endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::instrument;

use crate::http;
use crate::models::ApiOneCall;
use crate::types::{Coordinates, ForecastSnapshot, Units, WeatherError};

/// Fetches a complete forecast for a point. One attempt per call, no retry.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn forecast(&self, at: Coordinates) -> Result<ForecastSnapshot, WeatherError>;
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Client,
    base_url: String,
    api_key: String,
    units: Units,
}

impl WeatherProvider {
    pub fn new(
        base_url: &str,
        api_key: &str,
        units: Units,
        timeout: Option<Duration>,
    ) -> Result<Self, WeatherError> {
        Ok(Self {
            client: http::build_client(timeout)?,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            units,
        })
    }
}

#[async_trait]
impl ForecastSource for WeatherProvider {
    #[instrument(skip(self), level = "info")]
    async fn forecast(&self, at: Coordinates) -> Result<ForecastSnapshot, WeatherError> {
        if !at.is_valid() {
            return Err(WeatherError::InvalidCoordinates);
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", at.latitude.to_string()),
                ("lon", at.longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", self.units.as_query().to_string()),
            ])
            .send()
            .await?;

        let raw: ApiOneCall = http::read_json(response).await?;
        let snapshot = ForecastSnapshot::from(raw);
        tracing::info!(
            "Forecast fetched: {} daily, {} hourly entries",
            snapshot.daily.len(),
            snapshot.hourly.len()
        );
        Ok(snapshot)
    }
}
