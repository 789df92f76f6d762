//! Forward geocoding: free text to place candidates.
//! Uses the OpenWeather direct geocoding endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::instrument;

use crate::http;
use crate::models::ApiPlace;
use crate::types::{PlaceCandidate, WeatherError};

/// Resolves place names to coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Raw provider results for `query`, in provider order.
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<PlaceCandidate>, WeatherError>;

    /// Autocomplete lookup: queries with the trimmed text, then keeps only
    /// candidates that contain it (see [`filter_candidates`]).
    async fn suggest(&self, query: &str, limit: u32) -> Result<Vec<PlaceCandidate>, WeatherError> {
        let trimmed = query.trim();
        let places = self.search(trimmed, limit).await?;
        Ok(filter_candidates(trimmed, places))
    }
}

/// Keep candidates whose "name region country" contains `query`,
/// case-insensitively, preserving order.
pub fn filter_candidates(query: &str, places: Vec<PlaceCandidate>) -> Vec<PlaceCandidate> {
    let needle = query.trim().to_lowercase();
    places.into_iter().filter(|p| p.matches(&needle)).collect()
}

/// OpenWeather geocoding client
#[derive(Debug, Clone)]
pub struct OpenWeatherGeocoder {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherGeocoder {
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, WeatherError> {
        Ok(Self {
            client: http::build_client(timeout)?,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for OpenWeatherGeocoder {
    #[instrument(skip(self), level = "debug")]
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<PlaceCandidate>, WeatherError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query.to_string()),
                ("limit", limit.to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await?;

        let places: Vec<ApiPlace> = http::read_json(response).await?;
        tracing::debug!("Geocoding returned {} places", places.len());
        Ok(places.into_iter().map(PlaceCandidate::from).collect())
    }
}
