//! Weather backend: geocoding, forecast and position lookups.
//! All network work runs on spawned tasks; results are sent back via mpsc.

use std::sync::Arc;

use skyglance_weather::{
    Coordinates, ForecastSnapshot, ForecastSource, Geocoder, LocationError, LocationSource,
    PlaceCandidate, WeatherError,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::autocomplete::SuggestRequest;

/// Error type for weather lookups
#[derive(Debug)]
pub enum LookupError {
    /// Search triggered with blank text
    EmptyQuery,
    /// Geocoding returned no candidates for the query
    NotFound(String),
    Geocode(WeatherError),
    Forecast(WeatherError),
    Location(LocationError),
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::EmptyQuery => write!(f, "Empty search text"),
            LookupError::NotFound(q) => write!(f, "No place matches {:?}", q),
            LookupError::Geocode(e) => write!(f, "Geocoding error: {}", e),
            LookupError::Forecast(e) => write!(f, "Forecast error: {}", e),
            LookupError::Location(e) => write!(f, "Location error: {}", e),
        }
    }
}

impl std::error::Error for LookupError {}

/// What started a forecast lookup. Decides how a failure is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOrigin {
    /// Initial load of the default city
    Startup,
    /// Search button on free text
    Search,
    /// Committed autocomplete suggestion
    Suggestion,
    /// "My location" button
    Geolocation,
}

/// Messages sent from async operations back to the widget
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Result of an autocomplete lookup, paired with the request it answers
    SuggestionsDone {
        request: SuggestRequest,
        result: Result<Vec<PlaceCandidate>, WeatherError>,
    },
    /// Best geocoding match for a typed city
    CityResolved {
        origin: LookupOrigin,
        result: Result<PlaceCandidate, LookupError>,
    },
    /// Result of a device position request
    PositionDone(Result<Coordinates, LookupError>),
    /// Result of a forecast fetch. `place` is `None` for coordinate-only lookups.
    ForecastDone {
        origin: LookupOrigin,
        place: Option<PlaceCandidate>,
        result: Result<ForecastSnapshot, LookupError>,
    },
}

/// Request autocomplete candidates for `request.query`.
/// Sends `SuggestionsDone` on the channel when complete.
pub fn request_suggestions<M>(
    tx: &UnboundedSender<M>,
    geocoder: Arc<dyn Geocoder>,
    request: SuggestRequest,
    limit: u32,
) where
    M: From<WeatherServiceMessage> + Send + 'static,
{
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = geocoder.suggest(&request.query, limit).await;
        if let Ok(places) = &result {
            tracing::debug!("{} suggestions for {:?}", places.len(), request.query);
        }
        let _ = tx.send(WeatherServiceMessage::SuggestionsDone { request, result }.into());
    });
}

/// Resolve typed text to its best geocoding match.
/// Sends `CityResolved` on the channel when complete.
pub fn request_city<M>(
    tx: &UnboundedSender<M>,
    geocoder: Arc<dyn Geocoder>,
    query: String,
    origin: LookupOrigin,
) where
    M: From<WeatherServiceMessage> + Send + 'static,
{
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = match geocoder.search(&query, 1).await {
            Ok(places) => places
                .into_iter()
                .next()
                .ok_or(LookupError::NotFound(query)),
            Err(e) => Err(LookupError::Geocode(e)),
        };
        let _ = tx.send(WeatherServiceMessage::CityResolved { origin, result }.into());
    });
}

/// Fetch the forecast for `coords`.
/// Sends `ForecastDone` on the channel when complete.
pub fn request_forecast<M>(
    tx: &UnboundedSender<M>,
    source: Arc<dyn ForecastSource>,
    coords: Coordinates,
    place: Option<PlaceCandidate>,
    origin: LookupOrigin,
) where
    M: From<WeatherServiceMessage> + Send + 'static,
{
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = source
            .forecast(coords)
            .await
            .map_err(LookupError::Forecast);
        if result.is_ok() {
            tracing::info!(
                "Fetched forecast for {:.2}, {:.2}",
                coords.latitude,
                coords.longitude
            );
        }
        let _ = tx.send(
            WeatherServiceMessage::ForecastDone {
                origin,
                place,
                result,
            }
            .into(),
        );
    });
}

/// Ask the location source for the device position.
/// Sends `PositionDone` on the channel when complete.
pub fn request_position<M>(tx: &UnboundedSender<M>, locator: Arc<dyn LocationSource>)
where
    M: From<WeatherServiceMessage> + Send + 'static,
{
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = locator
            .current_position()
            .await
            .map_err(LookupError::Location);
        let _ = tx.send(WeatherServiceMessage::PositionDone(result).into());
    });
}
