use crate::services::LookupError;
use skyglance_core::{AppError, LocationFailure, LookupFailure};
use skyglance_weather::LocationError;

impl From<LookupError> for AppError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::EmptyQuery => AppError::Weather(LookupFailure::EmptyQuery),
            LookupError::NotFound(q) => AppError::Weather(LookupFailure::CityNotFound(q)),
            LookupError::Geocode(e) => AppError::Weather(LookupFailure::CityLookupFailed {
                message: e.provider_message().map(str::to_string),
            }),
            LookupError::Forecast(e) => AppError::Weather(LookupFailure::ForecastFailed {
                message: e.provider_message().map(str::to_string),
            }),
            LookupError::Location(LocationError::Unsupported) => {
                AppError::Location(LocationFailure::Unsupported)
            }
            LookupError::Location(e) => AppError::Location(LocationFailure::Denied(e.to_string())),
        }
    }
}
