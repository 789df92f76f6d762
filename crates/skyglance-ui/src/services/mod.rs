pub mod weather_service;

pub use weather_service::{
    request_city, request_forecast, request_position, request_suggestions, LookupError,
    LookupOrigin, WeatherServiceMessage,
};
