//! Raw OpenWeather payloads and their conversion into domain types.

use serde::Deserialize;

use crate::types::{
    CurrentReading, DailySummary, ForecastSnapshot, HourlyReading, PlaceCandidate,
    WeatherCondition,
};

/// One entry of the geocoding response array
#[derive(Debug, Deserialize)]
pub(crate) struct ApiPlace {
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl From<ApiPlace> for PlaceCandidate {
    fn from(p: ApiPlace) -> Self {
        Self {
            name: p.name,
            region: p.state.unwrap_or_default(),
            country: p.country.unwrap_or_default(),
            latitude: p.lat,
            longitude: p.lon,
        }
    }
}

/// Error body returned with non-success statuses
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCondition {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCurrent {
    pub dt: i64,
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub pressure: f64,
    #[serde(default)]
    pub weather: Vec<ApiCondition>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiDailyTemp {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiDaily {
    #[serde(default)]
    pub temp: Option<ApiDailyTemp>,
    #[serde(default)]
    pub weather: Vec<ApiCondition>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiHourly {
    pub dt: i64,
    pub temp: f64,
    #[serde(default)]
    pub weather: Vec<ApiCondition>,
}

/// One Call response
#[derive(Debug, Deserialize)]
pub(crate) struct ApiOneCall {
    pub timezone: String,
    pub lat: f64,
    pub lon: f64,
    pub current: ApiCurrent,
    #[serde(default)]
    pub daily: Vec<ApiDaily>,
    #[serde(default)]
    pub hourly: Vec<ApiHourly>,
}

fn first_condition(weather: Vec<ApiCondition>) -> Option<WeatherCondition> {
    weather.into_iter().next().map(|w| WeatherCondition {
        description: w.description,
        icon: w.icon,
    })
}

impl From<ApiOneCall> for ForecastSnapshot {
    fn from(r: ApiOneCall) -> Self {
        let current = CurrentReading {
            observed_at: r.current.dt,
            temperature: r.current.temp,
            feels_like: r.current.feels_like,
            humidity: r.current.humidity,
            wind_speed: r.current.wind_speed,
            pressure: r.current.pressure,
            condition: first_condition(r.current.weather),
        };

        let daily = r
            .daily
            .into_iter()
            .map(|d| {
                let (min, max) = d.temp.map(|t| (t.min, t.max)).unwrap_or((None, None));
                DailySummary {
                    min,
                    max,
                    condition: first_condition(d.weather),
                }
            })
            .collect();

        let hourly = r
            .hourly
            .into_iter()
            .map(|h| HourlyReading {
                timestamp: h.dt,
                temperature: h.temp,
                condition: first_condition(h.weather),
            })
            .collect();

        Self {
            timezone_id: r.timezone,
            latitude: r.lat,
            longitude: r.lon,
            current,
            daily,
            hourly,
        }
    }
}
