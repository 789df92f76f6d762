use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Measurement system requested from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    /// Value of the `units` query parameter
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    /// Suffix for wind speeds as returned by the provider
    pub fn wind_unit(&self) -> &'static str {
        match self {
            Self::Metric => "m/s",
            Self::Imperial => "mph",
        }
    }
}

/// Short condition text plus the provider's icon code (e.g. "10d")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub description: String,
    pub icon: String,
}

/// Geographic point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// One geocoding match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub name: String,
    /// State or province; empty when the provider has none
    pub region: String,
    /// ISO country code; empty when the provider has none
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl PlaceCandidate {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Display label: `name[, region], country`.
    ///
    /// The country slot is always present, even when the provider left it empty.
    pub fn label(&self) -> String {
        let mut label = self.name.clone();
        if !self.region.is_empty() {
            label.push_str(", ");
            label.push_str(&self.region);
        }
        label.push_str(", ");
        label.push_str(&self.country);
        label
    }

    /// `region, country` with empty parts left out
    pub fn subtitle(&self) -> String {
        [self.region.as_str(), self.country.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Case-insensitive substring match against name, region and country.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        format!("{} {} {}", self.name, self.region, self.country)
            .to_lowercase()
            .contains(needle)
    }
}

/// Conditions at observation time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentReading {
    /// Observation time, epoch seconds
    pub observed_at: i64,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    /// hPa
    pub pressure: f64,
    pub condition: Option<WeatherCondition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub condition: Option<WeatherCondition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyReading {
    /// Epoch seconds
    pub timestamp: i64,
    pub temperature: f64,
    pub condition: Option<WeatherCondition>,
}

/// Everything one forecast fetch returns. Replaced wholesale on the next fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSnapshot {
    /// IANA zone of the forecast location, e.g. "Europe/Paris"
    pub timezone_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub current: CurrentReading,
    /// Index 0 is today
    pub daily: Vec<DailySummary>,
    /// Index 0 is the next hour; at most 48 entries
    pub hourly: Vec<HourlyReading>,
}

impl ForecastSnapshot {
    /// Hourly readings in `range`, clamped to what the snapshot holds.
    pub fn hourly_window(&self, range: Range<usize>) -> &[HourlyReading] {
        let end = range.end.min(self.hourly.len());
        let start = range.start.min(end);
        &self.hourly[start..end]
    }

    pub fn today(&self) -> Option<&DailySummary> {
        self.daily.first()
    }

    pub fn tomorrow(&self) -> Option<&DailySummary> {
        self.daily.get(1)
    }
}

/// Location service errors
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Geolocation is not available on this device")]
    Unsupported,
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location error: {0}")]
    Other(String),
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Provider returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Provider { status: u16, message: Option<String> },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,
}

impl WeatherError {
    /// Human-readable reason supplied by the provider, if any
    pub fn provider_message(&self) -> Option<&str> {
        match self {
            Self::Provider { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(name: &str, region: &str, country: &str) -> PlaceCandidate {
        PlaceCandidate {
            name: name.to_string(),
            region: region.to_string(),
            country: country.to_string(),
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    fn hourly(n: usize) -> Vec<HourlyReading> {
        (0..n)
            .map(|i| HourlyReading {
                timestamp: i as i64 * 3600,
                temperature: i as f64,
                condition: None,
            })
            .collect()
    }

    fn snapshot_with_hours(n: usize) -> ForecastSnapshot {
        ForecastSnapshot {
            timezone_id: "UTC".to_string(),
            latitude: 0.0,
            longitude: 0.0,
            current: CurrentReading {
                observed_at: 0,
                temperature: 0.0,
                feels_like: 0.0,
                humidity: 0,
                wind_speed: 0.0,
                pressure: 0.0,
                condition: None,
            },
            daily: Vec::new(),
            hourly: hourly(n),
        }
    }

    #[test]
    fn test_label_with_region() {
        assert_eq!(
            place("Springfield", "Illinois", "US").label(),
            "Springfield, Illinois, US"
        );
    }

    #[test]
    fn test_label_without_region() {
        assert_eq!(place("Paris", "", "FR").label(), "Paris, FR");
    }

    #[test]
    fn test_label_keeps_country_slot() {
        assert_eq!(place("Nowhere", "", "").label(), "Nowhere, ");
        assert_eq!(place("Nowhere", "Atlantis", "").label(), "Nowhere, Atlantis, ");
    }

    #[test]
    fn test_subtitle_skips_empty_parts() {
        assert_eq!(place("Paris", "", "FR").subtitle(), "FR");
        assert_eq!(place("Paris", "Texas", "US").subtitle(), "Texas, US");
    }

    #[test]
    fn test_matches_across_fields() {
        let p = place("Paris", "Texas", "US");
        assert!(p.matches("paris"));
        assert!(p.matches("texas"));
        assert!(p.matches("ris tex"));
        assert!(!p.matches("london"));
    }

    #[test]
    fn test_hourly_window_ranges() {
        let snap = snapshot_with_hours(48);
        assert_eq!(snap.hourly_window(0..24).len(), 24);
        let tomorrow = snap.hourly_window(24..48);
        assert_eq!(tomorrow.len(), 24);
        assert_eq!(tomorrow[0].timestamp, 24 * 3600);
    }

    #[test]
    fn test_hourly_window_clamps_short_data() {
        let snap = snapshot_with_hours(30);
        assert_eq!(snap.hourly_window(24..48).len(), 6);
        let snap = snapshot_with_hours(10);
        assert!(snap.hourly_window(24..48).is_empty());
    }

    #[test]
    fn test_units() {
        assert_eq!(Units::Metric.as_query(), "metric");
        assert_eq!(Units::Imperial.wind_unit(), "mph");
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinates::new(48.85, 2.35).is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, -181.0).is_valid());
    }

    #[test]
    fn test_provider_message() {
        let err = WeatherError::Provider {
            status: 401,
            message: Some("Invalid API key".to_string()),
        };
        assert_eq!(err.provider_message(), Some("Invalid API key"));
        assert_eq!(WeatherError::InvalidCoordinates.provider_message(), None);
    }
}
