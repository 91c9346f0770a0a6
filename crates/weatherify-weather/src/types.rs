use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use weatherify_core::NetworkError;

/// Precipitation at or above this many millimetres is rainy.
pub const RAIN_THRESHOLD_MM: f64 = 1.0;

/// Cloud cover at or above this percentage is cloudy.
pub const CLOUDY_THRESHOLD_PERCENT: u8 = 60;

/// Playlist mood derived from current weather.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Sunny,
    Cloudy,
    Rainy,
    /// No classification (not fetched yet, or conditions fall between rules)
    #[default]
    Unknown,
}

impl Mood {
    /// Classify current conditions. Rules are checked in order, first match wins:
    /// rain, then cloud cover, then dry-and-clear. Light precipitation under a
    /// mostly clear sky matches nothing and stays `Unknown`.
    pub fn classify(precipitation_mm: f64, cloud_cover_percent: u8) -> Self {
        if precipitation_mm >= RAIN_THRESHOLD_MM {
            Self::Rainy
        } else if cloud_cover_percent >= CLOUDY_THRESHOLD_PERCENT {
            Self::Cloudy
        } else if precipitation_mm == 0.0 {
            Self::Sunny
        } else {
            Self::Unknown
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Wire name sent to the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::Cloudy => "cloudy",
            Self::Rainy => "rainy",
            Self::Unknown => "unknown",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Sunny => "Sunny",
            Self::Cloudy => "Cloudy",
            Self::Rainy => "Rainy",
            Self::Unknown => "Unknown",
        }
    }

    /// The three moods a playlist can be generated for
    pub const PLAYABLE: [Mood; 3] = [Mood::Sunny, Mood::Cloudy, Mood::Rainy];
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geographic location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub city_name: Option<String>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            city_name: None,
        }
    }

    /// Provider query string, `lat,lon`
    pub fn query(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// Current conditions as returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub precipitation_mm: f64,
    pub cloud_cover_percent: u8,
    pub location_name: String,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherSample {
    pub fn mood(&self) -> Mood {
        Mood::classify(self.precipitation_mm, self.cloud_cover_percent)
    }
}

/// What a resolution produces for display
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub mood: Mood,
    pub location_name: String,
}

impl From<&WeatherSample> for WeatherReport {
    fn from(sample: &WeatherSample) -> Self {
        Self {
            mood: sample.mood(),
            location_name: sample.location_name.clone(),
        }
    }
}

/// Location service errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location error: {0}")]
    Other(String),
}

/// Weather resolution errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
    #[error("Location error: {0}")]
    Location(#[from] LocationError),
    #[error("Weather API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Network(e) => e.user_message(),
            Self::Location(LocationError::PermissionDenied) => "Location access was denied.",
            Self::Location(_) => "Could not determine your location.",
            Self::Api { status, .. } if *status == 401 || *status == 403 => {
                "Weather API key is invalid. Check settings."
            }
            Self::Api { .. } => "Weather service error. Please try again.",
            Self::Parse(_) => "Received unexpected weather data.",
        }
    }
}
