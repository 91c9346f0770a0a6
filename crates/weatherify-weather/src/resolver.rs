use crate::location::LocationSource;
use crate::provider::WeatherProvider;
use crate::types::{WeatherError, WeatherReport};

/// Device location -> current weather -> mood.
#[derive(Debug, Clone)]
pub struct LocationWeatherResolver<L> {
    location: L,
    provider: WeatherProvider,
}

impl<L: LocationSource> LocationWeatherResolver<L> {
    pub fn new(location: L, provider: WeatherProvider) -> Self {
        Self { location, provider }
    }

    /// Resolve the current mood and a display name for the location.
    ///
    /// Single attempt at each step; the first failure ends the resolution.
    pub async fn resolve(&self) -> Result<WeatherReport, WeatherError> {
        let location = self.location.current_location().await?;
        tracing::info!("Got location: {}, {}", location.latitude, location.longitude);

        let sample = self.provider.fetch(&location).await?;
        let mut report = WeatherReport::from(&sample);

        if report.location_name.trim().is_empty() {
            if let Some(city) = location.city_name {
                report.location_name = city;
            }
        }

        tracing::info!(
            precip_mm = sample.precipitation_mm,
            cloud = sample.cloud_cover_percent,
            fetched_at = %sample.fetched_at,
            "Weather in {} classified as {}",
            report.location_name,
            report.mood
        );
        Ok(report)
    }
}
