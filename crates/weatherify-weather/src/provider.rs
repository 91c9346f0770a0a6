//! Current-conditions client for a WeatherAPI-compatible provider.
//!
//! One read-only request per fetch, keyed by `lat,lon`. When no API key is
//! configured the base URL is expected to be a proxy that adds it.

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use weatherify_core::ReqwestErrorExt;

use crate::types::{Location, WeatherError, WeatherSample};

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    location: ApiLocation,
    current: ApiCurrent,
}

#[derive(Debug, Deserialize)]
struct ApiLocation {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiCurrent {
    precip_mm: f64,
    cloud: u8,
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherProvider {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .build()
            .map_err(ReqwestErrorExt::into_network_error)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Fetch current conditions at `location`.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn fetch(&self, location: &Location) -> Result<WeatherSample, WeatherError> {
        let url = format!("{}/current.json", self.base_url);

        let mut query = vec![("q", location.query())];
        if let Some(key) = &self.api_key {
            query.push(("key", key.clone()));
        }

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        if !status.is_success() {
            tracing::warn!("Weather provider returned status {}", status);
            return Err(WeatherError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        parse_current(&body)
    }
}

fn parse_current(body: &str) -> Result<WeatherSample, WeatherError> {
    let parsed: CurrentResponse =
        serde_json::from_str(body).map_err(|e| WeatherError::Parse(e.to_string()))?;

    if !parsed.current.precip_mm.is_finite() || parsed.current.precip_mm < 0.0 {
        return Err(WeatherError::Parse(format!(
            "precip_mm out of range: {}",
            parsed.current.precip_mm
        )));
    }
    if parsed.current.cloud > 100 {
        return Err(WeatherError::Parse(format!(
            "cloud out of range: {}",
            parsed.current.cloud
        )));
    }

    Ok(WeatherSample {
        precipitation_mm: parsed.current.precip_mm,
        cloud_cover_percent: parsed.current.cloud,
        location_name: parsed.location.name,
        fetched_at: Utc::now(),
    })
}
