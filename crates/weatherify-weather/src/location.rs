//! Device coordinate sources.
//!
//! A location is acquired once per resolution: no tracking, no retry.

use std::future::Future;

use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::types::{Location, LocationError};

/// Something that can report the device's current position.
pub trait LocationSource: Send + Sync {
    fn current_location(&self) -> impl Future<Output = Result<Location, LocationError>> + Send;
}

/// Coordinates fixed in configuration
#[derive(Debug, Clone)]
pub struct FixedLocation {
    location: Location,
}

impl FixedLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            location: Location::new(latitude, longitude),
        }
    }
}

impl LocationSource for FixedLocation {
    async fn current_location(&self) -> Result<Location, LocationError> {
        Ok(self.location.clone())
    }
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: Option<String>,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
}

/// Approximate position from an IP geolocation endpoint (ip-api.com format)
#[derive(Debug, Clone)]
pub struct IpLocation {
    client: Client,
    url: String,
}

impl IpLocation {
    pub fn new(url: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.to_string(),
        }
    }
}

impl LocationSource for IpLocation {
    async fn current_location(&self) -> Result<Location, LocationError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| LocationError::Other(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(LocationError::PermissionDenied)
            }
            s if !s.is_success() => {
                tracing::debug!("IP lookup returned status {}", s);
                return Err(LocationError::ServiceUnavailable);
            }
            _ => {}
        }

        let body: IpLookupResponse = response
            .json()
            .await
            .map_err(|e| LocationError::Other(format!("Invalid IP lookup response: {}", e)))?;

        if body.status.as_deref().is_some_and(|s| s != "success") {
            tracing::debug!(
                "IP lookup failed: {}",
                body.message.as_deref().unwrap_or("no reason given")
            );
            return Err(LocationError::ServiceUnavailable);
        }

        match (body.lat, body.lon) {
            (Some(latitude), Some(longitude)) => Ok(Location {
                latitude,
                longitude,
                city_name: body.city,
            }),
            _ => Err(LocationError::Other("IP lookup returned no coordinates".to_string())),
        }
    }
}

/// Location source chosen from configuration
#[derive(Debug, Clone)]
pub enum ConfiguredLocation {
    Fixed(FixedLocation),
    Ip(IpLocation),
}

impl ConfiguredLocation {
    /// Fixed coordinates win over IP lookup when present
    pub fn from_settings(fixed: Option<(f64, f64)>, ip_lookup_url: &str) -> Self {
        match fixed {
            Some((lat, lon)) => Self::Fixed(FixedLocation::new(lat, lon)),
            None => Self::Ip(IpLocation::new(ip_lookup_url)),
        }
    }
}

impl LocationSource for ConfiguredLocation {
    async fn current_location(&self) -> Result<Location, LocationError> {
        match self {
            Self::Fixed(source) => source.current_location().await,
            Self::Ip(source) => source.current_location().await,
        }
    }
}
