//! Weather side of Weatherify.
//!
//! Resolves device coordinates, fetches current conditions from the weather
//! provider and classifies them into a playlist mood.

pub mod location;
pub mod provider;
pub mod resolver;
pub mod types;

pub use location::{ConfiguredLocation, FixedLocation, IpLocation, LocationSource};
pub use provider::WeatherProvider;
pub use resolver::LocationWeatherResolver;
pub use types::*;
