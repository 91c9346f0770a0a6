//! Weather resolution off the command loop; result sent via mpsc.

use std::sync::Arc;

use weatherify_weather::{LocationSource, LocationWeatherResolver, WeatherError, WeatherReport};

use super::{deliver, EventSender};

/// Messages sent from weather tasks back to the controller
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Result of one location + weather resolution
    ResolveDone(Result<WeatherReport, WeatherError>),
}

/// Resolve location and weather asynchronously.
/// Sends `ResolveDone` on the channel when complete.
pub fn request_resolve<L>(tx: &EventSender, resolver: Arc<LocationWeatherResolver<L>>)
where
    L: LocationSource + 'static,
{
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = resolver.resolve().await;
        if let Err(e) = &result {
            tracing::error!("Error getting location or weather: {}", e);
        }
        deliver(&tx, WeatherServiceMessage::ResolveDone(result));
    });
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::state::AppEvent;
    use weatherify_weather::{ConfiguredLocation, LocationError, WeatherProvider};

    #[tokio::test]
    async fn test_location_failure_is_reported() {
        let location = ConfiguredLocation::from_settings(None, "http://127.0.0.1:9/json");
        let provider = WeatherProvider::new("http://127.0.0.1:9", None).unwrap();
        let resolver = Arc::new(LocationWeatherResolver::new(location, provider));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        request_resolve(&tx, resolver);

        match rx.recv().await.unwrap() {
            AppEvent::Weather(WeatherServiceMessage::ResolveDone(Err(e))) => {
                assert!(matches!(e, WeatherError::Location(LocationError::Other(_))));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
