//! Async task services. Each request spawns one task on the tokio runtime and
//! reports its result as an [`AppEvent`](crate::state::AppEvent).

pub mod playlist_service;
pub mod session_service;
pub mod weather_service;

pub use playlist_service::{request_generate, PlaylistServiceMessage};
pub use session_service::{
    request_check as request_session_check, request_logout, request_status,
    SessionServiceMessage,
};
pub use weather_service::{request_resolve as request_weather_resolve, WeatherServiceMessage};

use tokio::sync::mpsc::UnboundedSender;

use crate::state::AppEvent;

pub type EventSender = UnboundedSender<AppEvent>;

/// Send `event`, logging instead of failing when the receiver is gone.
pub(crate) fn deliver(tx: &EventSender, event: impl Into<AppEvent>) {
    if tx.send(event.into()).is_err() {
        tracing::debug!("Event receiver dropped; discarding result");
    }
}
