//! Application store: weather, session and in-flight operation slices.
//!
//! Task results arrive as [`AppEvent`]s and are folded in with
//! [`AppState::apply`]. Side effects (notifications, follow-up requests,
//! opening links) are the controller's job.

use std::sync::Arc;

use parking_lot::RwLock;
use weatherify_auth::SessionState;
use weatherify_core::OpState;
use weatherify_weather::{Mood, WeatherReport};

use crate::services::{PlaylistServiceMessage, SessionServiceMessage, WeatherServiceMessage};

/// Everything a background task can report
#[derive(Debug)]
pub enum AppEvent {
    Weather(WeatherServiceMessage),
    Session(SessionServiceMessage),
    Playlist(PlaylistServiceMessage),
}

impl From<WeatherServiceMessage> for AppEvent {
    fn from(msg: WeatherServiceMessage) -> Self {
        Self::Weather(msg)
    }
}

impl From<SessionServiceMessage> for AppEvent {
    fn from(msg: SessionServiceMessage) -> Self {
        Self::Session(msg)
    }
}

impl From<PlaylistServiceMessage> for AppEvent {
    fn from(msg: PlaylistServiceMessage) -> Self {
        Self::Playlist(msg)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherSlice {
    /// `Unknown` until a sample classifies into a playable mood
    pub mood: Mood,
    pub location_name: Option<String>,
    /// A resolution is in flight
    pub resolving: bool,
}

impl WeatherSlice {
    fn replace_with(&mut self, report: &WeatherReport) {
        self.mood = report.mood;
        self.location_name = Some(report.location_name.clone()).filter(|n| !n.trim().is_empty());
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub weather: WeatherSlice,
    pub session: SessionState,
    pub op: OpState,
}

impl AppState {
    /// Fold a task result into the store.
    pub fn apply(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Weather(WeatherServiceMessage::ResolveDone(result)) => {
                self.weather.resolving = false;
                // A failed resolution leaves the previous reading in place.
                if let Ok(report) = result {
                    self.weather.replace_with(report);
                }
            }
            AppEvent::Session(SessionServiceMessage::CheckDone(check)) => {
                self.session = check.session_state();
            }
            AppEvent::Session(SessionServiceMessage::StatusDone(state)) => {
                self.session = *state;
            }
            AppEvent::Session(SessionServiceMessage::LogoutDone(outcome)) => {
                self.op = self.op.on_logout_done();
                if outcome.is_success() {
                    self.session = SessionState::Unauthenticated;
                }
            }
            AppEvent::Playlist(PlaylistServiceMessage::GenerateDone(_)) => {
                self.op = self.op.on_generate_done();
            }
        }
    }
}

/// Shared handle to the application state.
///
/// Cheap to clone; readers get snapshots.
#[derive(Debug, Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<AppState>>,
}

impl Store {
    pub fn snapshot(&self) -> AppState {
        self.inner.read().clone()
    }

    pub fn apply(&self, event: &AppEvent) {
        self.inner.write().apply(event);
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> R {
        f(&mut self.inner.write())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weatherify_auth::LogoutOutcome;
    use weatherify_services::{BackendError, PlaylistError};
    use weatherify_weather::{LocationError, WeatherError};

    fn resolved(mood: Mood, name: &str) -> AppEvent {
        WeatherServiceMessage::ResolveDone(Ok(WeatherReport {
            mood,
            location_name: name.to_string(),
        }))
        .into()
    }

    #[test]
    fn initial_state() {
        let state = AppState::default();
        assert_eq!(state.session, SessionState::Loading);
        assert_eq!(state.weather.mood, Mood::Unknown);
        assert!(state.weather.location_name.is_none());
        assert_eq!(state.op, OpState::Idle);
    }

    #[test]
    fn new_sample_replaces_mood_and_name() {
        let mut state = AppState::default();
        state.apply(&resolved(Mood::Rainy, "Paris"));
        assert_eq!(state.weather.mood, Mood::Rainy);
        assert_eq!(state.weather.location_name.as_deref(), Some("Paris"));

        state.apply(&resolved(Mood::Unknown, "Oslo"));
        assert_eq!(state.weather.mood, Mood::Unknown);
        assert_eq!(state.weather.location_name.as_deref(), Some("Oslo"));
    }

    #[test]
    fn failed_resolution_keeps_previous_reading() {
        let mut state = AppState::default();
        state.apply(&resolved(Mood::Sunny, "Lisbon"));
        state.weather.resolving = true;

        state.apply(
            &WeatherServiceMessage::ResolveDone(Err(WeatherError::Location(
                LocationError::PermissionDenied,
            )))
            .into(),
        );

        assert_eq!(state.weather.mood, Mood::Sunny);
        assert_eq!(state.weather.location_name.as_deref(), Some("Lisbon"));
        assert!(!state.weather.resolving);
    }

    #[test]
    fn logout_success_unauthenticates_and_releases_guard() {
        let mut state = AppState {
            session: SessionState::Authenticated,
            op: OpState::BusyLogout,
            ..Default::default()
        };
        state.apply(&SessionServiceMessage::LogoutDone(LogoutOutcome::LoggedOut).into());
        assert_eq!(state.session, SessionState::Unauthenticated);
        assert_eq!(state.op, OpState::Idle);
    }

    #[test]
    fn logout_failure_keeps_session_until_requeried() {
        let mut state = AppState {
            session: SessionState::Authenticated,
            op: OpState::BusyLogout,
            ..Default::default()
        };
        state.apply(&SessionServiceMessage::LogoutDone(LogoutOutcome::Rejected(500)).into());
        assert_eq!(state.session, SessionState::Authenticated);
        assert_eq!(state.op, OpState::Idle);
    }

    #[test]
    fn generate_done_releases_guard_either_way() {
        let mut state = AppState {
            op: OpState::BusyGenerate,
            ..Default::default()
        };
        state.apply(
            &PlaylistServiceMessage::GenerateDone(Err(PlaylistError::Failed(
                BackendError::InvalidResponse("eof".to_string()),
            )))
            .into(),
        );
        assert_eq!(state.op, OpState::Idle);
    }

    #[test]
    fn store_clones_share_state() {
        let store = Store::default();
        let other = store.clone();
        store.update(|s| s.session = SessionState::Authenticated);
        assert_eq!(other.snapshot().session, SessionState::Authenticated);
    }
}
