//! Wires the services to the store.
//!
//! User actions start background tasks; task results come back as
//! [`AppEvent`]s through [`Controller::handle`], which updates the store,
//! shows notifications and starts follow-up work.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use url::Url;
use weatherify_auth::{AuthError, LoginRedirect, RedirectListener, SessionStatusChecker};
use weatherify_core::{Config, Navigator, NotificationPresenter, OpState};
use weatherify_services::{
    playlist::{CREATED_MESSAGE, IN_PROGRESS_MESSAGE},
    BackendClient, PlaylistRequester,
};
use weatherify_weather::{ConfiguredLocation, LocationWeatherResolver, WeatherProvider};

use crate::services::{
    self, EventSender, PlaylistServiceMessage, SessionServiceMessage, WeatherServiceMessage,
};
use crate::state::{AppEvent, AppState, Store};
use crate::view::Screen;

/// What happened to a user action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A background task was started
    Started,
    /// Nothing was sent; a notification explains why
    NotReady,
    /// Another generate/logout is still in flight
    Busy,
}

pub struct Controller {
    store: Store,
    notifications: NotificationPresenter,
    resolver: Arc<LocationWeatherResolver<ConfiguredLocation>>,
    backend: Arc<BackendClient>,
    session: Arc<SessionStatusChecker>,
    playlists: Arc<PlaylistRequester>,
    navigator: Arc<dyn Navigator>,
    launch_url: Url,
    tx: EventSender,
    rx: UnboundedReceiver<AppEvent>,
    /// Tasks started whose result has not been handled yet
    pending: usize,
}

impl Controller {
    pub fn new(
        resolver: LocationWeatherResolver<ConfiguredLocation>,
        backend: Arc<BackendClient>,
        notifications: NotificationPresenter,
        navigator: Arc<dyn Navigator>,
        launch_url: Url,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            store: Store::default(),
            notifications,
            resolver: Arc::new(resolver),
            session: Arc::new(SessionStatusChecker::new(backend.clone())),
            playlists: Arc::new(PlaylistRequester::new(backend.clone())),
            backend,
            navigator,
            launch_url,
            tx,
            rx,
            pending: 0,
        }
    }

    /// Build every component from configuration.
    pub fn from_config(
        config: &Config,
        navigator: Arc<dyn Navigator>,
        launch_url: Url,
    ) -> Result<Self> {
        let location = ConfiguredLocation::from_settings(
            config.location.fixed_coordinates(),
            &config.location.ip_lookup_url,
        );
        let provider =
            WeatherProvider::new(&config.weather.base_url, config.weather.effective_api_key())
                .context("Failed to create weather provider")?;
        let cookie = config.backend.effective_session_cookie();
        let backend = BackendClient::new(&config.backend.base_url, cookie.as_deref())
            .context("Failed to create backend client")?;

        Ok(Self::new(
            LocationWeatherResolver::new(location, provider),
            Arc::new(backend),
            NotificationPresenter::new(config.notifications.display_duration()),
            navigator,
            launch_url,
        ))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn state(&self) -> AppState {
        self.store.snapshot()
    }

    pub fn notifications(&self) -> &NotificationPresenter {
        &self.notifications
    }

    /// Current launch URL, with login markers removed once handled
    pub fn launch_url(&self) -> &Url {
        &self.launch_url
    }

    pub fn screen(&self) -> Screen {
        Screen::build(&self.state(), self.notifications.current().as_ref())
    }

    /// Whether a started task has not reported back yet
    pub fn has_pending(&self) -> bool {
        self.pending > 0
    }

    /// Start weather resolution and the session check side by side.
    pub fn mount(&mut self) {
        tracing::debug!("Mounting with launch URL {}", self.launch_url);
        self.refresh_weather();
        self.started();
        services::request_session_check(&self.tx, self.session.clone(), self.launch_url.clone());
    }

    pub fn refresh_weather(&mut self) {
        self.store.update(|s| s.weather.resolving = true);
        self.started();
        services::request_weather_resolve(&self.tx, self.resolver.clone());
    }

    /// Re-query the session status endpoint.
    pub fn refresh_session(&mut self) {
        self.started();
        services::request_status(&self.tx, self.session.clone());
    }

    pub fn generate(&mut self) -> Dispatch {
        let state = self.state();

        let mood = match PlaylistRequester::check_ready(state.weather.mood) {
            Ok(mood) => mood,
            Err(e) => {
                tracing::warn!("Weather data not available yet");
                self.notifications.show(e.user_message());
                return Dispatch::NotReady;
            }
        };

        let claimed = self.store.update(|s| {
            if s.op.can_start_generate() {
                s.op = OpState::BusyGenerate;
                true
            } else {
                false
            }
        });
        if !claimed {
            tracing::info!("Generate ignored; {:?} in flight", state.op);
            return Dispatch::Busy;
        }

        self.notifications.show(IN_PROGRESS_MESSAGE);
        self.started();
        services::request_generate(&self.tx, self.playlists.clone(), mood);
        Dispatch::Started
    }

    pub fn logout(&mut self) -> Dispatch {
        let claimed = self.store.update(|s| {
            if s.op.can_start_logout() {
                s.op = OpState::BusyLogout;
                true
            } else {
                false
            }
        });
        if !claimed {
            tracing::info!("Logout ignored; another operation is in flight");
            return Dispatch::Busy;
        }

        self.started();
        services::request_logout(&self.tx, self.session.clone());
        Dispatch::Started
    }

    /// Bind the redirect listener on `app_url`, then send the browser to the
    /// backend's login page. Await the listener and pass its URL to
    /// [`complete_login`](Self::complete_login).
    pub fn begin_login(&self, app_url: &Url) -> Result<RedirectListener, AuthError> {
        let listener = RedirectListener::bind(app_url)?;
        self.session.login(self.navigator.as_ref())?;
        Ok(listener)
    }

    /// Take over the browser's backend session and treat the URL the backend
    /// redirected to as a fresh launch.
    pub fn complete_login(&mut self, redirect: LoginRedirect) {
        match redirect.cookie.as_deref() {
            Some(cookie) => {
                self.backend.add_session_cookie(cookie);
            }
            None => tracing::warn!("Login redirect carried no session cookie"),
        }
        self.launch_url = redirect.url;
        self.started();
        services::request_session_check(&self.tx, self.session.clone(), self.launch_url.clone());
    }

    /// Wait for the next task result and handle it.
    ///
    /// Returns false when nothing is pending.
    pub async fn process_next(&mut self) -> bool {
        if self.pending == 0 {
            return false;
        }
        match self.rx.recv().await {
            Some(event) => {
                self.handle(event);
                true
            }
            None => false,
        }
    }

    /// Handle results until every started task (and its follow-ups) settled.
    pub async fn settle(&mut self) {
        while self.process_next().await {}
    }

    pub fn handle(&mut self, event: AppEvent) {
        self.pending = self.pending.saturating_sub(1);
        self.store.apply(&event);

        match event {
            AppEvent::Weather(WeatherServiceMessage::ResolveDone(_)) => {}
            AppEvent::Session(SessionServiceMessage::CheckDone(check)) => {
                if let Some(message) = check.notification() {
                    self.notifications.show(message);
                }
                if let Some(cleaned) = check.cleaned_url() {
                    self.launch_url = cleaned.clone();
                }
                if check.refreshes_weather() {
                    self.refresh_weather();
                }
            }
            AppEvent::Session(SessionServiceMessage::StatusDone(state)) => {
                tracing::debug!("Session status refreshed: {:?}", state);
            }
            AppEvent::Session(SessionServiceMessage::LogoutDone(outcome)) => {
                self.notifications.show(outcome.message());
                if !outcome.is_success() {
                    self.refresh_session();
                }
            }
            AppEvent::Playlist(PlaylistServiceMessage::GenerateDone(result)) => match result {
                Ok(link) => {
                    self.notifications.show(CREATED_MESSAGE);
                    if let Err(e) = self.navigator.open_in_new_context(link.as_str()) {
                        tracing::error!("Could not open playlist: {}", e);
                    }
                }
                Err(e) => {
                    self.notifications.show(e.user_message());
                }
            },
        }
    }

    fn started(&mut self) {
        self.pending += 1;
    }
}
