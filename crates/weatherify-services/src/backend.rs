//! Weatherify backend client.
//!
//! All calls carry the session cookie jar, so a session established by the
//! backend (or seeded from configuration) is sent with every request.

use std::sync::Arc;

use reqwest::cookie::Jar;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use url::Url;
use weatherify_core::ReqwestErrorExt;
use weatherify_weather::Mood;

use crate::error::BackendError;

pub const STATUS_PATH: &str = "/api/v1/auth/spotify/status";
pub const LOGIN_PATH: &str = "/api/v1/auth/spotify/login";
pub const LOGOUT_PATH: &str = "/api/v1/auth/spotify/logout";
pub const GENERATE_PATH: &str = "/api/v1/playlist/generate";

/// Response of the session-status endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub logged_in: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_display_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    weather: Mood,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    playlist_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Link to a generated playlist. Opaque; only ever opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistLink(String);

impl PlaylistLink {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlaylistLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Weatherify backend API client
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: Url,
    client: Arc<Client>,
    jar: Arc<Jar>,
}

impl BackendClient {
    /// Create a client for the backend at `base_url`.
    ///
    /// `session_cookie` (`name=value`) is added to the cookie jar for the
    /// backend origin.
    pub fn new(base_url: &str, session_cookie: Option<&str>) -> Result<Self, BackendError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| BackendError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(jar.clone())
            .build()
            .map_err(ReqwestErrorExt::into_network_error)?;

        let backend = Self {
            base_url,
            client: Arc::new(client),
            jar,
        };
        if let Some(cookie) = session_cookie {
            backend.add_session_cookie(cookie);
        }
        Ok(backend)
    }

    /// Add browser cookies to the jar for the backend origin.
    ///
    /// Takes a `Cookie` request header (`a=1; b=2`) or a single `name=value`.
    /// Returns how many cookies were added.
    pub fn add_session_cookie(&self, header: &str) -> usize {
        let mut added = 0;
        for pair in header.split(';').map(str::trim) {
            match pair.split_once('=') {
                Some((name, _)) if !name.trim().is_empty() => {
                    self.jar.add_cookie_str(pair, &self.base_url);
                    added += 1;
                }
                _ => {}
            }
        }
        tracing::debug!("Added {} session cookie(s) for {}", added, self.base_url);
        added
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path)
            .map_err(|e| BackendError::InvalidUrl(format!("{}: {}", path, e)))
    }

    /// Where the browser goes to start a login. Not an API call.
    pub fn login_url(&self) -> Result<Url, BackendError> {
        self.endpoint(LOGIN_PATH)
    }

    /// Ask the backend whether the current session is logged in.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn session_status(&self) -> Result<SessionStatus, BackendError> {
        let response = self
            .client
            .get(self.endpoint(STATUS_PATH)?)
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        let response = Self::ensure_success(response).await?;
        response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    /// End the backend session.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn logout(&self) -> Result<(), BackendError> {
        let response = self
            .client
            .get(self.endpoint(LOGOUT_PATH)?)
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    /// Ask the backend to build a playlist for `mood`.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn generate_playlist(&self, mood: Mood) -> Result<PlaylistLink, BackendError> {
        let response = self
            .client
            .post(self.endpoint(GENERATE_PATH)?)
            .json(&GenerateRequest { weather: mood })
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        let response = Self::ensure_success(response).await?;
        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        Ok(PlaylistLink(body.playlist_url))
    }

    /// Turn a non-2xx response into `BackendError::Status`, keeping the
    /// body's `message` when it has one.
    async fn ensure_success(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        tracing::warn!("Backend returned {}: {}", status, text);
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty());

        Err(BackendError::Status {
            status: status.as_u16(),
            message,
        })
    }
}
