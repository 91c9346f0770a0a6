use std::sync::Arc;

use url::Url;
use weatherify_core::Navigator;
use weatherify_services::{BackendClient, BackendError};

use crate::error::AuthError;
use crate::markers::{read_marker, strip_markers, LoginMarker};

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful!";
pub const LOGOUT_SUCCESS_MESSAGE: &str = "Successfully logged out.";
pub const LOGOUT_REJECTED_MESSAGE: &str = "Logout failed.";
pub const LOGOUT_FAILED_MESSAGE: &str = "An error occurred during logout.";

/// Client-side view of the backend session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Not determined yet
    #[default]
    Loading,
    Authenticated,
    Unauthenticated,
}

impl SessionState {
    pub fn from_logged_in(logged_in: bool) -> Self {
        if logged_in {
            Self::Authenticated
        } else {
            Self::Unauthenticated
        }
    }

    pub fn is_authenticated(self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

/// Which of the three launch paths was taken
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCheck {
    /// `login_success=true` on the launch URL
    LoginSucceeded { cleaned_url: Url },
    /// `login_error=<reason>` on the launch URL
    LoginFailed { reason: String, cleaned_url: Url },
    /// No marker; state comes from the status endpoint
    Status(SessionState),
}

impl SessionCheck {
    pub fn session_state(&self) -> SessionState {
        match self {
            Self::LoginSucceeded { .. } => SessionState::Authenticated,
            Self::LoginFailed { .. } => SessionState::Unauthenticated,
            Self::Status(state) => *state,
        }
    }

    /// Message to show the user, if this path shows one
    pub fn notification(&self) -> Option<String> {
        match self {
            Self::LoginSucceeded { .. } => Some(LOGIN_SUCCESS_MESSAGE.to_string()),
            Self::LoginFailed { reason, .. } => Some(format!("Login failed: {}", reason)),
            Self::Status(_) => None,
        }
    }

    /// A fresh login should re-run weather resolution
    pub fn refreshes_weather(&self) -> bool {
        matches!(self, Self::LoginSucceeded { .. })
    }

    /// Launch URL with the markers removed, when there were markers
    pub fn cleaned_url(&self) -> Option<&Url> {
        match self {
            Self::LoginSucceeded { cleaned_url } | Self::LoginFailed { cleaned_url, .. } => {
                Some(cleaned_url)
            }
            Self::Status(_) => None,
        }
    }
}

/// Result of a logout request
#[derive(Debug, Clone)]
pub enum LogoutOutcome {
    LoggedOut,
    /// Backend answered with a non-success status
    Rejected(u16),
    /// No usable answer from the backend
    Failed(BackendError),
}

impl LogoutOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            Self::LoggedOut => LOGOUT_SUCCESS_MESSAGE,
            Self::Rejected(_) => LOGOUT_REJECTED_MESSAGE,
            Self::Failed(_) => LOGOUT_FAILED_MESSAGE,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::LoggedOut)
    }
}

/// Determines and changes the backend session state.
#[derive(Debug, Clone)]
pub struct SessionStatusChecker {
    backend: Arc<BackendClient>,
}

impl SessionStatusChecker {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }

    /// Marker path only; `None` means the status endpoint decides.
    pub fn inspect(launch_url: &Url) -> Option<SessionCheck> {
        match read_marker(launch_url)? {
            LoginMarker::Succeeded => {
                tracing::info!("Login successful callback detected from URL");
                Some(SessionCheck::LoginSucceeded {
                    cleaned_url: strip_markers(launch_url),
                })
            }
            LoginMarker::Failed(reason) => {
                tracing::error!("Login error detected from URL: {}", reason);
                Some(SessionCheck::LoginFailed {
                    reason,
                    cleaned_url: strip_markers(launch_url),
                })
            }
        }
    }

    /// Pick exactly one launch path for `launch_url`.
    pub async fn check(&self, launch_url: &Url) -> SessionCheck {
        match Self::inspect(launch_url) {
            Some(check) => check,
            None => SessionCheck::Status(self.query_status().await),
        }
    }

    /// Ask the backend. Any failure counts as logged out.
    pub async fn query_status(&self) -> SessionState {
        match self.backend.session_status().await {
            Ok(status) => {
                match (status.logged_in, status.user_display_name.as_deref()) {
                    (true, Some(name)) => {
                        tracing::info!("User is logged in (session active). User: {}", name);
                    }
                    (true, None) => tracing::info!("User is logged in (session active)"),
                    (false, _) => tracing::info!("User is not logged in (no active session)"),
                }
                SessionState::from_logged_in(status.logged_in)
            }
            Err(e) => {
                tracing::error!("Failed to check login status: {}", e);
                SessionState::Unauthenticated
            }
        }
    }

    /// Send the browser to the backend's login page.
    ///
    /// The backend redirects back to the app URL with a login marker.
    pub fn login(&self, navigator: &dyn Navigator) -> Result<Url, AuthError> {
        let url = self.backend.login_url()?;
        tracing::info!("Redirecting to backend for Spotify login: {}", url);
        navigator.navigate(url.as_str())?;
        Ok(url)
    }

    pub async fn logout(&self) -> LogoutOutcome {
        match self.backend.logout().await {
            Ok(()) => {
                tracing::info!("Logged out");
                LogoutOutcome::LoggedOut
            }
            Err(BackendError::Status { status, .. }) => {
                tracing::warn!("Logout rejected with status {}", status);
                LogoutOutcome::Rejected(status)
            }
            Err(e) => {
                tracing::error!("Logout error: {}", e);
                LogoutOutcome::Failed(e)
            }
        }
    }
}
