use thiserror::Error;
use weatherify_core::NavigationError;
use weatherify_services::BackendError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Could not open the login page: {0}")]
    Navigation(#[from] NavigationError),

    #[error("Port {0} already in use for the login redirect")]
    PortInUse(u16),

    #[error("Login redirect was never received")]
    RedirectAborted,

    #[error("Invalid redirect URL: {0}")]
    InvalidRedirect(String),
}

impl AuthError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Backend(_) => "Could not reach the Weatherify service.",
            Self::Navigation(_) => "Could not open your browser for login.",
            Self::PortInUse(_) => "Login port is busy. Close other apps and try again.",
            Self::RedirectAborted => "Login was cancelled.",
            Self::InvalidRedirect(_) => "Login returned an unexpected address.",
        }
    }
}
