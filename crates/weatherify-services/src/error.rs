//! Backend-specific error types.

use thiserror::Error;
use weatherify_core::NetworkError;

#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Non-2xx response; `message` is the body's `message` field when present.
    #[error("Backend returned {status}{}", detail(.message))]
    Status { status: u16, message: Option<String> },

    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

impl BackendError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(e) => e.user_message().to_string(),
            Self::Status { message: Some(m), .. } => m.clone(),
            Self::Status { status, .. } if *status == 401 || *status == 403 => {
                "Please log in again.".to_string()
            }
            Self::Status { .. } => "The backend rejected the request.".to_string(),
            Self::InvalidResponse(_) => {
                "Received an unexpected response from the backend.".to_string()
            }
            Self::InvalidUrl(_) => "The backend URL is misconfigured.".to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
