//! Mood-matched playlist requests.

use std::sync::Arc;

use thiserror::Error;
use weatherify_weather::Mood;

use crate::backend::{BackendClient, PlaylistLink};
use crate::error::BackendError;

pub const NOT_READY_MESSAGE: &str = "Weather data not ready yet, please try again.";
pub const IN_PROGRESS_MESSAGE: &str = "In progress!";
pub const CREATED_MESSAGE: &str = "Playlist created and music started!";
pub const REJECTED_FALLBACK_MESSAGE: &str = "Failed to create playlist.";
pub const FAILED_MESSAGE: &str = "An error occurred while generating the playlist.";

#[derive(Debug, Clone, Error)]
pub enum PlaylistError {
    /// No mood to send yet; nothing was requested.
    #[error("Weather mood not available")]
    NotReady,

    /// The backend answered with a non-success status.
    #[error("Playlist request rejected ({status})")]
    Rejected { status: u16, message: Option<String> },

    /// The request never produced a usable answer.
    #[error("Playlist request failed: {0}")]
    Failed(BackendError),
}

impl From<BackendError> for PlaylistError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::Status { status, message } => Self::Rejected { status, message },
            other => Self::Failed(other),
        }
    }
}

impl PlaylistError {
    /// Notification text for this failure
    pub fn user_message(&self) -> &str {
        match self {
            Self::NotReady => NOT_READY_MESSAGE,
            Self::Rejected {
                message: Some(m), ..
            } => m,
            Self::Rejected { message: None, .. } => REJECTED_FALLBACK_MESSAGE,
            Self::Failed(_) => FAILED_MESSAGE,
        }
    }
}

/// Sends the current mood to the backend and returns the playlist link.
#[derive(Debug, Clone)]
pub struct PlaylistRequester {
    backend: Arc<BackendClient>,
}

impl PlaylistRequester {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }

    /// Precondition for a request: a known mood.
    pub fn check_ready(mood: Mood) -> Result<Mood, PlaylistError> {
        if mood.is_known() {
            Ok(mood)
        } else {
            Err(PlaylistError::NotReady)
        }
    }

    /// Request a playlist for `mood`. An unknown mood is rejected without
    /// touching the network.
    pub async fn generate(&self, mood: Mood) -> Result<PlaylistLink, PlaylistError> {
        let mood = Self::check_ready(mood)?;
        tracing::info!("Sending weather to backend: {}", mood);

        match self.backend.generate_playlist(mood).await {
            Ok(link) => {
                tracing::info!("Playlist URL: {}", link);
                Ok(link)
            }
            Err(e) => {
                tracing::error!("Generate error: {}", e);
                Err(e.into())
            }
        }
    }
}
