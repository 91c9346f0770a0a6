//! Browsing-context seam: full-page navigation and opening links elsewhere.

use thiserror::Error;

#[derive(Debug, Error)]
#[error("Failed to open {url}: {message}")]
pub struct NavigationError {
    pub url: String,
    pub message: String,
}

/// Where the client sends the user's browser.
pub trait Navigator: Send + Sync {
    /// Replace the current browsing context with `url` (login redirect).
    fn navigate(&self, url: &str) -> Result<(), NavigationError>;

    /// Open `url` in a new browsing context (playlist link).
    fn open_in_new_context(&self, url: &str) -> Result<(), NavigationError>;
}

/// Opens URLs in the system's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl SystemBrowser {
    fn open(url: &str) -> Result<(), NavigationError> {
        webbrowser::open(url).map_err(|e| NavigationError {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

impl Navigator for SystemBrowser {
    fn navigate(&self, url: &str) -> Result<(), NavigationError> {
        tracing::info!("Opening browser at {}", url);
        Self::open(url)
    }

    fn open_in_new_context(&self, url: &str) -> Result<(), NavigationError> {
        tracing::info!("Opening {} in a new browser window", url);
        Self::open(url)
    }
}
