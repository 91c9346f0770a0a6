//! Local listener for the backend's post-login redirect.
//!
//! The backend sends the browser back to the app URL with a login marker.
//! For a native client that URL points at this listener, which hands the full
//! redirect URL back to the caller and shuts down. The browser also sends the
//! backend's session cookie along (cookies ignore the port), so the listener
//! passes it on for the client's own cookie jar.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::{oneshot, Mutex};
use url::Url;
use warp::Filter;

use crate::error::AuthError;

const LANDING_PAGE: &str = "<html><body><h1>Weatherify</h1><p>Login finished. You can close this window and return to Weatherify.</p></body></html>";

/// Path, raw query and `Cookie` header of the captured request
type Captured = (String, String, Option<String>);
type RedirectSender = Arc<Mutex<Option<oneshot::Sender<Captured>>>>;

/// The redirect the browser followed after login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRedirect {
    /// Redirect target as an app URL
    pub url: Url,
    /// `Cookie` header the browser sent with the redirect
    pub cookie: Option<String>,
}

/// One-shot HTTP listener that captures a single redirect.
pub struct RedirectListener {
    addr: SocketAddr,
    app_url: Url,
    redirect_rx: oneshot::Receiver<Captured>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl RedirectListener {
    /// Start listening on the loopback interface at `app_url`'s port.
    pub fn bind(app_url: &Url) -> Result<Self, AuthError> {
        let port = app_url
            .port_or_known_default()
            .ok_or_else(|| AuthError::InvalidRedirect(app_url.to_string()))?;

        let (tx, redirect_rx) = oneshot::channel();
        let tx: RedirectSender = Arc::new(Mutex::new(Some(tx)));
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let raw_query = warp::query::raw()
            .or(warp::any().map(String::new))
            .unify();

        let routes = warp::get()
            .and(warp::path::full())
            .and(raw_query)
            .and(warp::header::optional::<String>("cookie"))
            .and(warp::any().map(move || tx.clone()))
            .and_then(
                |path: warp::path::FullPath,
                 query: String,
                 cookie: Option<String>,
                 tx: RedirectSender| async move {
                    if let Some(sender) = tx.lock().await.take() {
                        let _ = sender.send((path.as_str().to_string(), query, cookie));
                    }
                    Ok::<_, warp::Rejection>(warp::reply::html(LANDING_PAGE))
                },
            );

        let (addr, server) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(([127, 0, 0, 1], port), async {
                let _ = shutdown_rx.await;
            })
            .map_err(|e| {
                tracing::error!("Failed to bind redirect listener on port {}: {}", port, e);
                AuthError::PortInUse(port)
            })?;

        tokio::spawn(server);
        tracing::info!("Waiting for login redirect on {}", addr);

        Ok(Self {
            addr,
            app_url: app_url.clone(),
            redirect_rx,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Wait for the redirect. Its URL takes path and query from the request
    /// and the origin from the configured app URL.
    pub async fn wait_for_redirect(mut self) -> Result<LoginRedirect, AuthError> {
        let received = (&mut self.redirect_rx).await;
        self.shutdown();

        let (path, query, cookie) = received.map_err(|_| AuthError::RedirectAborted)?;

        let mut url = self
            .app_url
            .join(&path)
            .map_err(|e| AuthError::InvalidRedirect(format!("{}: {}", path, e)))?;
        url.set_query(if query.is_empty() { None } else { Some(&query) });

        tracing::info!(
            "Received login redirect: {} (cookie: {})",
            url,
            if cookie.is_some() { "yes" } else { "no" }
        );
        Ok(LoginRedirect { url, cookie })
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for RedirectListener {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::markers::{read_marker, LoginMarker};

    fn free_port() -> u16 {
        std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port()
    }

    #[tokio::test]
    async fn test_captures_redirect_url() {
        let port = free_port();
        let app_url = Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();
        let listener = RedirectListener::bind(&app_url).unwrap();
        let addr = listener.local_addr();

        let waiter = tokio::spawn(listener.wait_for_redirect());

        let body = reqwest::get(format!("http://{}/?login_success=true", addr))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(body.contains("Login finished"));

        let redirect = waiter.await.unwrap().unwrap();
        assert_eq!(redirect.url.port(), Some(port));
        assert_eq!(read_marker(&redirect.url), Some(LoginMarker::Succeeded));
        assert_eq!(redirect.cookie, None);
    }

    #[tokio::test]
    async fn test_captures_browser_cookie() {
        let port = free_port();
        let app_url = Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();
        let listener = RedirectListener::bind(&app_url).unwrap();
        let addr = listener.local_addr();

        let waiter = tokio::spawn(listener.wait_for_redirect());

        let status = reqwest::Client::new()
            .get(format!("http://{}/done?login_error=denied", addr))
            .header("cookie", "JSESSIONID=abc")
            .send()
            .await
            .unwrap()
            .status();
        assert!(status.is_success());

        let redirect = waiter.await.unwrap().unwrap();
        assert_eq!(redirect.url.path(), "/done");
        assert_eq!(redirect.cookie.as_deref(), Some("JSESSIONID=abc"));
    }

    #[tokio::test]
    async fn test_port_in_use() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = taken.local_addr().unwrap().port();
        let app_url = Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();

        let result = RedirectListener::bind(&app_url);
        assert!(matches!(result, Err(AuthError::PortInUse(p)) if p == port));
    }
}
