//! Session status, refresh and logout tasks.

use std::sync::Arc;

use url::Url;
use weatherify_auth::{LogoutOutcome, SessionCheck, SessionState, SessionStatusChecker};

use super::{deliver, EventSender};

#[derive(Debug)]
pub enum SessionServiceMessage {
    /// One launch-URL check finished
    CheckDone(SessionCheck),
    /// Status endpoint re-queried
    StatusDone(SessionState),
    LogoutDone(LogoutOutcome),
}

/// Decide the session state for `launch_url`. Sends `CheckDone`.
pub fn request_check(tx: &EventSender, checker: Arc<SessionStatusChecker>, launch_url: Url) {
    let tx = tx.clone();
    tokio::spawn(async move {
        let check = checker.check(&launch_url).await;
        deliver(&tx, SessionServiceMessage::CheckDone(check));
    });
}

/// Ask the status endpoint again, ignoring launch markers. Sends `StatusDone`.
pub fn request_status(tx: &EventSender, checker: Arc<SessionStatusChecker>) {
    let tx = tx.clone();
    tokio::spawn(async move {
        let state = checker.query_status().await;
        deliver(&tx, SessionServiceMessage::StatusDone(state));
    });
}

/// End the backend session. Sends `LogoutDone`.
pub fn request_logout(tx: &EventSender, checker: Arc<SessionStatusChecker>) {
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = checker.logout().await;
        deliver(&tx, SessionServiceMessage::LogoutDone(outcome));
    });
}
