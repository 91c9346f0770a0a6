//! Transient, auto-dismissing user notifications.
//!
//! At most one notification is visible. `show` replaces the current one and
//! schedules a hide keyed by the new notification's id, so a timer left over
//! from an older notification never dismisses a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

/// How long a notification stays visible by default.
pub const DEFAULT_DISPLAY_DURATION: Duration = Duration::from_secs(3);

/// Identity of a shown notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub expires_after: Duration,
}

/// Shows one notification at a time and hides it after a fixed duration.
///
/// Cheap to clone; clones share the same visible slot.
#[derive(Debug, Clone)]
pub struct NotificationPresenter {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    next_id: AtomicU64,
    display: Duration,
    slot: watch::Sender<Option<Notification>>,
}

impl Default for NotificationPresenter {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_DURATION)
    }
}

impl NotificationPresenter {
    pub fn new(display: Duration) -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                next_id: AtomicU64::new(1),
                display,
                slot,
            }),
        }
    }

    /// Show `message`, replacing whatever is visible.
    ///
    /// The hide timer needs a tokio runtime; without one the notification
    /// stays until replaced or hidden explicitly.
    pub fn show(&self, message: impl Into<String>) -> NotificationId {
        let id = NotificationId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let message = message.into();
        tracing::info!(id = id.0, "Notification: {}", message);

        self.inner.slot.send_replace(Some(Notification {
            id,
            message,
            expires_after: self.inner.display,
        }));

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let presenter = self.clone();
                let display = self.inner.display;
                handle.spawn(async move {
                    tokio::time::sleep(display).await;
                    presenter.hide(id);
                });
            }
            Err(_) => {
                tracing::warn!(id = id.0, "No runtime available; notification will not auto-hide");
            }
        }

        id
    }

    /// Hide the notification with `id` if it is still the visible one.
    ///
    /// Returns true if something was hidden.
    pub fn hide(&self, id: NotificationId) -> bool {
        let hidden = self.inner.slot.send_if_modified(|current| {
            if current.as_ref().map(|n| n.id) == Some(id) {
                *current = None;
                true
            } else {
                false
            }
        });
        if hidden {
            tracing::debug!(id = id.0, "Notification hidden");
        }
        hidden
    }

    /// The visible notification, if any.
    pub fn current(&self) -> Option<Notification> {
        self.inner.slot.borrow().clone()
    }

    /// Watch the visible notification change over time.
    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.inner.slot.subscribe()
    }

    pub fn display_duration(&self) -> Duration {
        self.inner.display
    }
}
