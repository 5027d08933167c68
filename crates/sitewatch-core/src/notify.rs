// ── Notification sink ──
//
// Fire-and-forget toasts emitted by the cache and the mutation
// coordinator. No return value and no retry coupling.

use std::fmt;

use tokio::sync::broadcast;
use tracing::{info, warn};

const NOTIFICATION_CHANNEL_SIZE: usize = 64;

/// Visual weight of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Success,
    Destructive,
}

/// A toast notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

impl Notification {
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            title: "Success".into(),
            description: description.into(),
            variant: Variant::Success,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".into(),
            description: description.into(),
            variant: Variant::Destructive,
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

/// Anything that can surface a [`Notification`] to the user.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Logs notifications and nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, n: Notification) {
        log_notification(&n);
    }
}

/// Fans notifications out over a `broadcast` channel.
///
/// Notifications sent while nobody is subscribed are dropped.
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    tx: broadcast::Sender<Notification>,
}

impl BroadcastSink {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(NOTIFICATION_CHANNEL_SIZE);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastSink {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for BroadcastSink {
    fn notify(&self, n: Notification) {
        log_notification(&n);
        let _ = self.tx.send(n);
    }
}

fn log_notification(n: &Notification) {
    match n.variant {
        Variant::Success => info!(title = %n.title, "{}", n.description),
        Variant::Destructive => warn!(title = %n.title, "{}", n.description),
    }
}
