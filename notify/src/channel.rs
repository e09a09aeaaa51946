use async_trait::async_trait;

use crate::error::NotifyError;

/// A platform notification, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    /// Stable key per alert so platforms can collapse pending duplicates.
    pub tag: String,
    /// Keep the notification up until the user interacts with it.
    pub requires_interaction: bool,
}

/// Delivery seam for OS-level notifications.
///
/// Implementations are fire-and-forget from the monitor's point of view:
/// a returned error is logged and swallowed, never retried, because the
/// trigger behind it has already fired once.
#[async_trait]
pub trait NotificationChannel: Send + Sync + 'static {
    async fn show(&self, notification: &Notification) -> Result<(), NotifyError>;
}
