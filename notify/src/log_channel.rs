use async_trait::async_trait;

use crate::channel::{Notification, NotificationChannel};
use crate::error::NotifyError;

/// Channel that writes notifications to the tracing log.
///
/// The default for hosts without an OS notification surface; also handy
/// as a tap while developing real channels.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogChannel;

#[async_trait]
impl NotificationChannel for LogChannel {
    async fn show(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            tag = %notification.tag,
            title = %notification.title,
            body = %notification.body,
            "notification"
        );
        Ok(())
    }
}
