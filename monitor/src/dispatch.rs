//! Fan-out of fired triggers to the configured sinks.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use alerts::model::Trigger;
use notify::{Notification, NotificationChannel, PermissionGate, PermissionStatus};
use tracing::{debug, warn};

use crate::state::CheckerState;

/// In-app callback invoked synchronously with every fired trigger.
pub type NotificationCallback = Arc<dyn Fn(&Trigger) + Send + Sync>;

/// Delivers one trigger to the callback and, when enabled and permitted,
/// the platform channel, then bumps the trigger counter.
///
/// Every step is best-effort and independently failable: a broken sink is
/// logged and swallowed, never retried, because the trigger has already
/// fired once and a redelivery would break the cooldown guarantee.
pub struct NotificationDispatcher {
    callback: Option<NotificationCallback>,
    push_enabled: bool,
    permission: Arc<dyn PermissionGate>,
    channel: Arc<dyn NotificationChannel>,
    state: Arc<CheckerState>,
}

impl NotificationDispatcher {
    pub fn new(
        callback: Option<NotificationCallback>,
        push_enabled: bool,
        permission: Arc<dyn PermissionGate>,
        channel: Arc<dyn NotificationChannel>,
        state: Arc<CheckerState>,
    ) -> Self {
        Self {
            callback,
            push_enabled,
            permission,
            channel,
            state,
        }
    }

    /// `question` is the market's human-readable subject line.
    pub async fn dispatch(&self, trigger: &Trigger, question: &str) {
        if let Some(cb) = &self.callback {
            // Host code; a panic here must not take the pass down.
            let outcome = catch_unwind(AssertUnwindSafe(|| cb(trigger)));
            if outcome.is_err() {
                warn!(alert_id = %trigger.alert_id, "notification callback panicked");
            }
        }

        if self.push_enabled {
            match self.permission.status() {
                PermissionStatus::Granted => {
                    let notification = Notification {
                        title: "Price alert".to_string(),
                        body: format!(
                            "{} hit {:.1}% (target {:.1}%)",
                            question,
                            trigger.price * 100.0,
                            trigger.target_price * 100.0
                        ),
                        tag: trigger.alert_id.to_string(),
                        requires_interaction: true,
                    };

                    if let Err(e) = self.channel.show(&notification).await {
                        warn!(
                            alert_id = %trigger.alert_id,
                            error = %e,
                            "platform notification failed"
                        );
                    }
                }
                status => {
                    debug!(alert_id = %trigger.alert_id, ?status, "push skipped: not granted");
                }
            }
        }

        self.state.add_trigger();
    }
}
