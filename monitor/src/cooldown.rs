//! Debounce map: alert id -> last trigger time.
//!
//! The repository's `triggered` flag is authoritative for "has this alert
//! ever fired"; the cooldown only suppresses duplicate notifications when
//! the same crossing is observed by more than one evaluation (a timer tick
//! plus a push update) before that flag write is visible.
//
//  Deliberately pure with respect to time: callers pass `now` in, which
//  keeps the tracker trivially testable under paused tokio time.

use std::collections::HashMap;
use std::time::Duration;

use alerts::model::AlertId;
use tokio::time::Instant;

#[derive(Debug)]
pub struct CooldownTracker {
    window: Duration,
    entries: HashMap<AlertId, Instant>,
}

impl CooldownTracker {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            entries: HashMap::new(),
        }
    }

    /// True iff a trigger for `alert_id` was recorded less than the window
    /// ago. An absent entry is never "in cooldown".
    ///
    /// Expired entries are dropped lazily here; there is no eviction task.
    pub fn is_in_cooldown(&mut self, alert_id: AlertId, now: Instant) -> bool {
        match self.entries.get(&alert_id) {
            Some(&last) if now.duration_since(last) < self.window => true,
            Some(_) => {
                self.entries.remove(&alert_id);
                false
            }
            None => false,
        }
    }

    /// Unconditionally stamp `alert_id` with `now`, overwriting any
    /// previous entry.
    pub fn record_trigger(&mut self, alert_id: AlertId, now: Instant) {
        self.entries.insert(alert_id, now);
    }

    /// Drop every entry; all alerts become immediately eligible again.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
