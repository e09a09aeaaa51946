//! Externally observable engine state.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

/// Shared state of one monitor instance.
///
/// Counters are atomics; the two option fields sit behind a mutex that is
/// never held across an await, so updates stay atomic with respect to the
/// event loop.
#[derive(Debug, Default)]
pub struct CheckerState {
    monitoring: AtomicBool,
    triggered_count: AtomicU64,
    last_check_at: Mutex<Option<DateTime<Utc>>>,
    error: Mutex<Option<String>>,
}

impl CheckerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitoring.load(Ordering::SeqCst)
    }

    /// Flip the monitoring flag, returning the previous value. The `start`
    /// idempotency check rides on this swap.
    pub(crate) fn swap_monitoring(&self, value: bool) -> bool {
        self.monitoring.swap(value, Ordering::SeqCst)
    }

    pub fn triggered_count(&self) -> u64 {
        self.triggered_count.load(Ordering::SeqCst)
    }

    /// Only ever increases for the lifetime of the engine instance.
    pub(crate) fn add_trigger(&self) {
        self.triggered_count.fetch_add(1, Ordering::SeqCst);
    }

    /// Stamp the end of a successful full pass and clear any prior error.
    pub(crate) async fn record_success(&self, at: DateTime<Utc>) {
        *self.last_check_at.lock().await = Some(at);
        *self.error.lock().await = None;
    }

    /// Record a pass failure. `last_check_at` is left alone: it marks the
    /// last *successful* pass.
    pub(crate) async fn record_failure(&self, message: String) {
        *self.error.lock().await = Some(message);
    }

    /// Point-in-time copy for host UIs.
    pub async fn snapshot(&self) -> CheckerSnapshot {
        CheckerSnapshot {
            is_monitoring: self.is_monitoring(),
            triggered_count: self.triggered_count(),
            last_check_at: *self.last_check_at.lock().await,
            error: self.error.lock().await.clone(),
        }
    }
}

/// Read-only snapshot of [`CheckerState`].
#[derive(Debug, Clone, Serialize)]
pub struct CheckerSnapshot {
    pub is_monitoring: bool,
    pub triggered_count: u64,
    pub last_check_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fresh_state_is_all_zero() {
        let state = CheckerState::new();
        let snap = state.snapshot().await;

        assert!(!snap.is_monitoring);
        assert_eq!(snap.triggered_count, 0);
        assert!(snap.last_check_at.is_none());
        assert!(snap.error.is_none());
    }

    #[tokio::test]
    async fn success_clears_error_and_stamps_last_check() {
        let state = CheckerState::new();

        state.record_failure("provider down".into()).await;
        assert_eq!(
            state.snapshot().await.error.as_deref(),
            Some("provider down")
        );

        let now = Utc::now();
        state.record_success(now).await;

        let snap = state.snapshot().await;
        assert_eq!(snap.last_check_at, Some(now));
        assert!(snap.error.is_none());
    }

    #[tokio::test]
    async fn failure_preserves_last_check() {
        let state = CheckerState::new();
        let now = Utc::now();

        state.record_success(now).await;
        state.record_failure("boom".into()).await;

        let snap = state.snapshot().await;
        assert_eq!(snap.last_check_at, Some(now));
        assert_eq!(snap.error.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn trigger_count_only_increases() {
        let state = CheckerState::new();
        state.add_trigger();
        state.add_trigger();
        assert_eq!(state.triggered_count(), 2);
    }

    #[tokio::test]
    async fn swap_monitoring_reports_previous_value() {
        let state = CheckerState::new();
        assert!(!state.swap_monitoring(true));
        assert!(state.swap_monitoring(true));
        assert!(state.swap_monitoring(false));
    }
}
