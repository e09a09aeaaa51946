use async_trait::async_trait;
use market::types::MarketId;

use crate::model::{Alert, AlertId, Trigger};

/// Storage-agnostic view of the user's alerts, as the monitor consumes it.
///
/// Condition evaluation lives behind `check_and_trigger` so the monitor
/// only orchestrates *when* to check, never *what* a crossing means.
#[async_trait]
pub trait AlertRepository: Send + Sync + 'static {
    /// Non-triggered alerts for one market.
    async fn active_alerts(&self, market_id: &MarketId) -> anyhow::Result<Vec<Alert>>;

    /// Re-evaluate one alert against `price`. If the condition is met the
    /// repository marks the alert triggered and returns the `Trigger`;
    /// otherwise `None`.
    async fn check_and_trigger(
        &self,
        alert_id: AlertId,
        price: f64,
    ) -> anyhow::Result<Option<Trigger>>;
}
