use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::model::{Alert, AlertCondition, AlertId, Trigger};
use crate::repository::AlertRepository;
use market::types::MarketId;

/// In-memory alert book: the reference `AlertRepository` for embedders
/// that do not persist alerts, and the workhorse of the test suite.
///
/// Alerts are one-shot: `check_and_trigger` flips `triggered` and the
/// alert permanently leaves the active set.
pub struct MemoryAlertBook {
    alerts: Arc<Mutex<HashMap<AlertId, Alert>>>,
    by_market: Arc<Mutex<HashMap<MarketId, Vec<AlertId>>>>,
}

impl MemoryAlertBook {
    pub fn new() -> Self {
        Self {
            alerts: Arc::new(Mutex::new(HashMap::new())),
            by_market: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Create a new alert and index it by market.
    pub async fn create_alert(
        &self,
        market_id: MarketId,
        condition: AlertCondition,
        target_price: f64,
    ) -> AlertId {
        let alert = Alert::new(market_id, condition, target_price);
        let id = alert.id;

        {
            let mut idx = self.by_market.lock().await;
            idx.entry(alert.market_id.clone()).or_default().push(id);
        }

        let mut guard = self.alerts.lock().await;
        guard.insert(id, alert);

        id
    }

    /// Remove an alert entirely, triggered or not.
    pub async fn cancel_alert(&self, alert_id: AlertId) -> anyhow::Result<()> {
        let mut guard = self.alerts.lock().await;
        let alert = guard
            .remove(&alert_id)
            .ok_or_else(|| anyhow::anyhow!("Alert not found"))?;
        drop(guard);

        let mut idx = self.by_market.lock().await;
        if let Some(list) = idx.get_mut(&alert.market_id) {
            list.retain(|id| *id != alert_id);
        }

        Ok(())
    }

    pub async fn get_alert(&self, alert_id: AlertId) -> Option<Alert> {
        let guard = self.alerts.lock().await;
        guard.get(&alert_id).cloned()
    }

    /// Every alert on one market, including already-triggered ones.
    pub async fn alerts_for_market(&self, market_id: &MarketId) -> Vec<Alert> {
        let ids_opt = {
            let idx = self.by_market.lock().await;
            idx.get(market_id).cloned()
        };

        let Some(ids) = ids_opt else { return vec![] };

        let guard = self.alerts.lock().await;
        ids.into_iter()
            .filter_map(|id| guard.get(&id).cloned())
            .collect()
    }
}

impl Default for MemoryAlertBook {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AlertRepository for MemoryAlertBook {
    async fn active_alerts(&self, market_id: &MarketId) -> anyhow::Result<Vec<Alert>> {
        Ok(self
            .alerts_for_market(market_id)
            .await
            .into_iter()
            .filter(|a| !a.triggered)
            .collect())
    }

    async fn check_and_trigger(
        &self,
        alert_id: AlertId,
        price: f64,
    ) -> anyhow::Result<Option<Trigger>> {
        let mut guard = self.alerts.lock().await;
        let alert = guard
            .get_mut(&alert_id)
            .ok_or_else(|| anyhow::anyhow!("Alert not found"))?;

        // Already fired: the flag is authoritative, never fire twice.
        if alert.triggered {
            return Ok(None);
        }

        if !alert.is_hit(price) {
            return Ok(None);
        }

        alert.triggered = true;

        Ok(Some(Trigger {
            alert_id: alert.id,
            market_id: alert.market_id.clone(),
            target_price: alert.target_price,
            price,
            triggered_at: Utc::now(),
        }))
    }
}
