#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, mpsc::Sender};

use alerts::model::{Alert, AlertId, Trigger};
use alerts::repository::AlertRepository;
use market::provider::MarketDataProvider;
use market::types::{Market, MarketId, PriceUpdate};

/// Repository whose alerts never leave the active set: `check_and_trigger`
/// fires on every qualifying price without flipping `triggered`. This
/// simulates the window where the flag write is not yet visible, leaving
/// the cooldown tracker as the only duplicate suppressor.
#[derive(Default)]
pub struct RearmingRepo {
    alerts: Mutex<Vec<Alert>>,
    pub active_calls: AtomicU32,
}

impl RearmingRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, alert: Alert) {
        self.alerts.lock().await.push(alert);
    }

    pub fn active_calls(&self) -> u32 {
        self.active_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AlertRepository for RearmingRepo {
    async fn active_alerts(&self, market_id: &MarketId) -> anyhow::Result<Vec<Alert>> {
        self.active_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .alerts
            .lock()
            .await
            .iter()
            .filter(|a| a.market_id == *market_id)
            .cloned()
            .collect())
    }

    async fn check_and_trigger(
        &self,
        alert_id: AlertId,
        price: f64,
    ) -> anyhow::Result<Option<Trigger>> {
        let guard = self.alerts.lock().await;
        let alert = guard
            .iter()
            .find(|a| a.id == alert_id)
            .ok_or_else(|| anyhow::anyhow!("Alert not found"))?;

        if !alert.is_hit(price) {
            return Ok(None);
        }

        Ok(Some(Trigger {
            alert_id: alert.id,
            market_id: alert.market_id.clone(),
            target_price: alert.target_price,
            price,
            triggered_at: Utc::now(),
        }))
    }
}

/// Poll-only provider serving a fixed set of markets.
#[derive(Default)]
pub struct StaticProvider {
    markets: Mutex<Vec<Market>>,
    calls: AtomicU32,
}

impl StaticProvider {
    pub fn new(markets: Vec<Market>) -> Self {
        Self {
            markets: Mutex::new(markets),
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn set_price(&self, market_id: &MarketId, price: Option<f64>) {
        let mut guard = self.markets.lock().await;
        if let Some(m) = guard.iter_mut().find(|m| m.id == *market_id) {
            m.current_price = price;
        }
    }
}

#[async_trait]
impl MarketDataProvider for StaticProvider {
    async fn list_markets(&self) -> anyhow::Result<Vec<Market>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.markets.lock().await.clone())
    }
}

/// Provider that fails every poll. Exercises the retry controller.
#[derive(Default)]
pub struct FailingProvider {
    calls: AtomicU32,
}

impl FailingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataProvider for FailingProvider {
    async fn list_markets(&self) -> anyhow::Result<Vec<Market>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        anyhow::bail!("price feed unavailable")
    }
}

/// Fails the first `fail_count` polls, then serves markets normally.
pub struct FlakyProvider {
    markets: Mutex<Vec<Market>>,
    fail_count: u32,
    calls: AtomicU32,
}

impl FlakyProvider {
    pub fn new(markets: Vec<Market>, fail_count: u32) -> Self {
        Self {
            markets: Mutex::new(markets),
            fail_count,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataProvider for FlakyProvider {
    async fn list_markets(&self) -> anyhow::Result<Vec<Market>> {
        let seen = self.calls.fetch_add(1, Ordering::SeqCst);
        if seen < self.fail_count {
            anyhow::bail!("price feed unavailable")
        }
        Ok(self.markets.lock().await.clone())
    }
}

/// Push-capable provider: polls like `StaticProvider` and hands the test
/// the sending half of the price feed.
pub struct PushProvider {
    markets: Mutex<Vec<Market>>,
    pub feed: Mutex<Option<Sender<PriceUpdate>>>,
}

impl PushProvider {
    pub fn new(markets: Vec<Market>) -> Self {
        Self {
            markets: Mutex::new(markets),
            feed: Mutex::new(None),
        }
    }

    pub async fn sender(&self) -> Option<Sender<PriceUpdate>> {
        self.feed.lock().await.clone()
    }
}

#[async_trait]
impl MarketDataProvider for PushProvider {
    async fn list_markets(&self) -> anyhow::Result<Vec<Market>> {
        Ok(self.markets.lock().await.clone())
    }

    async fn subscribe_prices(&self, sender: Sender<PriceUpdate>) -> anyhow::Result<bool> {
        *self.feed.lock().await = Some(sender);
        Ok(true)
    }
}

pub fn make_alert(market_id: &MarketId, target: f64) -> Alert {
    Alert::new(
        market_id.clone(),
        alerts::model::AlertCondition::Above,
        target,
    )
}

pub fn make_market(id: &str, price: Option<f64>) -> Market {
    Market::new(id, format!("Question for {id}?"), price)
}
