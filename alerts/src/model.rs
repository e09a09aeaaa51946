use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use market::types::MarketId;
use serde::{Deserialize, Serialize};

pub type AlertId = uuid::Uuid;

/// Direction of the price condition relative to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertCondition {
    Above,
    Below,
}

impl fmt::Display for AlertCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlertCondition::Above => "Above",
            AlertCondition::Below => "Below",
        };
        f.write_str(s)
    }
}

impl FromStr for AlertCondition {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Above" | "above" => Ok(AlertCondition::Above),
            "Below" | "below" => Ok(AlertCondition::Below),
            other => Err(anyhow::anyhow!("Invalid AlertCondition value: {}", other)),
        }
    }
}

/// A user-defined price condition on one market.
///
/// Once `triggered` flips true the repository excludes the alert from
/// `active_alerts`; the monitor never re-submits a triggered alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub market_id: MarketId,
    pub condition: AlertCondition,
    /// Target probability in [0, 1].
    pub target_price: f64,
    pub triggered: bool,
    pub created_at: DateTime<Utc>,
}

impl Alert {
    pub fn new(market_id: MarketId, condition: AlertCondition, target_price: f64) -> Self {
        Self {
            id: AlertId::new_v4(),
            market_id,
            condition,
            target_price,
            triggered: false,
            created_at: Utc::now(),
        }
    }

    /// Whether `price` satisfies the alert's condition.
    pub fn is_hit(&self, price: f64) -> bool {
        match self.condition {
            AlertCondition::Above => price >= self.target_price,
            AlertCondition::Below => price <= self.target_price,
        }
    }
}

/// The fired event produced when an alert's condition is met.
///
/// Immutable once created; ownership passes to the dispatcher for the
/// duration of delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trigger {
    pub alert_id: AlertId,
    pub market_id: MarketId,
    pub target_price: f64,
    /// Market price observed at the moment of firing.
    pub price: f64,
    pub triggered_at: DateTime<Utc>,
}
