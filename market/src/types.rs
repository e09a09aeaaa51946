use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a prediction market on the data provider's side.
#[derive(Debug, Clone, Eq, PartialEq, std::hash::Hash, Serialize, Deserialize)]
pub struct MarketId(String);

impl MarketId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MarketId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for MarketId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Per-tick snapshot of one market as reported by the data provider.
///
/// `current_price` is the latest traded probability in `[0, 1]`.
/// `None` means the provider had no fresh price this tick; the monitor
/// skips the market without treating that as an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    pub id: MarketId,
    pub question: String,
    pub current_price: Option<f64>,
}

impl Market {
    pub fn new(id: impl Into<MarketId>, question: impl Into<String>, price: Option<f64>) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            current_price: price,
        }
    }
}

/// Payload of the push price path.
#[derive(Debug, Clone)]
pub struct PriceUpdate {
    pub market_id: MarketId,
    pub price: f64,
}
