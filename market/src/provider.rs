use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use crate::types::{Market, PriceUpdate};

/// High-level abstraction over the venue's market data feed.
///
/// The monitor polls `list_markets` on its interval; providers that also
/// support push delivery can stream fresher prices through
/// `subscribe_prices`.
#[async_trait]
pub trait MarketDataProvider: Send + Sync + 'static {
    /// Latest snapshot of every market the provider knows about.
    async fn list_markets(&self) -> anyhow::Result<Vec<Market>>;

    /// Start streaming live price updates into `sender`.
    ///
    /// Returns `Ok(false)` when the provider is poll-only, which is the
    /// default. A `true` return means the provider owns the sending side
    /// until it is dropped.
    async fn subscribe_prices(&self, _sender: Sender<PriceUpdate>) -> anyhow::Result<bool> {
        Ok(false)
    }
}
