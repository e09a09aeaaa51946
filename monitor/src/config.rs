use std::time::Duration;

use market::types::MarketId;

/// Construction-time knobs for the alert monitor.
///
/// Everything has a default; a host that only wants the in-app callback
/// can run with `MonitorConfig::default()` untouched.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Time between two scheduled full passes.
    pub interval: Duration,

    /// Emit platform notifications in addition to the in-app callback.
    pub enable_push: bool,

    /// Allow-list of markets to watch. `None` means every market the
    /// provider reports.
    pub markets: Option<Vec<MarketId>>,

    /// Keep running scheduled ticks while the hosting surface is hidden.
    ///
    /// When false, a tick that lands while hidden is a pure skip: it does
    /// not evaluate alerts, touch `last_check_at`, or count for retries.
    pub enable_background: bool,

    /// Minimum time between two dispatched notifications for one alert.
    pub trigger_cooldown: Duration,

    /// Failed passes tolerated per failure cycle before the controller
    /// goes quiet until the next regular tick.
    pub max_retries: u32,

    /// Delay before a retry-only pass.
    pub retry_delay: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(5_000),
            enable_push: false,
            markets: None,
            enable_background: true,
            trigger_cooldown: Duration::from_millis(5_000),
            max_retries: 3,
            retry_delay: Duration::from_millis(10_000),
        }
    }
}

impl MonitorConfig {
    /// Whether the configured market set includes `market_id`.
    pub fn watches(&self, market_id: &MarketId) -> bool {
        match &self.markets {
            Some(allowed) => allowed.contains(market_id),
            None => true,
        }
    }
}
