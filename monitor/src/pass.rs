//! The full pass and the per-market alert evaluation pass.
//!
//! Both the timer path and the push path funnel into `evaluate_market`,
//! relying on the shared cooldown tracker (not mutual exclusion) to keep
//! one crossing from firing twice.

use std::collections::HashMap;
use std::sync::Arc;

use alerts::repository::AlertRepository;
use market::provider::MarketDataProvider;
use market::types::MarketId;
use common::logger::child_span;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{Instrument, Span, debug, warn};

use crate::config::MonitorConfig;
use crate::cooldown::CooldownTracker;
use crate::dispatch::NotificationDispatcher;
use crate::state::CheckerState;

/// Everything a pass needs, shared between the engine handle, the monitor
/// task, and the push task.
pub(crate) struct MonitorCtx {
    pub repo: Arc<dyn AlertRepository>,
    pub provider: Arc<dyn MarketDataProvider>,
    pub dispatcher: NotificationDispatcher,
    pub cooldowns: Arc<Mutex<CooldownTracker>>,
    /// Market id -> question, refreshed on every full pass so the push
    /// path can render notification subjects without a provider round trip.
    pub questions: Arc<Mutex<HashMap<MarketId, String>>>,
    pub state: Arc<CheckerState>,
    pub config: MonitorConfig,
}

/// One complete evaluation of every watched market.
///
/// Errors here are pass-level (transient provider or repository fetch
/// failures); the caller surfaces them in `state.error` and hands them to
/// the retry controller.
pub(crate) async fn run_pass(ctx: &MonitorCtx) -> anyhow::Result<()> {
    let markets = ctx.provider.list_markets().await?;

    for market in markets {
        if !ctx.config.watches(&market.id) {
            continue;
        }

        // No fresh price is a skip, not an error.
        let Some(price) = market.current_price else {
            debug!(market_id = %market.id, "no fresh price, skipping");
            continue;
        };

        {
            let mut questions = ctx.questions.lock().await;
            questions.insert(market.id.clone(), market.question.clone());
        }

        evaluate_market(ctx, &market.id, &market.question, price)
            .instrument(child_span("evaluate_market"))
            .await?;
    }

    Ok(())
}

/// Evaluate every active alert on one market against `price`.
///
/// The cooldown check happens before, and the cooldown *record* happens
/// before dispatch, so a notification failure can never re-fire the same
/// crossing on the next evaluation. Individual `check_and_trigger` errors
/// are isolated; only the active-alert fetch fails the pass.
pub(crate) async fn evaluate_market(
    ctx: &MonitorCtx,
    market_id: &MarketId,
    question: &str,
    price: f64,
) -> anyhow::Result<()> {
    Span::current().record("market_id", market_id.as_str());

    let alerts = ctx.repo.active_alerts(market_id).await?;

    for alert in alerts {
        {
            let mut cooldowns = ctx.cooldowns.lock().await;
            if cooldowns.is_in_cooldown(alert.id, Instant::now()) {
                debug!(alert_id = %alert.id, "in cooldown, skipping");
                continue;
            }
        }

        match ctx.repo.check_and_trigger(alert.id, price).await {
            Ok(Some(trigger)) => {
                {
                    let mut cooldowns = ctx.cooldowns.lock().await;
                    cooldowns.record_trigger(alert.id, Instant::now());
                }
                ctx.dispatcher.dispatch(&trigger, question).await;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(
                    alert_id = %alert.id,
                    market_id = %market_id,
                    error = format!("{e:#}"),
                    "alert evaluation failed"
                );
            }
        }
    }

    Ok(())
}
