//! The alert monitor engine.
//!
//! On `start()` it runs one immediate full pass, then re-evaluates every
//! watched market on a fixed interval; providers with push support feed a
//! second path into the same per-market evaluation. Each pass:
//!   1. Pulls market snapshots from the `MarketDataProvider`.
//!   2. Pulls active alerts per market from the `AlertRepository`.
//!   3. Skips alerts in cooldown, asks the repository to check+trigger.
//!   4. Records the cooldown, then fans the trigger out to the sinks.
//!
//! Failures bubble to the retry controller; visibility gating can turn
//! scheduled ticks into pure skips.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use alerts::repository::AlertRepository;
use chrono::Utc;
use common::TraceId;
use common::logger::root_span;
use market::provider::MarketDataProvider;
use market::types::{MarketId, PriceUpdate};
use notify::{LogChannel, NotificationChannel, PermissionGate, PermissionStatus, StaticGate};
use tokio::sync::{Mutex, mpsc};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, warn};

use crate::config::MonitorConfig;
use crate::cooldown::CooldownTracker;
use crate::dispatch::{NotificationCallback, NotificationDispatcher};
use crate::pass::{MonitorCtx, evaluate_market, run_pass};
use crate::retry::RetryController;
use crate::state::{CheckerSnapshot, CheckerState};
use crate::visibility::{VisibilityGate, VisibilityHandle};

/// One monitoring engine instance.
///
/// Owns its cooldown map and state exclusively; two instances never share,
/// so two tabs of the same host may double-notify (accepted limitation).
pub struct AlertMonitor {
    repo: Arc<dyn AlertRepository>,
    provider: Arc<dyn MarketDataProvider>,
    config: MonitorConfig,
    callback: Option<NotificationCallback>,
    channel: Arc<dyn NotificationChannel>,
    permission: Arc<dyn PermissionGate>,

    state: Arc<CheckerState>,
    cooldowns: Arc<Mutex<CooldownTracker>>,
    questions: Arc<Mutex<HashMap<MarketId, String>>>,
    gate: VisibilityGate,

    /// Armed while monitoring; cancelling it stops the timer and push
    /// tasks. An in-flight pass completes, its writes stay valid.
    cancel: Mutex<Option<CancellationToken>>,
    permission_requested: AtomicBool,
}

impl AlertMonitor {
    /// Engine with no sinks beyond the tracing log channel. Attach the
    /// in-app callback and a real platform channel with the `with_*`
    /// methods before calling `start`.
    pub fn new(
        repo: Arc<dyn AlertRepository>,
        provider: Arc<dyn MarketDataProvider>,
        config: MonitorConfig,
    ) -> Self {
        let cooldowns = CooldownTracker::new(config.trigger_cooldown);
        Self {
            repo,
            provider,
            config,
            callback: None,
            channel: Arc::new(LogChannel),
            permission: Arc::new(StaticGate(PermissionStatus::Granted)),
            state: Arc::new(CheckerState::new()),
            cooldowns: Arc::new(Mutex::new(cooldowns)),
            questions: Arc::new(Mutex::new(HashMap::new())),
            gate: VisibilityGate::new(),
            cancel: Mutex::new(None),
            permission_requested: AtomicBool::new(false),
        }
    }

    /// Attach the in-app notification callback, invoked synchronously with
    /// every fired trigger.
    #[must_use]
    pub fn with_callback(mut self, callback: NotificationCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Attach a platform notification channel and its permission gate.
    /// Only consulted when `config.enable_push` is set.
    #[must_use]
    pub fn with_push_channel(
        mut self,
        channel: Arc<dyn NotificationChannel>,
        permission: Arc<dyn PermissionGate>,
    ) -> Self {
        self.channel = channel;
        self.permission = permission;
        self
    }

    /// Setter the host wires to its focus/blur events.
    pub fn visibility_handle(&self) -> VisibilityHandle {
        self.gate.handle()
    }

    /// Read-only view of the engine state.
    pub async fn snapshot(&self) -> CheckerSnapshot {
        self.state.snapshot().await
    }

    pub fn is_monitoring(&self) -> bool {
        self.state.is_monitoring()
    }

    /// Begin monitoring. Idempotent: a second call while running is a
    /// no-op. Never fails; transient trouble surfaces in `state.error`.
    pub async fn start(&self) {
        if self.state.swap_monitoring(true) {
            return;
        }

        self.maybe_request_permission();

        let token = CancellationToken::new();
        *self.cancel.lock().await = Some(token.clone());

        let ctx = self.ctx();

        let (tx, rx) = mpsc::channel::<PriceUpdate>(64);
        match self.provider.subscribe_prices(tx).await {
            Ok(true) => {
                tokio::spawn(push_loop(Arc::clone(&ctx), rx, token.clone()));
            }
            Ok(false) => {}
            Err(e) => {
                warn!(error = format!("{e:#}"), "push subscription failed, polling only");
            }
        }

        tokio::spawn(monitor_loop(ctx, self.gate.clone(), token));
    }

    /// Stop monitoring. Safe to call multiple times and from any state.
    pub async fn stop(&self) {
        if let Some(token) = self.cancel.lock().await.take() {
            token.cancel();
        }
        self.state.swap_monitoring(false);
    }

    /// Run one full pass immediately, bypassing the timer and the
    /// visibility gate (the host's "refresh" action).
    pub async fn check_now(&self) {
        let ctx = self.ctx();
        let trace_id = TraceId::default();
        match run_pass(&ctx)
            .instrument(root_span("manual_check", &trace_id))
            .await
        {
            Ok(()) => self.state.record_success(Utc::now()).await,
            Err(e) => {
                let message = format!("{e:#}");
                warn!(error = %message, "manual check failed");
                self.state.record_failure(message).await;
            }
        }
    }

    /// Push entry point: evaluate exactly one market right now. Shares
    /// the cooldown map with the timer path, so an update adjacent to a
    /// tick cannot double-fire an alert.
    pub async fn on_price_update(&self, market_id: MarketId, price: f64) {
        let ctx = self.ctx();
        handle_price_update(&ctx, PriceUpdate { market_id, price }).await;
    }

    /// Forget all cooldown stamps. Leaves `triggered_count` and the retry
    /// cycle untouched.
    pub async fn clear_cooldowns(&self) {
        self.cooldowns.lock().await.clear();
    }

    /// Cheap view over the shared pieces, handed to the spawned tasks.
    fn ctx(&self) -> Arc<MonitorCtx> {
        Arc::new(MonitorCtx {
            repo: Arc::clone(&self.repo),
            provider: Arc::clone(&self.provider),
            dispatcher: NotificationDispatcher::new(
                self.callback.clone(),
                self.config.enable_push,
                Arc::clone(&self.permission),
                Arc::clone(&self.channel),
                Arc::clone(&self.state),
            ),
            cooldowns: Arc::clone(&self.cooldowns),
            questions: Arc::clone(&self.questions),
            state: Arc::clone(&self.state),
            config: self.config.clone(),
        })
    }

    /// Ask for platform permission once per engine lifetime, off the hot
    /// path. Dispatch never blocks on the outcome.
    fn maybe_request_permission(&self) {
        if !self.config.enable_push {
            return;
        }
        if self.permission_requested.swap(true, Ordering::SeqCst) {
            return;
        }
        if self.permission.status() != PermissionStatus::Default {
            return;
        }

        let gate = Arc::clone(&self.permission);
        tokio::spawn(async move {
            let outcome = gate.request().await;
            debug!(?outcome, "notification permission requested");
        });
    }
}

/// The repeating timer plus the single armed retry deadline, serialized
/// in one task so timer and retry passes never overlap each other.
async fn monitor_loop(ctx: Arc<MonitorCtx>, gate: VisibilityGate, cancel: CancellationToken) {
    let mut retry = RetryController::new(ctx.config.max_retries, ctx.config.retry_delay);
    let mut interval = tokio::time::interval(ctx.config.interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut retry_at: Option<Instant> = None;

    loop {
        let retry_timer = async {
            match retry_at {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if !gate.should_run(ctx.config.enable_background) {
                    debug!("tick skipped: surface hidden");
                    continue;
                }
                retry.on_tick();
                retry_at = run_guarded_pass(&ctx, &mut retry).await;
            }
            () = retry_timer => {
                retry_at = run_guarded_pass(&ctx, &mut retry).await;
            }
        }
    }

    debug!("monitor loop stopped");
}

/// One pass, with its outcome routed into state and the retry controller.
/// Returns the deadline of the next retry-only pass, if one was armed.
async fn run_guarded_pass(ctx: &MonitorCtx, retry: &mut RetryController) -> Option<Instant> {
    let trace_id = TraceId::default();
    match run_pass(ctx)
        .instrument(root_span("full_pass", &trace_id))
        .await
    {
        Ok(()) => {
            ctx.state.record_success(Utc::now()).await;
            retry.on_success();
            None
        }
        Err(e) => {
            let message = format!("{e:#}");
            warn!(error = %message, "full pass failed");
            ctx.state.record_failure(message).await;
            retry.on_failure(Instant::now())
        }
    }
}

/// Drains provider push updates until cancelled or the feed closes.
async fn push_loop(
    ctx: Arc<MonitorCtx>,
    mut rx: mpsc::Receiver<PriceUpdate>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            update = rx.recv() => {
                match update {
                    Some(update) => handle_price_update(&ctx, update).await,
                    None => break,
                }
            }
        }
    }

    debug!("push loop stopped");
}

/// Evaluate one pushed price. Failures are logged only: the push path
/// never touches `state.error` or the retry cycle.
async fn handle_price_update(ctx: &MonitorCtx, update: PriceUpdate) {
    if !ctx.config.watches(&update.market_id) {
        return;
    }

    let question = {
        let questions = ctx.questions.lock().await;
        questions.get(&update.market_id).cloned()
    }
    .unwrap_or_else(|| update.market_id.to_string());

    let trace_id = TraceId::default();
    if let Err(e) = evaluate_market(ctx, &update.market_id, &question, update.price)
        .instrument(root_span("price_update", &trace_id))
        .await
    {
        warn!(
            market_id = %update.market_id,
            error = format!("{e:#}"),
            "push evaluation failed"
        );
    }
}
