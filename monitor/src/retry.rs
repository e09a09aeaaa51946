//! Bounded retry of failed full passes.
//
//  Pure state machine, no timers of its own: the engine owns the single
//  `sleep_until` that a returned deadline arms.

use std::time::Duration;

use tokio::time::Instant;

/// Where the controller is in the current failure cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPhase {
    /// No failures observed.
    Idle,
    /// 1..max consecutive failures; a retry-only pass is armed.
    Retrying(u32),
    /// Attempt budget spent. Only the next regular tick re-enters
    /// evaluation; it also resets the cycle.
    Exhausted,
}

#[derive(Debug)]
pub struct RetryController {
    max_retries: u32,
    delay: Duration,
    phase: RetryPhase,
}

impl RetryController {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self {
            max_retries,
            delay,
            phase: RetryPhase::Idle,
        }
    }

    pub fn phase(&self) -> RetryPhase {
        self.phase
    }

    /// A successful pass ends the failure cycle from any phase.
    pub fn on_success(&mut self) {
        self.phase = RetryPhase::Idle;
    }

    /// A regular tick resets an exhausted cycle so a sustained outage gets
    /// a fresh (still bounded) set of retries per interval, never a storm.
    pub fn on_tick(&mut self) {
        if self.phase == RetryPhase::Exhausted {
            self.phase = RetryPhase::Idle;
        }
    }

    /// Record one failed pass. Returns the deadline for a retry-only pass
    /// while the budget lasts, `None` once the cycle is exhausted.
    pub fn on_failure(&mut self, now: Instant) -> Option<Instant> {
        let failures = match self.phase {
            RetryPhase::Idle => 1,
            RetryPhase::Retrying(n) => n + 1,
            RetryPhase::Exhausted => return None,
        };

        if failures < self.max_retries {
            self.phase = RetryPhase::Retrying(failures);
            Some(now + self.delay)
        } else {
            self.phase = RetryPhase::Exhausted;
            None
        }
    }
}
