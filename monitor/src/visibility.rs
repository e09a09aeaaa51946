//! Tracks whether the hosting surface (tab/window) is foregrounded.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Gate consulted on every scheduled tick.
///
/// A hidden surface only blocks ticks when background execution is
/// disabled; manual `check_now` calls and the push path bypass it.
#[derive(Debug, Clone)]
pub struct VisibilityGate {
    visible: Arc<AtomicBool>,
}

impl VisibilityGate {
    /// Starts visible. Hosts without visibility signals never flip it,
    /// so the gate is transparent by default.
    pub fn new() -> Self {
        Self {
            visible: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Cloneable setter for the host's focus/blur (or page visibility)
    /// events.
    pub fn handle(&self) -> VisibilityHandle {
        VisibilityHandle {
            visible: Arc::clone(&self.visible),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    /// Whether a scheduled tick may run.
    pub fn should_run(&self, enable_background: bool) -> bool {
        enable_background || self.is_visible()
    }
}

impl Default for VisibilityGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Setter half of the gate, handed out to the host.
#[derive(Debug, Clone)]
pub struct VisibilityHandle {
    visible: Arc<AtomicBool>,
}

impl VisibilityHandle {
    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }
}
