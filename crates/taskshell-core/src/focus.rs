//! Focus restriction policy
//!
//! While focus mode is on, tab and task switching are disabled and attempts
//! only produce a warning.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub trait FocusPolicy: Send + Sync {
    /// Whether interactive switching is currently restricted
    fn enabled(&self) -> bool;

    /// Tell the user the action was blocked
    fn warn(&self);
}

/// Toggleable focus mode
#[derive(Debug, Default)]
pub struct FocusMode {
    enabled: AtomicBool,
    warnings: AtomicUsize,
}

impl FocusMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        tracing::info!(enabled, "Focus mode changed");
    }

    /// Number of blocked actions so far
    pub fn warning_count(&self) -> usize {
        self.warnings.load(Ordering::SeqCst)
    }
}

impl FocusPolicy for FocusMode {
    fn enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn warn(&self) {
        self.warnings.fetch_add(1, Ordering::SeqCst);
        tracing::warn!("Tab switching is disabled in focus mode");
    }
}
