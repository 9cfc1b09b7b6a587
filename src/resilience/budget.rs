//! Restart budget.
//!
//! # Responsibilities
//! - Cap the number of backend restarts
//! - Hand the budget back once the backend has been stable for a while
//!
//! # Design Decisions
//! - The clock is passed in so the window logic is testable without sleeping
//! - A restart is charged when it is scheduled, not when it succeeds

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct RestartBudget {
    max_restarts: u32,
    reset_after: Duration,
    used: u32,
    last_start: Option<Instant>,
}

impl RestartBudget {
    pub fn new(max_restarts: u32, reset_after: Duration) -> Self {
        Self {
            max_restarts,
            reset_after,
            used: 0,
            last_start: None,
        }
    }

    /// Record that the backend (re)started at `now`.
    pub fn record_start(&mut self, now: Instant) {
        self.last_start = Some(now);
    }

    /// Charge one restart after an exit observed at `now`.
    ///
    /// Returns the 1-based restart number, or `None` when the budget is spent.
    pub fn try_acquire(&mut self, now: Instant) -> Option<u32> {
        if let Some(started) = self.last_start {
            if now.saturating_duration_since(started) >= self.reset_after {
                if self.used > 0 {
                    tracing::debug!(used = self.used, "Backend was stable, restart budget reset");
                }
                self.used = 0;
            }
        }

        if self.used >= self.max_restarts {
            return None;
        }
        self.used += 1;
        Some(self.used)
    }

    /// Restarts charged in the current window.
    pub fn used(&self) -> u32 {
        self.used
    }
}
