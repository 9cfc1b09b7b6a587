//! Backend health state machine.
//!
//! # States
//! - Unknown: no verdict yet (startup, grace period)
//! - Healthy: the backend answers its health route
//! - Unhealthy: consecutive failures crossed the threshold
//!
//! # State Transitions
//! ```text
//! Unknown/Healthy → Unhealthy: consecutive failures >= unhealthy_threshold
//! Unknown/Unhealthy → Healthy: consecutive successes >= healthy_threshold
//! ```
//!
//! # Design Decisions
//! - Hysteresis prevents flapping
//! - Counters reset on the opposite outcome

/// Health verdict for the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Unknown,
    Healthy,
    Unhealthy,
}

/// Consecutive-outcome tracker with thresholds.
#[derive(Debug, Clone)]
pub struct HealthTracker {
    state: HealthState,
    consecutive_failures: u32,
    consecutive_successes: u32,
    healthy_threshold: u32,
    unhealthy_threshold: u32,
}

impl HealthTracker {
    pub fn new(healthy_threshold: u32, unhealthy_threshold: u32) -> Self {
        Self {
            state: HealthState::Unknown,
            consecutive_failures: 0,
            consecutive_successes: 0,
            healthy_threshold: healthy_threshold.max(1),
            unhealthy_threshold: unhealthy_threshold.max(1),
        }
    }

    pub fn state(&self) -> HealthState {
        self.state
    }

    /// Record a probe outcome. Returns the new state on a transition.
    pub fn record(&mut self, healthy: bool) -> Option<HealthState> {
        let next = if healthy {
            self.consecutive_failures = 0;
            self.consecutive_successes = self.consecutive_successes.saturating_add(1);
            (self.state != HealthState::Healthy
                && self.consecutive_successes >= self.healthy_threshold)
                .then_some(HealthState::Healthy)
        } else {
            self.consecutive_successes = 0;
            self.consecutive_failures = self.consecutive_failures.saturating_add(1);
            (self.state != HealthState::Unhealthy
                && self.consecutive_failures >= self.unhealthy_threshold)
                .then_some(HealthState::Unhealthy)
        };

        if let Some(state) = next {
            self.state = state;
        }
        next
    }
}
