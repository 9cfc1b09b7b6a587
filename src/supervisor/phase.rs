//! Launch sequence state.
//!
//! ```text
//! NotStarted → BackendLaunched → FrontendRunning → Exited
//! ```
//!
//! `Exited` is reachable from every other phase (spawn failure, readiness
//! failure, stop signal).

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    BackendLaunched,
    FrontendRunning,
    Exited,
}

impl Phase {
    pub fn can_advance_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::NotStarted, Phase::BackendLaunched)
                | (Phase::BackendLaunched, Phase::FrontendRunning)
                | (
                    Phase::NotStarted | Phase::BackendLaunched | Phase::FrontendRunning,
                    Phase::Exited
                )
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::NotStarted => "not-started",
            Phase::BackendLaunched => "backend-launched",
            Phase::FrontendRunning => "frontend-running",
            Phase::Exited => "exited",
        };
        f.write_str(name)
    }
}

/// Current phase with logged, checked transitions.
#[derive(Debug)]
pub struct PhaseTracker {
    current: Phase,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self { current: Phase::NotStarted }
    }

    pub fn current(&self) -> Phase {
        self.current
    }

    pub fn advance(&mut self, next: Phase) {
        debug_assert!(
            self.current.can_advance_to(next),
            "invalid phase transition {} -> {}",
            self.current,
            next
        );
        tracing::debug!(from = %self.current, to = %next, "Supervisor phase change");
        self.current = next;
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}
