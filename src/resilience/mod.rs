//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Backend exits unexpectedly:
//!     → budget.rs (is another restart allowed?)
//!     → backoff.rs (how long to wait before respawning)
//!     → supervisor respawns, or fails fast when the budget is spent
//! ```
//!
//! # Design Decisions
//! - Jittered backoff so a crash loop does not hammer the host
//! - The budget refills after a stable run, so a backend that crashes once a
//!   day is never given up on

pub mod backoff;
pub mod budget;

pub use backoff::calculate_backoff;
pub use budget::RestartBudget;
