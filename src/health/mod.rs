//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Startup gate (readiness.rs):
//!     backend launched → startup delay
//!     → probe.rs every interval
//!     → ready | BackendNotReady | BackendExited
//!
//! Liveness (active.rs):
//!     grace period → periodic timer
//!     → probe.rs
//!     → state.rs (hysteresis) → watch channel + metrics
//! ```
//!
//! # Design Decisions
//! - One probe implementation shared by both phases
//! - Wildcard binds are probed over loopback
//! - Liveness is observation only; it never kills the backend

pub mod active;
pub mod probe;
pub mod readiness;
pub mod state;

pub use active::HealthMonitor;
pub use probe::{probe, probe_client, probe_url, ProbeOutcome};
pub use readiness::ReadinessGate;
pub use state::{HealthState, HealthTracker};
