//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     broadcast → supervisor run loop, liveness monitor
//!     supervisor: stop frontend → stop backend → exit with frontend's code
//! ```
//!
//! # Design Decisions
//! - Ordered teardown: the frontend goes first, it depends on the backend
//! - Each child gets a grace period, then SIGKILL

pub mod shutdown;
pub mod signals;

pub use shutdown::{wait_for_shutdown, Shutdown, ShutdownSignal};
