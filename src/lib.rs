//! SALSA container supervisor library.

pub mod config;
pub mod error;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod process;
pub mod resilience;
pub mod supervisor;

pub use config::{Mode, SupervisorConfig};
pub use error::{SupervisorError, SupervisorResult};
pub use lifecycle::{Shutdown, ShutdownSignal};
pub use supervisor::Supervisor;
