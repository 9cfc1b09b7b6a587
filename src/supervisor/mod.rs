//! Process supervisor.
//!
//! # Data Flow
//! ```text
//! SupervisorConfig (mode resolved once)
//!     → spawn backend                         [backend-launched]
//!     → startup delay → readiness gate
//!     → spawn frontend (foreground)           [frontend-running]
//!     → supervise:
//!         frontend exits   → stop backend → exit with frontend's code
//!         backend exits    → restart with backoff | fail fast
//!         SIGTERM/SIGINT   → stop frontend → stop backend
//!                                             [exited]
//! ```
//!
//! # Design Decisions
//! - The backend always starts strictly before the frontend
//! - No frontend is started unless the backend passed the gate
//! - A spawn failure of either child aborts with a non-zero exit

pub mod phase;
pub mod runner;

pub use phase::Phase;
pub use runner::Supervisor;
