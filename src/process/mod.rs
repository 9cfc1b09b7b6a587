//! Child process subsystem.
//!
//! # Data Flow
//! ```text
//! SupervisorConfig
//!     → command.rs (LaunchPlan: backend spec, frontend spec)
//!     → launcher.rs (Launcher::spawn → tokio Child)
//!     → terminate.rs (SIGTERM → grace → SIGKILL, exit code mapping)
//! ```
//!
//! # Design Decisions
//! - Specs are plain data; only the launcher touches the OS
//! - Children are spawned with kill_on_drop so a dropped handle never leaks
//!   a process
//! - Exit codes follow the shell convention (128 + signal)

pub mod command;
pub mod launcher;
pub mod terminate;

pub use command::{backend_command, frontend_command, ChildRole, LaunchPlan, LaunchSpec};
pub use launcher::{Launcher, ProcessLauncher};
pub use terminate::{exit_code, request_stop, terminate};
