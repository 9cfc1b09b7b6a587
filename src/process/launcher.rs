//! Process launching seam.
//!
//! The supervisor never calls `Command::spawn` directly; it goes through a
//! [`Launcher`] so tests can observe (or fail) launches without a real
//! uvicorn/reflex install.

use std::io;
use tokio::process::Child;

use crate::process::command::LaunchSpec;

/// Starts child processes from launch specs.
pub trait Launcher: Send + Sync {
    fn spawn(&self, spec: &LaunchSpec) -> io::Result<Child>;
}

/// Launcher backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn spawn(&self, spec: &LaunchSpec) -> io::Result<Child> {
        let child = spec.to_command().spawn()?;
        tracing::debug!(
            child = %spec.role,
            pid = ?child.id(),
            command = %spec.command_line(),
            "Process spawned"
        );
        Ok(child)
    }
}

impl<L: Launcher + ?Sized> Launcher for std::sync::Arc<L> {
    fn spawn(&self, spec: &LaunchSpec) -> io::Result<Child> {
        (**self).spawn(spec)
    }
}
