//! OS signal handling.
//!
//! # Responsibilities
//! - Register SIGTERM/SIGINT handlers
//! - Translate them into `ShutdownSignal` broadcasts
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Every signal is forwarded; the supervisor acts on the first one and the
//!   shutdown grace period bounds how long a stop can take

use std::io;
use std::sync::Arc;

use crate::lifecycle::shutdown::{Shutdown, ShutdownSignal};

/// Forward OS stop signals to `shutdown` until the process exits.
#[cfg(unix)]
pub async fn listen(shutdown: Arc<Shutdown>) -> io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    let mut interrupt = signal(SignalKind::interrupt())?;

    loop {
        let received = tokio::select! {
            _ = terminate.recv() => ShutdownSignal::Terminate,
            _ = interrupt.recv() => ShutdownSignal::Interrupt,
        };
        tracing::info!(signal = ?received, "Shutdown signal received");
        shutdown.trigger(received);
    }
}

#[cfg(not(unix))]
pub async fn listen(shutdown: Arc<Shutdown>) -> io::Result<()> {
    loop {
        tokio::signal::ctrl_c().await?;
        tracing::info!("Shutdown signal received");
        shutdown.trigger(ShutdownSignal::Interrupt);
    }
}
