//! Shutdown coordination for the supervisor.

use tokio::sync::broadcast::{self, error::RecvError};

/// Why the supervisor is being asked to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// SIGTERM (container stop).
    Terminate,
    /// SIGINT (Ctrl+C in an attached terminal).
    Interrupt,
}

impl ShutdownSignal {
    /// Shell-style exit code for a stop that happens before the frontend runs.
    pub fn exit_code(self) -> i32 {
        match self {
            ShutdownSignal::Terminate => 128 + 15,
            ShutdownSignal::Interrupt => 128 + 2,
        }
    }
}

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that all long-running tasks can subscribe to.
pub struct Shutdown {
    tx: broadcast::Sender<ShutdownSignal>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(4);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<ShutdownSignal> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self, signal: ShutdownSignal) {
        let _ = self.tx.send(signal);
    }

    /// Number of tasks still listening.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for the next shutdown signal.
///
/// A closed channel never resolves: losing the coordinator must not look
/// like a stop request.
pub async fn wait_for_shutdown(rx: &mut broadcast::Receiver<ShutdownSignal>) -> ShutdownSignal {
    loop {
        match rx.recv().await {
            Ok(signal) => return signal,
            Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => std::future::pending::<()>().await,
        }
    }
}
