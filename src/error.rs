//! Supervisor error taxonomy.

use std::io;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that end a supervisor run.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The backend command could not be started at all.
    #[error("failed to start backend `{program}`: {source}")]
    BackendSpawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The backend never answered its readiness probe.
    #[error("backend at {url} not ready after {attempts} attempts ({elapsed_ms} ms)")]
    BackendNotReady {
        url: String,
        attempts: u32,
        elapsed_ms: u64,
    },

    /// The backend exited while the supervisor was waiting for it.
    #[error("backend exited with code {code} before becoming ready")]
    BackendExited { code: i32 },

    /// The backend exited after startup and the restart policy gave up.
    #[error("backend exited with code {code} after {restarts} restarts")]
    BackendCrashed { code: i32, restarts: u32 },

    /// The frontend command could not be started at all.
    #[error("failed to start frontend `{program}`: {source}")]
    FrontendSpawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The probe URL built from `backend.host`/`readiness.path` is invalid.
    #[error("invalid backend probe URL: {0}")]
    ProbeUrl(#[from] url::ParseError),

    /// The probe HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Waiting on a child failed at the OS level.
    #[error("failed to wait on {child}: {source}")]
    Wait {
        child: &'static str,
        #[source]
        source: io::Error,
    },
}

/// Result type for supervisor operations.
pub type SupervisorResult<T> = Result<T, SupervisorError>;

impl SupervisorError {
    /// Process exit code reported for this error.
    ///
    /// Spawn failures follow the shell convention (127 not found,
    /// 126 not executable).
    pub fn exit_code(&self) -> i32 {
        match self {
            SupervisorError::Config(_) | SupervisorError::ProbeUrl(_) => 2,
            SupervisorError::BackendSpawn { source, .. }
            | SupervisorError::FrontendSpawn { source, .. } => spawn_exit_code(source),
            SupervisorError::BackendNotReady { .. }
            | SupervisorError::BackendExited { .. }
            | SupervisorError::BackendCrashed { .. }
            | SupervisorError::HttpClient(_)
            | SupervisorError::Wait { .. } => 1,
        }
    }
}

pub(crate) fn spawn_exit_code(err: &io::Error) -> i32 {
    match err.kind() {
        io::ErrorKind::NotFound => 127,
        io::ErrorKind::PermissionDenied => 126,
        _ => 1,
    }
}
