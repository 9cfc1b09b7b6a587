//! Configuration schema definitions.
//!
//! Every section defaults to the values the SALSA image ships with, so an
//! empty file (or no file at all) yields the stock container behavior.

use std::collections::BTreeMap;
use std::path::PathBuf;
use serde::{Deserialize, Serialize};

use crate::config::mode::Mode;

/// Root configuration for the supervisor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Run mode. `MODE` from the environment always wins over the file.
    pub mode: Mode,

    /// Backend API process.
    pub backend: BackendConfig,

    /// Frontend UI process.
    pub frontend: FrontendConfig,

    /// Startup gate between backend launch and frontend launch.
    pub readiness: ReadinessConfig,

    /// What to do when the backend exits on its own.
    pub supervision: SupervisionConfig,

    /// Periodic backend health observation after startup.
    pub liveness: LivenessConfig,

    /// Child teardown settings.
    pub shutdown: ShutdownConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Backend API process configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Executable to run.
    pub program: String,

    /// Arguments placed before the `--host`/`--port` flags.
    pub args: Vec<String>,

    /// Interface to bind.
    pub host: String,

    /// API port.
    pub port: u16,

    /// Working directory (inherits the supervisor's when unset).
    pub working_dir: Option<PathBuf>,

    /// Extra environment variables.
    pub env: BTreeMap<String, String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            program: "uvicorn".to_string(),
            args: vec!["salsa.backend.main:app".to_string()],
            host: "0.0.0.0".to_string(),
            port: 8001,
            working_dir: None,
            env: BTreeMap::new(),
        }
    }
}

/// Frontend UI process configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Executable to run.
    pub program: String,

    /// Arguments placed before the profile and port flags.
    pub args: Vec<String>,

    /// Port serving the UI.
    pub frontend_port: u16,

    /// Port of the frontend's own state-sync server.
    pub backend_port: u16,

    /// Working directory (inherits the supervisor's when unset).
    pub working_dir: Option<PathBuf>,

    /// Extra environment variables.
    pub env: BTreeMap<String, String>,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            program: "reflex".to_string(),
            args: vec!["run".to_string()],
            frontend_port: 3000,
            backend_port: 8000,
            working_dir: None,
            env: BTreeMap::new(),
        }
    }
}

/// Shortest pause allowed between launching the backend and the frontend.
pub const MIN_STARTUP_DELAY_MS: u64 = 2000;

/// Readiness gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Poll the backend before starting the frontend. When disabled only the
    /// startup delay applies.
    pub enabled: bool,

    /// Fixed pause after the backend is launched, in milliseconds. Never
    /// shorter than [`MIN_STARTUP_DELAY_MS`].
    pub startup_delay_ms: u64,

    /// Path probed on the backend.
    pub path: String,

    /// Pause between probes in milliseconds.
    pub interval_ms: u64,

    /// Per-probe timeout in milliseconds.
    pub probe_timeout_ms: u64,

    /// Maximum number of probes.
    pub max_attempts: u32,

    /// Overall deadline for the gate in seconds, measured from the first probe.
    pub deadline_secs: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            startup_delay_ms: MIN_STARTUP_DELAY_MS,
            path: "/health".to_string(),
            interval_ms: 500,
            probe_timeout_ms: 2000,
            max_attempts: 120,
            deadline_secs: 60,
        }
    }
}

/// Reaction to an unexpected backend exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestartPolicy {
    /// Respawn with backoff until the restart budget runs out.
    Restart,
    /// Stop the frontend and exit.
    FailFast,
}

/// Backend supervision configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SupervisionConfig {
    pub policy: RestartPolicy,

    /// Restarts allowed before giving up.
    pub max_restarts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,

    /// A backend that stays up this long gets its restart budget back.
    pub reset_after_secs: u64,
}

impl Default for SupervisionConfig {
    fn default() -> Self {
        Self {
            policy: RestartPolicy::Restart,
            max_restarts: 5,
            base_delay_ms: 500,
            max_delay_ms: 15_000,
            reset_after_secs: 60,
        }
    }
}

/// Liveness monitor configuration. Mirrors the image's HEALTHCHECK cadence.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LivenessConfig {
    pub enabled: bool,

    /// Probe interval in seconds.
    pub interval_secs: u64,

    /// Probe timeout in seconds.
    pub timeout_secs: u64,

    /// Delay before the first probe in seconds.
    pub grace_secs: u64,

    /// Consecutive failures before marking unhealthy.
    pub unhealthy_threshold: u32,

    /// Consecutive successes before marking healthy.
    pub healthy_threshold: u32,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 30,
            timeout_secs: 5,
            grace_secs: 60,
            unhealthy_threshold: 3,
            healthy_threshold: 1,
        }
    }
}

/// Child teardown configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Time a child gets between SIGTERM and SIGKILL, in seconds.
    pub grace_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self { grace_secs: 10 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
