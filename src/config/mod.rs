//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file (loader.rs, --config / SUPERVISOR_CONFIG)
//!     → MODE from the environment (mode.rs)
//!     → validation.rs (semantic checks)
//!     → SupervisorConfig (validated, immutable)
//!     → moved into the Supervisor
//! ```
//!
//! # Design Decisions
//! - Resolved once at startup; nothing re-reads the environment later
//! - All fields have defaults that reproduce the stock image layout
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod mode;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_with_env, ConfigError, LoadedConfig};
pub use mode::Mode;
pub use schema::{
    BackendConfig, FrontendConfig, LivenessConfig, LogFormat, ObservabilityConfig,
    ReadinessConfig, RestartPolicy, ShutdownConfig, SupervisionConfig, SupervisorConfig,
    MIN_STARTUP_DELAY_MS,
};
pub use validation::{validate_config, ValidationError};
