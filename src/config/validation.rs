//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (ports non-zero, intervals > 0)
//! - Detect port collisions between the two children
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: SupervisorConfig → Result<(), Vec<ValidationError>>

use std::fmt;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::config::schema::{SupervisorConfig, MIN_STARTUP_DELAY_MS};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &SupervisorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.backend.program.trim().is_empty() {
        errors.push(ValidationError::new("backend.program", "must not be empty"));
    }
    if config.frontend.program.trim().is_empty() {
        errors.push(ValidationError::new("frontend.program", "must not be empty"));
    }

    let ports = [
        ("backend.port", config.backend.port),
        ("frontend.frontend_port", config.frontend.frontend_port),
        ("frontend.backend_port", config.frontend.backend_port),
    ];
    for (field, port) in ports {
        if port == 0 {
            errors.push(ValidationError::new(field, "port must be non-zero"));
        }
    }
    for (i, (field_a, a)) in ports.iter().enumerate() {
        for (field_b, b) in &ports[i + 1..] {
            if *a != 0 && a == b {
                errors.push(ValidationError::new(
                    *field_b,
                    format!("port {} already used by {}", b, field_a),
                ));
            }
        }
    }

    if Url::parse(&format!("http://{}:{}/", config.backend.host, config.backend.port)).is_err() {
        errors.push(ValidationError::new(
            "backend.host",
            format!("`{}` is not a valid host", config.backend.host),
        ));
    }

    let readiness = &config.readiness;
    if readiness.startup_delay_ms < MIN_STARTUP_DELAY_MS {
        errors.push(ValidationError::new(
            "readiness.startup_delay_ms",
            format!("must be at least {}", MIN_STARTUP_DELAY_MS),
        ));
    }
    if !readiness.path.starts_with('/') {
        errors.push(ValidationError::new("readiness.path", "must start with '/'"));
    }
    if readiness.enabled {
        if readiness.interval_ms == 0 {
            errors.push(ValidationError::new("readiness.interval_ms", "must be greater than 0"));
        }
        if readiness.probe_timeout_ms == 0 {
            errors.push(ValidationError::new(
                "readiness.probe_timeout_ms",
                "must be greater than 0",
            ));
        }
        if readiness.max_attempts == 0 {
            errors.push(ValidationError::new("readiness.max_attempts", "must be greater than 0"));
        }
        if readiness.deadline_secs == 0 {
            errors.push(ValidationError::new("readiness.deadline_secs", "must be greater than 0"));
        }
    }

    let supervision = &config.supervision;
    if supervision.base_delay_ms > supervision.max_delay_ms {
        errors.push(ValidationError::new(
            "supervision.base_delay_ms",
            format!(
                "{} exceeds supervision.max_delay_ms ({})",
                supervision.base_delay_ms, supervision.max_delay_ms
            ),
        ));
    }

    let liveness = &config.liveness;
    if liveness.enabled {
        if liveness.interval_secs == 0 {
            errors.push(ValidationError::new("liveness.interval_secs", "must be greater than 0"));
        }
        if liveness.timeout_secs == 0 {
            errors.push(ValidationError::new("liveness.timeout_secs", "must be greater than 0"));
        }
        if liveness.unhealthy_threshold == 0 {
            errors.push(ValidationError::new(
                "liveness.unhealthy_threshold",
                "must be greater than 0",
            ));
        }
        if liveness.healthy_threshold == 0 {
            errors.push(ValidationError::new(
                "liveness.healthy_threshold",
                "must be greater than 0",
            ));
        }
    }

    let observability = &config.observability;
    if EnvFilter::try_new(&observability.log_level).is_err() {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("`{}` is not a valid filter", observability.log_level),
        ));
    }
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("`{}` is not a socket address", observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
