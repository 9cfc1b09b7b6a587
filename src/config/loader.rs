//! Configuration loading from disk and the environment.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::mode::Mode;
use crate::config::schema::SupervisorConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A validated configuration plus the notes produced while resolving it.
///
/// Notes are returned rather than logged because loading happens before the
/// log subscriber exists.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: SupervisorConfig,
    pub warnings: Vec<String>,
}

/// Load configuration using the process environment.
pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration with an explicit environment lookup.
///
/// Order: defaults, then the TOML file (if any), then `MODE`.
pub fn load_config_with_env<F>(path: Option<&Path>, env: F) -> Result<LoadedConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        }
        None => SupervisorConfig::default(),
    };

    let mut warnings = Vec::new();
    // An empty MODE counts as unset.
    if let Some(raw) = env(Mode::ENV_VAR).filter(|v| !v.is_empty()) {
        if !Mode::is_recognized(Some(&raw)) {
            warnings.push(format!("Unrecognized MODE value `{}`, using prod", raw));
        }
        config.mode = Mode::from_env_value(Some(&raw));
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(LoadedConfig { config, warnings })
}
