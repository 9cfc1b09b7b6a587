//! Run mode selection.
//!
//! The mode picks the frontend profile: `dev` enables live reload, `prod`
//! serves the compiled bundle. Anything that is not exactly `dev` resolves
//! to `prod`.

use std::fmt;
use serde::{Deserialize, Serialize};

/// Run profile for the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Live-reload frontend profile.
    Dev,
    /// Production frontend profile.
    #[default]
    Prod,
}

impl Mode {
    /// Environment variable that selects the mode.
    pub const ENV_VAR: &'static str = "MODE";

    /// Resolve a raw `MODE` value.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some("dev") => Mode::Dev,
            _ => Mode::Prod,
        }
    }

    /// Whether a raw value is one of the documented spellings (or absent).
    pub fn is_recognized(value: Option<&str>) -> bool {
        matches!(value, None | Some("") | Some("dev") | Some("prod"))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Dev => "dev",
            Mode::Prod => "prod",
        }
    }

    pub fn live_reload(self) -> bool {
        self == Mode::Dev
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_dev_selects_dev() {
        assert_eq!(Mode::from_env_value(Some("dev")), Mode::Dev);
        assert_eq!(Mode::from_env_value(Some("prod")), Mode::Prod);
        assert_eq!(Mode::from_env_value(Some("")), Mode::Prod);
        assert_eq!(Mode::from_env_value(None), Mode::Prod);
        assert_eq!(Mode::from_env_value(Some("DEV")), Mode::Prod);
        assert_eq!(Mode::from_env_value(Some("staging")), Mode::Prod);
    }

    #[test]
    fn test_recognized_values() {
        assert!(Mode::is_recognized(None));
        assert!(Mode::is_recognized(Some("")));
        assert!(Mode::is_recognized(Some("prod")));
        assert!(!Mode::is_recognized(Some("development")));
    }

    #[test]
    fn test_mode_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: Mode,
        }
        let w: Wrapper = toml::from_str("mode = \"dev\"").unwrap();
        assert_eq!(w.mode, Mode::Dev);
        assert_eq!(Mode::Prod.to_string(), "prod");
    }
}
