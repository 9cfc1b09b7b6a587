//! Launch specifications for the two children.
//!
//! # Responsibilities
//! - Describe a child command (program, argv, env, cwd) independent of the OS
//! - Build the backend command from `BackendConfig`
//! - Build the frontend command from `FrontendConfig` and the run mode
//!
//! # Design Decisions
//! - Pure data: building a spec never touches the OS, so the launch plan can
//!   be printed (`--dry-run`) and asserted on in tests
//! - Children inherit stdout/stderr so their output lands in container logs

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

use crate::config::{BackendConfig, FrontendConfig, Mode, SupervisorConfig};

/// Which child a spec describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildRole {
    Backend,
    Frontend,
}

impl ChildRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ChildRole::Backend => "backend",
            ChildRole::Frontend => "frontend",
        }
    }
}

impl fmt::Display for ChildRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to start one child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub role: ChildRole,
    pub program: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub working_dir: Option<PathBuf>,
}

impl LaunchSpec {
    /// Shell-like rendering for logs and `--dry-run`.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Value following `flag` in the argument list, if present.
    pub fn flag_value(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|arg| arg == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }

    /// Build the tokio command for this spec.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .envs(&self.env)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

/// Environment every Python child gets unless the config overrides it.
fn base_env(overrides: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    // Unbuffered output keeps child log lines in order with ours.
    env.insert("PYTHONUNBUFFERED".to_string(), "1".to_string());
    env.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    env
}

/// Backend command: `<program> <args..> --host <host> --port <port>`.
pub fn backend_command(config: &BackendConfig) -> LaunchSpec {
    let mut args = config.args.clone();
    args.extend([
        "--host".to_string(),
        config.host.clone(),
        "--port".to_string(),
        config.port.to_string(),
    ]);

    LaunchSpec {
        role: ChildRole::Backend,
        program: config.program.clone(),
        args,
        env: base_env(&config.env),
        working_dir: config.working_dir.clone(),
    }
}

/// Frontend command:
/// `<program> <args..> --env <dev|prod> --frontend-port <p> --backend-port <p>`.
///
/// `--env dev` is what turns on live reload.
pub fn frontend_command(config: &FrontendConfig, mode: Mode) -> LaunchSpec {
    let mut args = config.args.clone();
    args.extend([
        "--env".to_string(),
        mode.as_str().to_string(),
        "--frontend-port".to_string(),
        config.frontend_port.to_string(),
        "--backend-port".to_string(),
        config.backend_port.to_string(),
    ]);

    LaunchSpec {
        role: ChildRole::Frontend,
        program: config.program.clone(),
        args,
        env: base_env(&config.env),
        working_dir: config.working_dir.clone(),
    }
}

/// Both launch specs, in launch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub backend: LaunchSpec,
    pub frontend: LaunchSpec,
}

impl LaunchPlan {
    pub fn from_config(config: &SupervisorConfig) -> Self {
        Self {
            backend: backend_command(&config.backend),
            frontend: frontend_command(&config.frontend, config.mode),
        }
    }
}
