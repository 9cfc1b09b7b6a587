//! SALSA container supervisor.
//!
//! Single entry point for the SALSA image: starts the FastAPI backend,
//! waits for it, then runs the Reflex frontend in the foreground.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────┐
//!   MODE ───────▶ │ config ──▶ supervisor ──▶ process::Launcher      │
//!   --config      │                │                │                │
//!                 │                ▼                ├──▶ backend  :8001
//!                 │             health              │    (uvicorn)   │
//!                 │       readiness / liveness ─────┘                │
//!                 │                                 └──▶ frontend :3000/:8000
//!                 │                                      (reflex, foreground)
//!   SIGTERM ────▶ │ lifecycle ──▶ shutdown broadcast                 │
//!                 │                                                  │
//!                 │ observability: tracing (stdout), Prometheus      │
//!                 └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use clap::Parser;

use salsa_supervisor::config::load_config;
use salsa_supervisor::lifecycle::signals;
use salsa_supervisor::observability::{logging, metrics};
use salsa_supervisor::{Shutdown, Supervisor};

#[derive(Parser)]
#[command(name = "salsa-supervisor", version)]
#[command(about = "Runs the SALSA backend API and frontend UI in one container", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long, env = "SUPERVISOR_CONFIG")]
    config: Option<PathBuf>,

    /// Print the resolved launch plan and exit without starting anything.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match load_config(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("salsa-supervisor: {}", e);
            return ExitCode::from(2);
        }
    };
    let config = loaded.config;

    if let Err(e) = logging::init(&config.observability) {
        eprintln!("salsa-supervisor: failed to initialize logging: {}", e);
    }
    for warning in &loaded.warnings {
        tracing::warn!("{}", warning);
    }

    let supervisor = Supervisor::new(config);
    if cli.dry_run {
        let plan = supervisor.plan();
        println!("mode:     {}", supervisor.config().mode);
        println!("backend:  {}", plan.backend.command_line());
        println!("frontend: {}", plan.frontend.command_line());
        return ExitCode::SUCCESS;
    }

    let observability = &supervisor.config().observability;
    if observability.metrics_enabled {
        match observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Arc::new(Shutdown::new());
    let shutdown_rx = shutdown.subscribe();
    let signal_shutdown = Arc::clone(&shutdown);
    tokio::spawn(async move {
        if let Err(e) = signals::listen(signal_shutdown).await {
            tracing::error!(error = %e, "Failed to install signal handlers");
        }
    });

    let code = match supervisor.run(shutdown_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Supervisor aborted");
            e.exit_code()
        }
    };

    tracing::info!(code, "Supervisor exiting");
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
