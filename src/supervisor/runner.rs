//! Supervisor run loop.
//!
//! # Responsibilities
//! - Launch the backend, gate on its readiness, launch the frontend
//! - Tie the supervisor's exit to the frontend's exit
//! - Restart (or fail fast on) a backend that dies after startup
//! - Forward stop signals to both children in dependency order

use std::io;
use std::process::ExitStatus;
use std::time::{Duration, Instant};
use tokio::process::Child;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time;
use url::Url;

use crate::config::{RestartPolicy, SupervisorConfig, MIN_STARTUP_DELAY_MS};
use crate::error::{spawn_exit_code, SupervisorError, SupervisorResult};
use crate::health::{probe_client, probe_url, HealthMonitor, ReadinessGate};
use crate::lifecycle::{wait_for_shutdown, ShutdownSignal};
use crate::observability::metrics;
use crate::process::{
    exit_code, terminate, ChildRole, LaunchPlan, LaunchSpec, Launcher, ProcessLauncher,
};
use crate::resilience::{calculate_backoff, RestartBudget};
use crate::supervisor::phase::{Phase, PhaseTracker};

/// What woke the supervision loop.
enum Event {
    FrontendExited(io::Result<ExitStatus>),
    BackendExited(io::Result<ExitStatus>),
    RestartDue,
    Shutdown(ShutdownSignal),
}

/// Dual-process supervisor.
pub struct Supervisor<L: Launcher = ProcessLauncher> {
    config: SupervisorConfig,
    plan: LaunchPlan,
    launcher: L,
}

impl Supervisor<ProcessLauncher> {
    pub fn new(config: SupervisorConfig) -> Self {
        Self::with_launcher(config, ProcessLauncher)
    }
}

impl<L: Launcher> Supervisor<L> {
    pub fn with_launcher(config: SupervisorConfig, launcher: L) -> Self {
        let plan = LaunchPlan::from_config(&config);
        Self { config, plan, launcher }
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    /// Command lines the run will launch.
    pub fn plan(&self) -> &LaunchPlan {
        &self.plan
    }

    /// Run both children to completion.
    ///
    /// Returns the frontend's exit code once it has been launched, the
    /// signal's exit code if stopped before that, or the error that aborted
    /// startup or supervision.
    pub async fn run(
        self,
        mut shutdown: broadcast::Receiver<ShutdownSignal>,
    ) -> SupervisorResult<i32> {
        let mut phase = PhaseTracker::new();
        let mode = self.config.mode;
        tracing::info!(mode = %mode, "Starting SALSA in {} mode", mode);

        let client = probe_client()?;
        let health_url = probe_url(
            &self.config.backend.host,
            self.config.backend.port,
            &self.config.readiness.path,
        )?;

        let backend_config = &self.config.backend;
        tracing::info!(
            host = %backend_config.host,
            port = backend_config.port,
            "Starting backend API on {}:{}",
            backend_config.host,
            backend_config.port
        );
        let mut backend = self
            .spawn(&self.plan.backend)
            .map_err(|source| SupervisorError::BackendSpawn {
                program: self.plan.backend.program.clone(),
                source,
            })?;
        phase.advance(Phase::BackendLaunched);

        let gate = ReadinessGate::new(
            client.clone(),
            health_url.clone(),
            self.config.readiness.clone(),
        );
        let startup = tokio::select! {
            result = self.await_backend(&gate, &mut backend) => Ok(result),
            signal = wait_for_shutdown(&mut shutdown) => Err(signal),
        };
        match startup {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::error!(
                    error = %err,
                    "Backend failed during startup, frontend not started"
                );
                self.stop_child(ChildRole::Backend, &mut backend).await;
                phase.advance(Phase::Exited);
                return Err(err);
            }
            Err(signal) => {
                tracing::info!(signal = ?signal, "Stop requested before frontend start");
                self.stop_child(ChildRole::Backend, &mut backend).await;
                phase.advance(Phase::Exited);
                return Ok(signal.exit_code());
            }
        }

        let frontend_config = &self.config.frontend;
        tracing::info!(
            profile = mode.as_str(),
            live_reload = mode.live_reload(),
            frontend_port = frontend_config.frontend_port,
            backend_port = frontend_config.backend_port,
            "Starting frontend in {} profile on ports {} and {}",
            mode,
            frontend_config.frontend_port,
            frontend_config.backend_port
        );
        let mut frontend = match self.spawn(&self.plan.frontend) {
            Ok(child) => child,
            Err(source) => {
                let err = SupervisorError::FrontendSpawn {
                    program: self.plan.frontend.program.clone(),
                    source,
                };
                tracing::error!(error = %err, "Stopping backend");
                self.stop_child(ChildRole::Backend, &mut backend).await;
                phase.advance(Phase::Exited);
                return Err(err);
            }
        };
        phase.advance(Phase::FrontendRunning);

        let monitor = self.spawn_monitor(client, health_url, shutdown.resubscribe());
        let result = self.supervise(backend, &mut frontend, &mut shutdown).await;
        if let Some(monitor) = monitor {
            monitor.abort();
        }
        phase.advance(Phase::Exited);
        result
    }

    fn spawn(&self, spec: &LaunchSpec) -> io::Result<Child> {
        tracing::debug!(child = %spec.role, command = %spec.command_line(), "Launching");
        let child = self.launcher.spawn(spec)?;
        metrics::record_child_start(spec.role.as_str());
        Ok(child)
    }

    /// Fixed startup delay, then the readiness gate when enabled.
    async fn await_backend(
        &self,
        gate: &ReadinessGate,
        backend: &mut Child,
    ) -> SupervisorResult<()> {
        let readiness = &self.config.readiness;
        let delay_ms = readiness.startup_delay_ms.max(MIN_STARTUP_DELAY_MS);
        tracing::info!(delay_ms, "Waiting for backend to start");
        time::sleep(Duration::from_millis(delay_ms)).await;

        if readiness.enabled {
            gate.wait(backend).await?;
        }
        Ok(())
    }

    fn spawn_monitor(
        &self,
        client: reqwest::Client,
        url: Url,
        shutdown: broadcast::Receiver<ShutdownSignal>,
    ) -> Option<JoinHandle<()>> {
        if !self.config.liveness.enabled {
            return None;
        }
        let (monitor, _state) = HealthMonitor::new(client, url, self.config.liveness.clone());
        Some(tokio::spawn(monitor.run(shutdown)))
    }

    async fn supervise(
        &self,
        backend: Child,
        frontend: &mut Child,
        shutdown: &mut broadcast::Receiver<ShutdownSignal>,
    ) -> SupervisorResult<i32> {
        let supervision = &self.config.supervision;
        let mut budget = RestartBudget::new(
            supervision.max_restarts,
            Duration::from_secs(supervision.reset_after_secs),
        );
        budget.record_start(Instant::now());

        let mut backend = Some(backend);
        let mut restart_at: Option<time::Instant> = None;
        let mut restarts = 0u32;

        loop {
            let event = tokio::select! {
                status = frontend.wait() => Event::FrontendExited(status),
                status = wait_backend(&mut backend) => Event::BackendExited(status),
                _ = sleep_until(restart_at) => Event::RestartDue,
                signal = wait_for_shutdown(shutdown) => Event::Shutdown(signal),
            };

            match event {
                Event::FrontendExited(status) => {
                    if let Some(mut child) = backend.take() {
                        self.stop_child(ChildRole::Backend, &mut child).await;
                    }
                    let status = status.map_err(|source| SupervisorError::Wait {
                        child: "frontend",
                        source,
                    })?;
                    let code = exit_code(status);
                    metrics::record_child_exit(ChildRole::Frontend.as_str(), code);
                    tracing::info!(code, "Frontend exited with code {}", code);
                    return Ok(code);
                }
                Event::BackendExited(status) => {
                    backend = None;
                    let code = match status {
                        Ok(status) => exit_code(status),
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to read backend exit status");
                            1
                        }
                    };
                    metrics::record_child_exit(ChildRole::Backend.as_str(), code);
                    tracing::warn!(code, "Backend exited unexpectedly with code {}", code);

                    match self.next_restart(&mut budget) {
                        Some(delay) => restart_at = Some(time::Instant::now() + delay),
                        None => return Err(self.fail_fast(frontend, code, restarts).await),
                    }
                }
                Event::RestartDue => {
                    restart_at = None;
                    match self.spawn(&self.plan.backend) {
                        Ok(child) => {
                            restarts += 1;
                            budget.record_start(Instant::now());
                            metrics::record_backend_restart();
                            tracing::info!(restarts, pid = ?child.id(), "Backend restarted");
                            backend = Some(child);
                        }
                        Err(e) => {
                            let code = spawn_exit_code(&e);
                            tracing::error!(error = %e, "Failed to restart backend");
                            match self.next_restart(&mut budget) {
                                Some(delay) => restart_at = Some(time::Instant::now() + delay),
                                None => return Err(self.fail_fast(frontend, code, restarts).await),
                            }
                        }
                    }
                }
                Event::Shutdown(signal) => {
                    tracing::info!(signal = ?signal, "Stopping frontend and backend");
                    let code = self
                        .stop_child(ChildRole::Frontend, frontend)
                        .await
                        .unwrap_or_else(|| signal.exit_code());
                    if let Some(mut child) = backend.take() {
                        self.stop_child(ChildRole::Backend, &mut child).await;
                    }
                    return Ok(code);
                }
            }
        }
    }

    /// Delay before the next backend restart, or `None` to give up.
    fn next_restart(&self, budget: &mut RestartBudget) -> Option<Duration> {
        let supervision = &self.config.supervision;
        if supervision.policy == RestartPolicy::FailFast {
            return None;
        }

        match budget.try_acquire(Instant::now()) {
            Some(attempt) => {
                let delay = calculate_backoff(
                    attempt,
                    supervision.base_delay_ms,
                    supervision.max_delay_ms,
                );
                tracing::info!(
                    attempt,
                    max_restarts = supervision.max_restarts,
                    delay_ms = delay.as_millis() as u64,
                    "Restarting backend"
                );
                Some(delay)
            }
            None => {
                tracing::error!(
                    max_restarts = supervision.max_restarts,
                    "Backend restart budget exhausted"
                );
                None
            }
        }
    }

    async fn fail_fast(&self, frontend: &mut Child, code: i32, restarts: u32) -> SupervisorError {
        tracing::error!("Backend is down, stopping frontend");
        self.stop_child(ChildRole::Frontend, frontend).await;
        SupervisorError::BackendCrashed { code, restarts }
    }

    /// Terminate a child and report its exit code.
    async fn stop_child(&self, role: ChildRole, child: &mut Child) -> Option<i32> {
        let grace = Duration::from_secs(self.config.shutdown.grace_secs);
        match terminate(child, grace).await {
            Ok(status) => {
                let code = exit_code(status);
                metrics::record_child_exit(role.as_str(), code);
                tracing::info!(child = %role, code, "Child stopped");
                Some(code)
            }
            Err(e) => {
                tracing::warn!(child = %role, error = %e, "Failed to stop child");
                None
            }
        }
    }
}

async fn wait_backend(backend: &mut Option<Child>) -> io::Result<ExitStatus> {
    match backend {
        Some(child) => child.wait().await,
        None => std::future::pending().await,
    }
}

async fn sleep_until(deadline: Option<time::Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
