//! Readiness gate between backend launch and frontend launch.
//!
//! # Responsibilities
//! - Poll the backend's health route until it answers
//! - Give up after a bounded number of attempts or an overall deadline
//! - Notice a backend that dies while we wait

use std::io;
use std::process::ExitStatus;
use std::time::{Duration, Instant};
use tokio::process::Child;
use tokio::time;
use url::Url;

use crate::config::ReadinessConfig;
use crate::error::{SupervisorError, SupervisorResult};
use crate::health::probe::{probe, ProbeOutcome};
use crate::observability::metrics;
use crate::process::exit_code;

pub struct ReadinessGate {
    client: reqwest::Client,
    url: Url,
    config: ReadinessConfig,
}

impl ReadinessGate {
    pub fn new(client: reqwest::Client, url: Url, config: ReadinessConfig) -> Self {
        Self { client, url, config }
    }

    /// Poll until the backend is healthy. Returns the number of probes used.
    pub async fn wait(&self, backend: &mut Child) -> SupervisorResult<u32> {
        let started = Instant::now();
        let deadline = started + Duration::from_secs(self.config.deadline_secs);
        let interval = Duration::from_millis(self.config.interval_ms);
        let probe_timeout = Duration::from_millis(self.config.probe_timeout_ms);
        let mut attempts = 0u32;

        tracing::info!(url = %self.url, "Waiting for backend to become ready");

        loop {
            attempts += 1;

            let outcome = tokio::select! {
                status = backend.wait() => return Err(exited(status)),
                outcome = probe(&self.client, &self.url, probe_timeout) => outcome,
            };

            match outcome {
                ProbeOutcome::Healthy => {
                    tracing::info!(
                        attempts,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Backend is ready"
                    );
                    metrics::record_readiness_attempts(attempts);
                    return Ok(attempts);
                }
                ProbeOutcome::Unhealthy(reason) => {
                    tracing::debug!(attempt = attempts, reason = %reason, "Backend not ready yet");
                }
            }

            if attempts >= self.config.max_attempts || Instant::now() + interval > deadline {
                metrics::record_readiness_attempts(attempts);
                return Err(SupervisorError::BackendNotReady {
                    url: self.url.to_string(),
                    attempts,
                    elapsed_ms: started.elapsed().as_millis() as u64,
                });
            }

            tokio::select! {
                status = backend.wait() => return Err(exited(status)),
                _ = time::sleep(interval) => {}
            }
        }
    }
}

fn exited(status: io::Result<ExitStatus>) -> SupervisorError {
    match status {
        Ok(status) => SupervisorError::BackendExited { code: exit_code(status) },
        Err(source) => SupervisorError::Wait { child: "backend", source },
    }
}
