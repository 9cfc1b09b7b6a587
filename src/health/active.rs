//! Active liveness checking.
//!
//! # Responsibilities
//! - Periodically probe the backend once the frontend is up
//! - Track health with hysteresis and publish transitions
//!
//! The monitor only observes. The container's HEALTHCHECK stays the
//! authority on restarting an unhealthy container; process exits are handled
//! by the supervisor's restart policy.

use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::time::{self, MissedTickBehavior};
use url::Url;

use crate::config::LivenessConfig;
use crate::health::probe::{probe, ProbeOutcome};
use crate::health::state::{HealthState, HealthTracker};
use crate::lifecycle::{wait_for_shutdown, ShutdownSignal};
use crate::observability::metrics;

pub struct HealthMonitor {
    client: reqwest::Client,
    url: Url,
    config: LivenessConfig,
    state_tx: watch::Sender<HealthState>,
}

impl HealthMonitor {
    /// Create a monitor and a receiver that follows its verdicts.
    pub fn new(
        client: reqwest::Client,
        url: Url,
        config: LivenessConfig,
    ) -> (Self, watch::Receiver<HealthState>) {
        let (state_tx, state_rx) = watch::channel(HealthState::Unknown);
        (
            Self {
                client,
                url,
                config,
                state_tx,
            },
            state_rx,
        )
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<ShutdownSignal>) {
        if !self.config.enabled {
            tracing::info!("Backend liveness checks disabled");
            return;
        }

        tracing::info!(
            url = %self.url,
            interval_secs = self.config.interval_secs,
            grace_secs = self.config.grace_secs,
            "Liveness monitor starting"
        );

        tokio::select! {
            _ = time::sleep(Duration::from_secs(self.config.grace_secs)) => {}
            _ = wait_for_shutdown(&mut shutdown) => return,
        }

        let mut tracker = HealthTracker::new(
            self.config.healthy_threshold,
            self.config.unhealthy_threshold,
        );
        let timeout = Duration::from_secs(self.config.timeout_secs);
        let mut ticker = time::interval(Duration::from_secs(self.config.interval_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let outcome = probe(&self.client, &self.url, timeout).await;
                    self.observe(&mut tracker, outcome);
                }
                _ = wait_for_shutdown(&mut shutdown) => {
                    tracing::debug!("Liveness monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    fn observe(&self, tracker: &mut HealthTracker, outcome: ProbeOutcome) {
        if let ProbeOutcome::Unhealthy(reason) = &outcome {
            tracing::debug!(url = %self.url, reason = %reason, "Liveness probe failed");
        }

        if let Some(state) = tracker.record(outcome.is_healthy()) {
            match state {
                HealthState::Healthy => tracing::info!("Backend is healthy"),
                HealthState::Unhealthy => tracing::warn!(
                    threshold = self.config.unhealthy_threshold,
                    "Backend is unhealthy"
                ),
                HealthState::Unknown => {}
            }
            self.state_tx.send_replace(state);
        }

        metrics::record_backend_health(tracker.state() == HealthState::Healthy);
    }
}
