//! Readiness gate and liveness monitor against mock backends.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;

use salsa_supervisor::config::{LivenessConfig, ReadinessConfig};
use salsa_supervisor::health::{
    probe, probe_client, probe_url, HealthMonitor, HealthState, ProbeOutcome, ReadinessGate,
};
use salsa_supervisor::{Shutdown, ShutdownSignal, SupervisorError};

mod common;

fn fast_readiness() -> ReadinessConfig {
    ReadinessConfig {
        interval_ms: 50,
        probe_timeout_ms: 500,
        max_attempts: 10,
        deadline_secs: 10,
        ..ReadinessConfig::default()
    }
}

fn idle_child() -> tokio::process::Child {
    Command::new("sh")
        .args(["-c", "exec sleep 30"])
        .kill_on_drop(true)
        .spawn()
        .unwrap()
}

#[tokio::test]
async fn test_probe_accepts_salsa_health_route() {
    let addr = common::start_healthy_backend().await;
    let url = probe_url("0.0.0.0", addr.port(), "/health").unwrap();
    let client = probe_client().unwrap();

    let outcome = probe(&client, &url, Duration::from_secs(1)).await;
    assert_eq!(outcome, ProbeOutcome::Healthy);
}

#[tokio::test]
async fn test_probe_rejects_degraded_status_body() {
    let addr = common::start_programmable_backend(|| async {
        (200, r#"{"status":"degraded"}"#.to_string())
    })
    .await;
    let url = probe_url("127.0.0.1", addr.port(), "/health").unwrap();
    let client = probe_client().unwrap();

    let outcome = probe(&client, &url, Duration::from_secs(1)).await;
    assert!(!outcome.is_healthy());
}

#[tokio::test]
async fn test_probe_connection_refused_is_unhealthy() {
    let port = common::unused_port().await;
    let url = probe_url("127.0.0.1", port, "/health").unwrap();
    let client = probe_client().unwrap();

    let outcome = probe(&client, &url, Duration::from_secs(1)).await;
    assert!(!outcome.is_healthy());
}

#[tokio::test]
async fn test_gate_counts_attempts_until_ready() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let addr = common::start_programmable_backend(move || {
        let counter = counter.clone();
        async move {
            if counter.fetch_add(1, Ordering::SeqCst) < 3 {
                (500, "booting".to_string())
            } else {
                (200, r#"{"status":"ready"}"#.to_string())
            }
        }
    })
    .await;

    let url = probe_url("127.0.0.1", addr.port(), "/health").unwrap();
    let gate = ReadinessGate::new(probe_client().unwrap(), url, fast_readiness());
    let mut backend = idle_child();

    let attempts = gate.wait(&mut backend).await.unwrap();
    assert_eq!(attempts, 4);
}

#[tokio::test]
async fn test_gate_gives_up_at_deadline() {
    let port = common::unused_port().await;
    let url = probe_url("127.0.0.1", port, "/health").unwrap();
    let config = ReadinessConfig {
        interval_ms: 200,
        max_attempts: 1000,
        deadline_secs: 1,
        ..fast_readiness()
    };
    let gate = ReadinessGate::new(probe_client().unwrap(), url, config);
    let mut backend = idle_child();

    let err = tokio::time::timeout(Duration::from_secs(10), gate.wait(&mut backend))
        .await
        .unwrap()
        .unwrap_err();

    match err {
        SupervisorError::BackendNotReady { attempts, elapsed_ms, .. } => {
            assert!(attempts < 1000);
            assert!(elapsed_ms < 2000, "elapsed {elapsed_ms}ms");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_gate_reports_backend_death() {
    let port = common::unused_port().await;
    let url = probe_url("127.0.0.1", port, "/health").unwrap();
    let gate = ReadinessGate::new(probe_client().unwrap(), url, fast_readiness());
    let mut backend = Command::new("sh").args(["-c", "sleep 0.1; exit 9"]).spawn().unwrap();

    let err = gate.wait(&mut backend).await.unwrap_err();
    assert!(matches!(err, SupervisorError::BackendExited { code: 9 }), "{err}");
}

#[tokio::test]
async fn test_monitor_publishes_transitions() {
    let healthy = Arc::new(AtomicBool::new(true));
    let flag = healthy.clone();
    let addr = common::start_programmable_backend(move || {
        let flag = flag.clone();
        async move {
            if flag.load(Ordering::SeqCst) {
                (200, r#"{"status":"healthy"}"#.to_string())
            } else {
                (503, "unavailable".to_string())
            }
        }
    })
    .await;

    let url = probe_url("127.0.0.1", addr.port(), "/health").unwrap();
    let config = LivenessConfig {
        enabled: true,
        interval_secs: 1,
        timeout_secs: 1,
        grace_secs: 0,
        unhealthy_threshold: 2,
        healthy_threshold: 1,
    };
    let (monitor, mut state) = HealthMonitor::new(probe_client().unwrap(), url, config);
    assert_eq!(*state.borrow(), HealthState::Unknown);

    let shutdown = Shutdown::new();
    let handle = tokio::spawn(monitor.run(shutdown.subscribe()));

    tokio::time::timeout(Duration::from_secs(5), state.wait_for(|s| *s == HealthState::Healthy))
        .await
        .unwrap()
        .unwrap();

    healthy.store(false, Ordering::SeqCst);
    tokio::time::timeout(Duration::from_secs(10), state.wait_for(|s| *s == HealthState::Unhealthy))
        .await
        .unwrap()
        .unwrap();

    shutdown.trigger(ShutdownSignal::Terminate);
    tokio::time::timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_disabled_monitor_returns_immediately() {
    let url = probe_url("127.0.0.1", 1, "/health").unwrap();
    let config = LivenessConfig {
        enabled: false,
        ..LivenessConfig::default()
    };
    let (monitor, state) = HealthMonitor::new(probe_client().unwrap(), url, config);
    let shutdown = Shutdown::new();

    tokio::time::timeout(Duration::from_secs(1), monitor.run(shutdown.subscribe()))
        .await
        .unwrap();
    assert_eq!(*state.borrow(), HealthState::Unknown);
}
