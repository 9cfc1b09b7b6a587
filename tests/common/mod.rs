//! Shared utilities for supervisor integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::process::Child;

use salsa_supervisor::config::SupervisorConfig;
use salsa_supervisor::process::{ChildRole, LaunchSpec, Launcher, ProcessLauncher};

/// Start a programmable mock HTTP backend on a free loopback port.
///
/// `f` is called once per request and returns `(status, body)`.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 1024];
                        let _ = socket.read(&mut buf).await;

                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Mock backend that always answers like the SALSA `/health` route.
pub async fn start_healthy_backend() -> SocketAddr {
    start_programmable_backend(|| async { (200, r#"{"status":"healthy"}"#.to_string()) }).await
}

/// A port nothing listens on (bound then released).
pub async fn unused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// One recorded launch.
#[derive(Debug, Clone)]
pub struct Launch {
    pub role: ChildRole,
    pub spec: LaunchSpec,
    pub at: Instant,
}

/// Launcher that records every attempt, then delegates to the real one.
#[derive(Default)]
pub struct RecordingLauncher {
    launches: Mutex<Vec<Launch>>,
}

impl RecordingLauncher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn launches(&self) -> Vec<Launch> {
        self.launches.lock().unwrap().clone()
    }

    pub fn count(&self, role: ChildRole) -> usize {
        self.launches().iter().filter(|l| l.role == role).count()
    }
}

impl Launcher for RecordingLauncher {
    fn spawn(&self, spec: &LaunchSpec) -> io::Result<Child> {
        self.launches.lock().unwrap().push(Launch {
            role: spec.role,
            spec: spec.clone(),
            at: Instant::now(),
        });
        ProcessLauncher.spawn(spec)
    }
}

/// Config whose children are `sh -c` scripts, with fast timings apart from
/// the fixed startup delay.
///
/// The supervisor appends its flags after the script; `sh` receives them as
/// positional parameters and ignores them.
pub fn sh_config(backend_script: &str, frontend_script: &str) -> SupervisorConfig {
    let mut config = SupervisorConfig::default();

    config.backend.program = "sh".into();
    config.backend.args = vec!["-c".into(), backend_script.into()];
    config.backend.host = "127.0.0.1".into();

    config.frontend.program = "sh".into();
    config.frontend.args = vec!["-c".into(), frontend_script.into()];

    config.readiness.enabled = false;
    config.readiness.interval_ms = 50;
    config.readiness.probe_timeout_ms = 500;

    config.liveness.enabled = false;
    config.shutdown.grace_secs = 2;

    config.supervision.base_delay_ms = 10;
    config.supervision.max_delay_ms = 50;

    config
}

/// Wait until `role` has been launched at least once.
pub async fn wait_for_launch(launcher: &RecordingLauncher, role: ChildRole) {
    tokio::time::timeout(RUN_TIMEOUT, async {
        while launcher.count(role) == 0 {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await
    .unwrap();
}

/// Upper bound for any single supervisor run in these tests.
pub const RUN_TIMEOUT: Duration = Duration::from_secs(20);
