//! Single HTTP health probe against the backend.

use std::time::Duration;
use serde::Deserialize;
use url::Url;

/// Result of one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Healthy,
    Unhealthy(String),
}

impl ProbeOutcome {
    pub fn is_healthy(&self) -> bool {
        matches!(self, ProbeOutcome::Healthy)
    }
}

/// Body the backend's `/health` and `/ready` routes return.
#[derive(Debug, Deserialize)]
struct HealthBody {
    status: Option<String>,
}

/// Build the probe URL for a backend bound to `host:port`.
///
/// Wildcard binds are probed over loopback.
pub fn probe_url(host: &str, port: u16, path: &str) -> Result<Url, url::ParseError> {
    let host = match host {
        "" | "0.0.0.0" => "127.0.0.1",
        "::" | "[::]" => "[::1]",
        other => other,
    };
    Url::parse(&format!("http://{}:{}", host, port))?.join(path)
}

/// HTTP client used for readiness and liveness probes.
pub fn probe_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .no_proxy()
        .pool_max_idle_per_host(0)
        .user_agent(concat!("salsa-supervisor/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Probe `url` once.
///
/// Healthy means a 2xx response whose body, if it is JSON with a `status`
/// field, reports `healthy` or `ready`.
pub async fn probe(client: &reqwest::Client, url: &Url, timeout: Duration) -> ProbeOutcome {
    let response = match client.get(url.clone()).timeout(timeout).send().await {
        Ok(response) => response,
        Err(e) if e.is_timeout() => return ProbeOutcome::Unhealthy("timeout".to_string()),
        Err(e) => return ProbeOutcome::Unhealthy(format!("connection error: {}", e)),
    };

    let status = response.status();
    if !status.is_success() {
        return ProbeOutcome::Unhealthy(format!("status {}", status));
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => return ProbeOutcome::Unhealthy(format!("failed to read body: {}", e)),
    };

    match serde_json::from_str::<HealthBody>(&body) {
        Ok(HealthBody {
            status: Some(reported),
        }) if reported != "healthy" && reported != "ready" => {
            ProbeOutcome::Unhealthy(format!("backend reported `{}`", reported))
        }
        _ => ProbeOutcome::Healthy,
    }
}
