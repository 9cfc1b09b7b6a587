//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! supervisor, health, process:
//!     → logging.rs (status lines and structured events on stdout)
//!     → metrics.rs (counters and gauges, optional Prometheus endpoint)
//! ```
//!
//! # Design Decisions
//! - Text logs by default, JSON when a log shipper wants it
//! - Metrics are off by default; the image exposes no metrics port

pub mod logging;
pub mod metrics;
