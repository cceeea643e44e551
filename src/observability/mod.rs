//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Adapter and local server produce:
//!     → logging.rs (structured log events, one span per invocation)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → CloudWatch Logs (JSON lines from the Lambda runtime)
//!     → Metrics endpoint (Prometheus scrape, local server only)
//! ```
//!
//! # Design Decisions
//! - Request id flows from the gateway event into every log line
//! - Metrics are cheap and safe to record with no recorder installed

pub mod logging;
pub mod metrics;
