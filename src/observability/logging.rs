//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Choose pretty or JSON output from config
//! - Honor `RUST_LOG` over the configured level
//!
//! # Design Decisions
//! - JSON for Lambda (CloudWatch ingestion), pretty for local development;
//!   the loader forces JSON when `AWS_LAMBDA_FUNCTION_NAME` is set
//! - Initialization failure is reported, not fatal

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Install the global subscriber.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "gateway_adapter={level},tower_http={level},lambda_runtime=info",
            level = config.log_level
        ))
    });

    let json = config.log_format == LogFormat::Json;
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_ansi(false)
        }))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .try_init()
}
