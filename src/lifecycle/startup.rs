//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the user directory and route table
//! - Wrap them in a configured adapter
//!
//! # Design Decisions
//! - Fail fast: a bad route table is fatal at startup, never at request time
//! - The directory is injected so tests and future stores can swap it

use std::sync::Arc;

use crate::adapter::GatewayAdapter;
use crate::config::AdapterConfig;
use crate::error::RouteError;
use crate::service::{self, StaticUserDirectory, UserDirectory};

/// Build the adapter over the placeholder directory.
pub fn build_adapter(config: &AdapterConfig) -> Result<GatewayAdapter, RouteError> {
    build_adapter_with(config, Arc::new(StaticUserDirectory::default()))
}

/// Build the adapter over a caller-supplied directory.
pub fn build_adapter_with(
    config: &AdapterConfig,
    directory: Arc<dyn UserDirectory>,
) -> Result<GatewayAdapter, RouteError> {
    let routes = service::routes(directory)?;
    tracing::info!(routes = routes.len(), "Route table compiled");

    Ok(GatewayAdapter::new(routes).with_default_headers(config.response.default_headers.clone()))
}
