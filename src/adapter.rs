//! The gateway adapter.
//!
//! # Data Flow
//! ```text
//! InvocationEnvelope
//!     → http::request (RequestContext, scoped to this invocation)
//!     → routing (resolve method + path template)
//!     → route handler (Result<Reply, HandlerError>)
//!     → http::response (ResponseEnvelope)
//! ```
//!
//! # Design Decisions
//! - `handle` is total: every envelope yields exactly one response
//! - No route → 404; handler error or panic → 500
//! - Single attempt; the calling gateway owns retries
//! - Cheap to clone; the route table is shared immutably

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use crate::envelope::{InvocationEnvelope, ResponseEnvelope};
use crate::error::AdapterError;
use crate::http::request::{normalize_path, RequestContext};
use crate::http::response::Reply;
use crate::observability::metrics;
use crate::routing::{Route, RouteTable};

/// Label used for metrics when no route matched.
const UNMATCHED_ROUTE: &str = "none";

/// Translates invocation envelopes into handler calls and back.
#[derive(Debug, Clone)]
pub struct GatewayAdapter {
    routes: Arc<RouteTable>,
    default_headers: Arc<BTreeMap<String, String>>,
}

impl GatewayAdapter {
    pub fn new(routes: RouteTable) -> Self {
        Self {
            routes: Arc::new(routes),
            default_headers: Arc::new(BTreeMap::new()),
        }
    }

    /// Headers added to every response unless the handler set them.
    pub fn with_default_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.default_headers = Arc::new(headers);
        self
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Handle one invocation.
    pub fn handle(&self, envelope: InvocationEnvelope) -> ResponseEnvelope {
        let start = Instant::now();
        let span = tracing::info_span!(
            "invocation",
            request_id = envelope.request_id().unwrap_or("-"),
            method = %envelope.http_method,
            path = %envelope.path,
        );
        let _guard = span.enter();

        let (outcome, route) = self.dispatch(&envelope);
        let mut response = match outcome {
            Ok(reply) => reply.into_envelope(),
            Err(err) => {
                match &err {
                    AdapterError::RouteNotFound { method, path } => {
                        tracing::warn!(method = %method, path = %path, "No route matched");
                    }
                    AdapterError::HandlerFault(description) => {
                        tracing::error!(route = %route, error = %description, "Handler fault");
                    }
                }
                ResponseEnvelope::from(&err)
            }
        };
        response.merge_default_headers(&self.default_headers);

        tracing::debug!(status = response.status_code, route = %route, "Invocation complete");
        metrics::record_invocation(&envelope.http_method, &route, response.status_code, start);
        response
    }

    /// Handle a raw JSON event. Events that do not decode as an envelope
    /// are answered with a 500 rather than rejected.
    pub fn handle_value(&self, event: Value) -> ResponseEnvelope {
        match serde_json::from_value::<InvocationEnvelope>(event) {
            Ok(envelope) => self.handle(envelope),
            Err(e) => {
                tracing::error!(error = %e, "Malformed invocation event");
                let err = AdapterError::HandlerFault(format!("invalid invocation event: {}", e));
                let mut response = ResponseEnvelope::from(&err);
                response.merge_default_headers(&self.default_headers);
                metrics::record_invocation("-", UNMATCHED_ROUTE, response.status_code, Instant::now());
                response
            }
        }
    }

    /// Resolve the route template for an envelope's method and path, the
    /// way the gateway fills in `resource` and `pathParameters`.
    pub fn resolve_resource(
        &self,
        method: &str,
        path: &str,
    ) -> Option<(String, BTreeMap<String, String>)> {
        let method = axum::http::Method::from_bytes(method.as_bytes()).ok()?;
        self.routes
            .resolve(&method, &normalize_path(path))
            .map(|m| (m.route.template().to_string(), m.params))
    }

    fn dispatch(&self, envelope: &InvocationEnvelope) -> (Result<Reply, AdapterError>, String) {
        let ctx = match RequestContext::from_envelope(envelope) {
            Ok(ctx) => ctx,
            Err(err) => return (Err(err), UNMATCHED_ROUTE.to_string()),
        };

        let Some(matched) = self.routes.resolve(ctx.method(), ctx.path()) else {
            let err = AdapterError::RouteNotFound {
                method: ctx.method().to_string(),
                path: ctx.path().to_string(),
            };
            return (Err(err), UNMATCHED_ROUTE.to_string());
        };

        let route_name = matched.route.template().to_string();
        let ctx = ctx.with_route_params(matched.params);
        (invoke(matched.route, &ctx), route_name)
    }
}

/// Run a handler, converting both typed errors and panics into faults.
fn invoke(route: &Route, ctx: &RequestContext) -> Result<Reply, AdapterError> {
    match panic::catch_unwind(AssertUnwindSafe(|| route.call(ctx))) {
        Ok(Ok(reply)) => Ok(reply),
        Ok(Err(err)) => Err(err.into()),
        Err(payload) => Err(AdapterError::HandlerFault(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
