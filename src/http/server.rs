//! Local development server.
//!
//! # Responsibilities
//! - Accept real HTTP requests on any method and path
//! - Translate each request into an invocation envelope, as the gateway would
//! - Run it through the adapter and write the response envelope back
//! - Wire up middleware (request ID, tracing, timeout)
//!
//! # Design Decisions
//! - Same adapter instance the Lambda runtime uses; no separate code path
//! - `resource` and `pathParameters` are resolved from the route table
//! - Repeated headers and query keys populate the multi-value maps
//! - Non-UTF-8 bodies are forwarded base64 encoded

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{request::Parts, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::adapter::GatewayAdapter;
use crate::config::AdapterConfig;
use crate::envelope::{GatewayContext, InvocationEnvelope, ResponseEnvelope};
use crate::http::X_REQUEST_ID;

/// State injected into the catch-all handler.
#[derive(Clone)]
pub struct AppState {
    pub adapter: GatewayAdapter,
    pub max_body_bytes: usize,
    pub stage: Arc<str>,
}

/// HTTP front end for running the adapter locally.
pub struct HttpServer {
    router: Router,
    config: AdapterConfig,
}

impl HttpServer {
    pub fn new(config: AdapterConfig, adapter: GatewayAdapter) -> Self {
        let state = AppState {
            adapter,
            max_body_bytes: config.listener.max_body_bytes,
            stage: Arc::from(config.service.stage.as_str()),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AdapterConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(invoke_handler))
            .route("/", any(invoke_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Local gateway listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("Local gateway stopped");
        Ok(())
    }
}

/// Catch-all handler: HTTP request → envelope → adapter → HTTP response.
async fn invoke_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();

    let bytes = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, limit = state.max_body_bytes, "Rejected request body");
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(json!({ "error": "request body too large" })),
            )
                .into_response();
        }
    };

    let envelope = envelope_from_parts(&parts, &bytes, &state);
    let response = state.adapter.handle(envelope);
    into_http_response(response)
}

/// Build the envelope the gateway would have sent for this request.
pub fn envelope_from_parts(parts: &Parts, body: &[u8], state: &AppState) -> InvocationEnvelope {
    let mut multi_value_headers: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in &parts.headers {
        match value.to_str() {
            Ok(value) => multi_value_headers
                .entry(name.as_str().to_string())
                .or_default()
                .push(value.to_string()),
            Err(_) => tracing::debug!(header = %name, "Dropping non-text header"),
        }
    }

    let mut multi_value_query: BTreeMap<String, Vec<String>> = BTreeMap::new();
    if let Some(query) = parts.uri.query() {
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            multi_value_query
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
    }

    let (body, is_base64_encoded) = match std::str::from_utf8(body) {
        _ if body.is_empty() => (None, false),
        Ok(text) => (Some(text.to_string()), false),
        Err(_) => (Some(STANDARD.encode(body)), true),
    };

    let method = parts.method.as_str();
    let path = parts.uri.path();
    let (resource, path_parameters) = match state.adapter.resolve_resource(method, path) {
        Some((resource, params)) => (Some(resource), params),
        None => (None, BTreeMap::new()),
    };

    let request_id = parts
        .headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    InvocationEnvelope {
        http_method: method.to_string(),
        path: path.to_string(),
        resource,
        headers: last_values(&multi_value_headers),
        multi_value_headers,
        query_string_parameters: last_values(&multi_value_query),
        multi_value_query_string_parameters: multi_value_query,
        path_parameters,
        body,
        is_base64_encoded,
        request_context: Some(GatewayContext {
            request_id,
            stage: Some(state.stage.to_string()),
        }),
    }
}

/// Write a response envelope back out as HTTP.
pub fn into_http_response(envelope: ResponseEnvelope) -> Response {
    let status =
        StatusCode::from_u16(envelope.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut builder = Response::builder().status(status);
    for (name, value) in &envelope.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    let body = if envelope.is_base64_encoded {
        STANDARD.decode(envelope.body.as_bytes()).unwrap_or_default()
    } else {
        envelope.body.into_bytes()
    };

    builder.body(Body::from(body)).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Response envelope is not valid HTTP");
        (StatusCode::INTERNAL_SERVER_ERROR, "invalid response envelope").into_response()
    })
}

/// Single-value view of a multi-value map: the last value wins.
fn last_values(multi: &BTreeMap<String, Vec<String>>) -> BTreeMap<String, String> {
    multi
        .iter()
        .filter_map(|(k, vs)| vs.last().map(|v| (k.clone(), v.clone())))
        .collect()
}
