//! Per-invocation request context.
//!
//! # Responsibilities
//! - Turn an invocation envelope into an HTTP-shaped request
//! - Normalize headers, query string, and body
//! - Carry gateway path parameters and route captures to handlers
//!
//! # Design Decisions
//! - Built fresh for every invocation; nothing is shared across calls
//! - Malformed header entries are skipped, never fatal
//! - Multi-value maps win over single-value maps for the same key

use std::borrow::Cow;
use std::collections::BTreeMap;

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::envelope::InvocationEnvelope;
use crate::error::{AdapterError, HandlerError};
use crate::routing::PathParams;

/// Request as seen by a route handler.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    method: Method,
    path: String,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    query_string: String,
    body: Bytes,
    gateway_params: PathParams,
    route_params: PathParams,
}

impl RequestContext {
    /// Build a context from an envelope.
    ///
    /// Fails with `RouteNotFound` when the method cannot name any route, and
    /// with `HandlerFault` when a base64 body does not decode.
    pub fn from_envelope(envelope: &InvocationEnvelope) -> Result<Self, AdapterError> {
        let path = normalize_path(&envelope.path);

        let method = Method::from_bytes(envelope.http_method.as_bytes()).map_err(|_| {
            AdapterError::RouteNotFound {
                method: envelope.http_method.clone(),
                path: path.clone(),
            }
        })?;

        let query = collect_query(envelope);
        let query_string = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(query.iter())
            .finish();

        let body = match envelope.body.as_deref() {
            None => Bytes::new(),
            Some(raw) if envelope.is_base64_encoded => STANDARD
                .decode(raw)
                .map(Bytes::from)
                .map_err(|e| AdapterError::HandlerFault(format!("invalid base64 body: {}", e)))?,
            Some(raw) => Bytes::copy_from_slice(raw.as_bytes()),
        };

        let request_id = envelope
            .request_id()
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Ok(Self {
            request_id,
            method,
            path,
            headers: collect_headers(envelope),
            query,
            query_string,
            body,
            gateway_params: envelope.path_parameters.clone(),
            route_params: PathParams::new(),
        })
    }

    /// Attach parameters captured by the matched route template.
    pub fn with_route_params(mut self, params: PathParams) -> Self {
        self.route_params = params;
        self
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a header, if present and textual.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Encoded query string without the leading `?`.
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    /// First value of a query parameter.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HandlerError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Path parameter by name: route captures first, then the gateway's.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.route_params
            .get(name)
            .or_else(|| self.gateway_params.get(name))
            .map(String::as_str)
    }

    /// Parameters captured from the matched template.
    pub fn route_params(&self) -> &PathParams {
        &self.route_params
    }

    /// Path parameters exactly as the gateway supplied them.
    pub fn gateway_params(&self) -> &PathParams {
        &self.gateway_params
    }
}

/// An empty path addresses the root.
pub fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

fn collect_headers(envelope: &InvocationEnvelope) -> HeaderMap {
    let mut headers = HeaderMap::new();

    let multi = envelope
        .multi_value_headers
        .iter()
        .flat_map(|(k, vs)| vs.iter().map(move |v| (k, v)));
    let single = envelope
        .headers
        .iter()
        .filter(|(k, _)| !has_key_ignore_case(&envelope.multi_value_headers, k));

    for (name, value) in multi.chain(single) {
        let parsed = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        );
        match parsed {
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => {
                tracing::warn!(header = %name, "Skipping malformed header");
            }
        }
    }
    headers
}

fn collect_query(envelope: &InvocationEnvelope) -> Vec<(String, String)> {
    let multi = &envelope.multi_value_query_string_parameters;
    let mut pairs: Vec<(String, String)> = multi
        .iter()
        .flat_map(|(k, vs)| vs.iter().map(move |v| (k.clone(), v.clone())))
        .collect();
    pairs.extend(
        envelope
            .query_string_parameters
            .iter()
            .filter(|(k, _)| !multi.contains_key(*k))
            .map(|(k, v)| (k.clone(), v.clone())),
    );
    pairs
}

fn has_key_ignore_case<V>(map: &BTreeMap<String, V>, key: &str) -> bool {
    map.keys().any(|k| k.eq_ignore_ascii_case(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::GatewayContext;
    use serde::Deserialize;

    #[test]
    fn test_defaults_for_missing_fields() {
        let envelope = InvocationEnvelope::new("GET", "");
        let ctx = RequestContext::from_envelope(&envelope).unwrap();

        assert_eq!(ctx.method(), Method::GET);
        assert_eq!(ctx.path(), "/");
        assert!(ctx.headers().is_empty());
        assert_eq!(ctx.query_string(), "");
        assert!(ctx.body().is_empty());
        assert!(ctx.gateway_params().is_empty());
        assert!(!ctx.request_id().is_empty());
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let envelope = InvocationEnvelope::new("GET", "/")
            .with_header("Content-Type", "application/json")
            .with_header("Bad Header", "x");
        let ctx = RequestContext::from_envelope(&envelope).unwrap();

        assert_eq!(ctx.header("content-type"), Some("application/json"));
        assert_eq!(ctx.headers().len(), 1); // Malformed name skipped
    }

    #[test]
    fn test_multi_value_maps_take_precedence() {
        let mut envelope = InvocationEnvelope::new("GET", "/")
            .with_header("accept", "text/html")
            .with_query("tag", "a")
            .with_query("page", "2");
        envelope
            .multi_value_headers
            .insert("Accept".into(), vec!["text/html".into(), "application/json".into()]);
        envelope
            .multi_value_query_string_parameters
            .insert("tag".into(), vec!["a".into(), "b c".into()]);

        let ctx = RequestContext::from_envelope(&envelope).unwrap();
        assert_eq!(ctx.headers().get_all("accept").iter().count(), 2);
        assert_eq!(ctx.query_string(), "tag=a&tag=b+c&page=2");
        assert_eq!(ctx.query("tag"), Some("a"));
        assert_eq!(ctx.query("page"), Some("2"));
        assert_eq!(ctx.query("missing"), None);
    }

    #[test]
    fn test_body_decoding() {
        #[derive(Deserialize)]
        struct Payload {
            name: String,
        }

        let envelope = InvocationEnvelope::new("POST", "/users").with_body(r#"{"name":"ada"}"#);
        let ctx = RequestContext::from_envelope(&envelope).unwrap();
        assert_eq!(ctx.json::<Payload>().unwrap().name, "ada");

        let mut encoded = InvocationEnvelope::new("POST", "/users").with_body("aGVsbG8=");
        encoded.is_base64_encoded = true;
        let ctx = RequestContext::from_envelope(&encoded).unwrap();
        assert_eq!(ctx.body_text(), "hello");

        encoded.body = Some("not base64!".into());
        let err = RequestContext::from_envelope(&encoded).unwrap_err();
        assert!(matches!(err, AdapterError::HandlerFault(_)));
    }

    #[test]
    fn test_invalid_method_is_not_found() {
        let envelope = InvocationEnvelope::new("", "/users");
        let err = RequestContext::from_envelope(&envelope).unwrap_err();
        assert!(matches!(err, AdapterError::RouteNotFound { .. }));
    }

    #[test]
    fn test_params_prefer_route_captures() {
        let mut envelope = InvocationEnvelope::new("GET", "/users/42")
            .with_path_parameter("user_id", "gateway")
            .with_path_parameter("extra", "x");
        envelope.request_context = Some(GatewayContext {
            request_id: Some("req-1".into()),
            stage: Some("api".into()),
        });

        let mut captured = PathParams::new();
        captured.insert("user_id".into(), "42".into());
        let ctx = RequestContext::from_envelope(&envelope)
            .unwrap()
            .with_route_params(captured);

        assert_eq!(ctx.param("user_id"), Some("42"));
        assert_eq!(ctx.param("extra"), Some("x"));
        assert_eq!(ctx.param("nope"), None);
        assert_eq!(ctx.request_id(), "req-1");
    }
}
