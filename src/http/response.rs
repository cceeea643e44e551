//! Response building and serialization.
//!
//! # Responsibilities
//! - Give handlers a typed reply (JSON payload + status + headers)
//! - Render replies and adapter errors into response envelopes
//! - Merge configured default headers
//!
//! # Design Decisions
//! - Bodies are always JSON text, so `isBase64Encoded` is always false
//! - Status defaults to 200 when the handler does not set one
//! - Handler headers win over configured defaults

use std::collections::BTreeMap;

use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::envelope::ResponseEnvelope;
use crate::error::{AdapterError, HandlerError};

/// What every route handler returns.
pub type HandlerResult = Result<Reply, HandlerError>;

/// A successful handler outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    status: StatusCode,
    body: Value,
    headers: BTreeMap<String, String>,
}

impl Reply {
    /// JSON reply with status 200.
    pub fn json(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
            headers: BTreeMap::new(),
        }
    }

    /// JSON reply from any serializable value.
    pub fn to_json<T: Serialize>(body: &T) -> HandlerResult {
        Ok(Self::json(serde_json::to_value(body)?))
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_envelope(self) -> ResponseEnvelope {
        json_envelope(self.status, &self.body, self.headers)
    }
}

impl From<&AdapterError> for ResponseEnvelope {
    fn from(err: &AdapterError) -> Self {
        json_envelope(err.status(), &err.to_body(), BTreeMap::new())
    }
}

impl ResponseEnvelope {
    /// Add each default header the response does not already carry.
    pub fn merge_default_headers(&mut self, defaults: &BTreeMap<String, String>) {
        for (name, value) in defaults {
            if self.header(name).is_none() {
                self.headers.insert(name.clone(), value.clone());
            }
        }
    }
}

fn json_envelope(
    status: StatusCode,
    body: &Value,
    mut headers: BTreeMap<String, String>,
) -> ResponseEnvelope {
    // Serializing a `Value` is infallible.
    let body = serde_json::to_string(body).unwrap_or_else(|_| "null".to_string());

    if !headers.keys().any(|k| k.eq_ignore_ascii_case("content-type")) {
        headers.insert("Content-Type".to_string(), "application/json".to_string());
    }
    headers.retain(|k, _| !k.eq_ignore_ascii_case("content-length"));
    headers.insert("Content-Length".to_string(), body.len().to_string());

    ResponseEnvelope {
        status_code: status.as_u16(),
        headers,
        body,
        is_base64_encoded: false,
    }
}
