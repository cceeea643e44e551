//! Error types crossing the adapter's internal seams.
//!
//! Only [`AdapterError`] reaches the adapter boundary, and it is always
//! rendered into a response envelope there rather than returned.

use axum::http::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

/// Failure kinds the adapter recovers from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// No route matched the request's method and path.
    #[error(
        "404 Not Found: The requested URL was not found on the server. \
         If you entered the URL manually please check your spelling and try again."
    )]
    RouteNotFound { method: String, path: String },

    /// Anything that went wrong while building the request or running the handler.
    #[error("{0}")]
    HandlerFault(String),
}

impl AdapterError {
    pub fn status(&self) -> StatusCode {
        match self {
            AdapterError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            AdapterError::HandlerFault(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Structured body: `{"error": "<description>"}`.
    pub fn to_body(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

/// Typed failure returned by a route handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<HandlerError> for AdapterError {
    fn from(err: HandlerError) -> Self {
        AdapterError::HandlerFault(err.message)
    }
}

/// Errors raised while assembling a route table at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("invalid path template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("duplicate route {method} {template}")]
    Duplicate { method: String, template: String },
}
