//! HTTP shaping subsystem.
//!
//! # Data Flow
//! ```text
//! InvocationEnvelope
//!     → request.rs (RequestContext: method, path, headers, query, body, params)
//!     → [routing + handler]
//!     → response.rs (Reply → ResponseEnvelope, default headers)
//!
//! Local development only:
//!     TCP connection → server.rs (Axum, middleware)
//!     → HTTP request → InvocationEnvelope → adapter → HTTP response
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::RequestContext;
pub use response::{HandlerResult, Reply};
pub use server::HttpServer;

/// Header carrying the per-request correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";
