//! Gateway adapter: runs an in-process HTTP route table behind an
//! API Gateway → Lambda proxy integration.
//!
//! ```text
//!   API Gateway event                                       Response envelope
//!   ─────────────────▶ envelope ─▶ http::request ─▶ routing ─▶ handler ─▶ http::response ─▶
//!                                    (context)      (table)   (Reply)
//! ```
//!
//! The same [`GatewayAdapter`] is driven by the Lambda runtime ([`lambda`])
//! or by a local HTTP listener ([`http::HttpServer`]).

pub mod adapter;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod lambda;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod service;

pub use adapter::GatewayAdapter;
pub use config::AdapterConfig;
pub use envelope::{InvocationEnvelope, ResponseEnvelope};
pub use error::{AdapterError, HandlerError, RouteError};
pub use http::{HandlerResult, Reply, RequestContext};
pub use routing::RouteTable;
