//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Request context (method, path)
//!     → router.rs (route lookup)
//!     → matcher.rs (evaluate path template, capture parameters)
//!     → Return: matched Route + params, or no match
//!
//! Route compilation (at startup):
//!     builder.route(method, template, handler)
//!     → Parse templates, reject duplicates
//!     → Order literal templates first
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - The table is an explicit value handed to the adapter, never global
//! - Deterministic: same input always matches same route

pub mod matcher;
pub mod router;

pub use matcher::{PathParams, PathTemplate};
pub use router::{Handler, Route, RouteMatch, RouteTable, RouteTableBuilder};
