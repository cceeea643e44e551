//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Build directory + route table → Adapter
//!
//! Shutdown (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger → Stop accepting → Drain connections → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then adapter, then listeners
//! - Under Lambda the runtime owns shutdown; these only matter for `serve`

pub mod signals;
pub mod startup;

pub use signals::Shutdown;
