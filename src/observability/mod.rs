//! Cross-cutting observability.
//!
//! # Design Decisions
//! - Structured logging via the tracing crate; per-request fields
//!   (`method`, `path`, `outcome`) are attached where requests are
//!   handled, not here
//! - No metrics endpoint; logging is the observability surface

pub mod logging;

pub use logging::init_tracing;
