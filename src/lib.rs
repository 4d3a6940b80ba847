//! frontgate — HTTP front controller with static-asset gatekeeping.
//!
//! Sits between an axum/tokio transport and an application-supplied
//! executor. Every inbound request is normalized into a [`CanonicalRequest`]
//! and then either answered directly from the asset tree or handed to the
//! executor.
//!
//! # Architecture Overview
//!
//! ```text
//! Client Request
//!     → http/server.rs   (axum catch-all, middleware, sessions)
//!     → http/request.rs  (normalize query/body/multipart into one value)
//!     → dispatch/        (asset or execute?)
//!         ├─ scanner/    (front-end script graph: extract → resolve → register)
//!         │      └─ assets/ (mime lookup, file response)
//!         └─ executor    (application logic)
//!     → http/response.rs (write status/headers/body back)
//! ```
//!
//! Script files are only servable when they are wired into the declared
//! front-end module graph: entry points are configured, and their imports
//! are discovered lazily the first time each script is actually served.

// Core subsystems
pub mod config;
pub mod dispatch;
pub mod http;
pub mod scanner;

// Request collaborators
pub mod assets;
pub mod executor;
pub mod session;

// Cross-cutting concerns
pub mod observability;

pub use config::schema::ServerConfig;
pub use executor::{ExecuteError, Executor};
pub use http::request::CanonicalRequest;
pub use http::response::CanonicalResponse;
pub use http::server::FrontServer;
pub use session::{MemoryStore, Session, SessionStore};
