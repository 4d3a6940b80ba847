//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound connection
//!     → server.rs   (axum catch-all, middleware, session cookie)
//!     → request.rs  (normalize into CanonicalRequest)
//!     → dispatch    (asset or executor)
//!     → response.rs (CanonicalResponse written back)
//!     → error.rs    (failures mapped to generic 400/500 bodies)
//! ```

pub mod error;
pub mod multipart;
pub mod request;
pub mod response;
pub mod server;

pub use request::CanonicalRequest;
pub use response::CanonicalResponse;
pub use server::FrontServer;
