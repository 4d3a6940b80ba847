//! Application executor seam.
//!
//! # Responsibilities
//! - Define the callback the application supplies to run its logic
//! - Accept plain async closures without boilerplate
//!
//! # Design Decisions
//! - Object-safe trait so the server can hold `Arc<dyn Executor>`
//! - Failures are opaque here; the server maps them to a generic 500
//!   and logs the concrete error

use std::future::Future;

use futures_util::future::BoxFuture;

use crate::http::request::CanonicalRequest;
use crate::http::response::CanonicalResponse;

/// Error produced by application logic.
pub type ExecuteError = Box<dyn std::error::Error + Send + Sync>;

/// Application logic invoked for every request that is not answered
/// from the asset tree.
pub trait Executor: Send + Sync + 'static {
    fn execute(
        &self,
        request: CanonicalRequest,
    ) -> BoxFuture<'static, Result<CanonicalResponse, ExecuteError>>;
}

impl<F, Fut> Executor for F
where
    F: Fn(CanonicalRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<CanonicalResponse, ExecuteError>> + Send + 'static,
{
    fn execute(
        &self,
        request: CanonicalRequest,
    ) -> BoxFuture<'static, Result<CanonicalResponse, ExecuteError>> {
        Box::pin(self(request))
    }
}
