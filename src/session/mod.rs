//! Session subsystem.
//!
//! # Responsibilities
//! - Define the opaque session store seam
//! - Hand each request a session handle derived from its cookie
//! - Provide an in-memory store for defaults and tests
//!
//! # Design Decisions
//! - The core never inspects session contents; it only threads the
//!   handle through to the executor
//! - Set-Cookie is emitted only once a fresh session is actually
//!   written to (no cookies for visitors who never store anything)

pub mod cookie;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use futures_util::future::BoxFuture;
use serde_json::Value;

pub use cookie::CookieCodec;

/// Opaque keyed session store.
///
/// Implementations own persistence entirely; the server only passes
/// ids and opaque JSON values through.
pub trait SessionStore: Send + Sync + 'static {
    /// Load the value stored for a session id.
    fn get(&self, id: &str) -> BoxFuture<'_, Option<Value>>;

    /// Store the value for a session id.
    fn set(&self, id: &str, value: Value) -> BoxFuture<'_, ()>;

    /// Remove a session.
    fn destroy(&self, id: &str) -> BoxFuture<'_, ()>;
}

/// In-memory session store.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, id: &str) -> BoxFuture<'_, Option<Value>> {
        let value = self.entries.get(id).map(|entry| entry.value().clone());
        Box::pin(async move { value })
    }

    fn set(&self, id: &str, value: Value) -> BoxFuture<'_, ()> {
        self.entries.insert(id.to_string(), value);
        Box::pin(async {})
    }

    fn destroy(&self, id: &str) -> BoxFuture<'_, ()> {
        self.entries.remove(id);
        Box::pin(async {})
    }
}

/// Per-request session handle.
///
/// `fresh` means the id was minted for this request rather than read
/// from a verified cookie; the cookie is only set once a fresh session
/// is written to.
#[derive(Clone)]
pub struct Session {
    id: String,
    fresh: bool,
    written: Arc<AtomicBool>,
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub(crate) fn new(id: String, fresh: bool, store: Arc<dyn SessionStore>) -> Self {
        Self {
            id,
            fresh,
            written: Arc::new(AtomicBool::new(false)),
            store,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    pub async fn get(&self) -> Option<Value> {
        self.store.get(&self.id).await
    }

    pub async fn set(&self, value: Value) {
        self.written.store(true, Ordering::Relaxed);
        self.store.set(&self.id, value).await
    }

    pub async fn destroy(&self) {
        self.store.destroy(&self.id).await
    }

    /// Should this response carry a Set-Cookie for the session?
    pub(crate) fn needs_cookie(&self) -> bool {
        self.fresh && self.written.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("fresh", &self.fresh)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = Arc::new(MemoryStore::new());
        let session = Session::new("sid-1".to_string(), true, store.clone());

        assert!(session.get().await.is_none());
        assert!(!session.needs_cookie());

        session.set(json!({"user": 7})).await;
        assert_eq!(session.get().await, Some(json!({"user": 7})));
        assert!(session.needs_cookie());

        session.destroy().await;
        assert!(session.get().await.is_none());
    }

    #[tokio::test]
    async fn verified_session_never_resets_cookie() {
        let store = Arc::new(MemoryStore::new());
        let session = Session::new("sid-2".to_string(), false, store);
        session.set(json!(1)).await;
        assert!(!session.needs_cookie());
    }
}
