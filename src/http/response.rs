//! Canonical response value.
//!
//! # Responsibilities
//! - Carry status, headers and body from executor or asset responder
//! - Write itself back through the transport exactly once
//!
//! # Design Decisions
//! - Bodies are fully materialized bytes; this layer serves front-end
//!   assets and application payloads, not streams

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Transport-agnostic response produced by the executor or the static
/// file responder.
#[derive(Debug, Clone)]
pub struct CanonicalResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CanonicalResponse {
    pub fn new(status: StatusCode, body: Bytes) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
        }
    }

    /// Plain-text response.
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        let mut response = Self::new(status, Bytes::from(body.into()));
        response.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        response
    }

    /// JSON response; serialization failures collapse to an empty body.
    pub fn json(status: StatusCode, value: &impl Serialize) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_default();
        let mut response = Self::new(status, Bytes::from(body));
        response.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        response
    }

    pub fn with_header(mut self, name: header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

impl IntoResponse for CanonicalResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(axum::body::Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_sets_content_type() {
        let response = CanonicalResponse::json(StatusCode::OK, &json!({"ok": true}));
        assert_eq!(
            response.headers.get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(response.body.as_ref(), br#"{"ok":true}"#);
    }

    #[test]
    fn text_sets_content_type() {
        let response = CanonicalResponse::text(StatusCode::NOT_FOUND, "nope");
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body.as_ref(), b"nope");
    }
}
