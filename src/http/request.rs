//! Request normalization.
//!
//! # Responsibilities
//! - Map a transport-level request into one canonical value
//! - Merge query parameters and body fields into a single data map
//! - Separate uploaded files from scalar fields
//! - Derive the logical path from the catch-all wildcard
//!
//! # Design Decisions
//! - Merge precedence: query parameters first, then body fields overlay
//!   them — on a key collision the body value wins (codified by tests)
//! - Uploaded files are keyed by field name and wrapped in a typed
//!   value carrying filename, content type and bytes
//! - One canonical value per inbound call; nothing cached across requests

use std::collections::HashMap;

use axum::body::{to_bytes, Body};
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::FromRequest;
use axum::http::{header, HeaderMap, Method, Request, Uri, Version};
use serde_json::{Map, Value};
use thiserror::Error;
use url::form_urlencoded;

use crate::http::multipart::{collect_parts, Part, UploadedFile};
use crate::session::Session;

/// Name of the catch-all route parameter.
pub const WILDCARD_PARAM: &str = "path";

/// The transport-level request head, kept as the raw back-reference for
/// collaborators that need more than the canonical fields.
#[derive(Debug, Clone)]
pub struct RequestHead {
    pub method: Method,
    pub uri: Uri,
    pub version: Version,
    pub headers: HeaderMap,
}

/// Normalized, transport-agnostic request handed to the executor.
#[derive(Debug, Clone)]
pub struct CanonicalRequest {
    pub method: Method,
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
    /// Logical path, always beginning with `/`.
    pub path: String,
    pub headers: HeaderMap,
    /// Route parameters, wildcard removed.
    pub params: HashMap<String, String>,
    /// Query parameters overlaid with body and multipart fields.
    pub data: Map<String, Value>,
    /// Uploaded files keyed by field name.
    pub files: HashMap<String, UploadedFile>,
    /// Opaque session handle.
    pub session: Session,
    /// Raw transport-level head.
    pub head: RequestHead,
}

/// Failure to make sense of an inbound request. Maps to HTTP 400.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("failed to read request body: {0}")]
    Body(#[source] axum::Error),

    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed multipart request: {0}")]
    MultipartRejection(#[from] MultipartRejection),

    #[error("invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),
}

/// Build the canonical request for one inbound call.
pub async fn normalize(
    request: Request<Body>,
    mut params: HashMap<String, String>,
    session: Session,
    max_body_bytes: usize,
) -> Result<CanonicalRequest, NormalizeError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let (parts, body) = request.into_parts();
    let head = RequestHead {
        method: parts.method.clone(),
        uri: parts.uri.clone(),
        version: parts.version,
        headers: parts.headers.clone(),
    };

    let tail = params.remove(WILDCARD_PARAM).unwrap_or_default();
    let path = format!("/{tail}");

    let scheme = head
        .headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("http")
        .to_string();
    let (host, port) = host_and_port(&head.headers);

    // Query first; body fields overlay it below.
    let mut data = Map::new();
    if let Some(query) = head.uri.query() {
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            data.insert(key.into_owned(), Value::String(value.into_owned()));
        }
    }

    let mut files = HashMap::new();
    if content_type.starts_with("multipart/form-data") {
        let request = Request::from_parts(parts, body);
        let multipart = Multipart::from_request(request, &()).await?;
        for part in collect_parts(multipart).await? {
            match part {
                Part::Field { name, value } => {
                    data.insert(name, Value::String(value));
                }
                Part::File { name, file } => {
                    files.insert(name, file);
                }
            }
        }
    } else {
        let bytes = to_bytes(body, max_body_bytes)
            .await
            .map_err(NormalizeError::Body)?;
        if !bytes.is_empty() {
            if content_type.starts_with("application/json") {
                if let Value::Object(fields) = serde_json::from_slice::<Value>(&bytes)? {
                    for (key, value) in fields {
                        data.insert(key, value);
                    }
                }
            } else if content_type.starts_with("application/x-www-form-urlencoded") {
                for (key, value) in form_urlencoded::parse(&bytes) {
                    data.insert(key.into_owned(), Value::String(value.into_owned()));
                }
            }
        }
    }

    Ok(CanonicalRequest {
        method: head.method.clone(),
        scheme,
        host,
        port,
        path,
        headers: head.headers.clone(),
        params,
        data,
        files,
        session,
        head,
    })
}

fn host_and_port(headers: &HeaderMap) -> (String, Option<u16>) {
    let raw = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if let Some((host, port)) = raw.rsplit_once(':') {
        if let Ok(port) = port.parse::<u16>() {
            return (host.to_string(), Some(port));
        }
    }
    (raw.to_string(), None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStore;
    use std::sync::Arc;

    fn session() -> Session {
        Session::new("test".to_string(), true, Arc::new(MemoryStore::new()))
    }

    fn wildcard(tail: &str) -> HashMap<String, String> {
        HashMap::from([(WILDCARD_PARAM.to_string(), tail.to_string())])
    }

    #[tokio::test]
    async fn derives_path_and_strips_wildcard() {
        let request = Request::builder()
            .uri("/users/42")
            .body(Body::empty())
            .unwrap();
        let canonical = normalize(request, wildcard("users/42"), session(), 1024)
            .await
            .unwrap();
        assert_eq!(canonical.path, "/users/42");
        assert!(canonical.params.is_empty());
    }

    #[tokio::test]
    async fn body_fields_override_query_parameters() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/submit?a=1&b=2")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"a": "9", "c": "3"}"#))
            .unwrap();
        let canonical = normalize(request, wildcard("submit"), session(), 1024)
            .await
            .unwrap();
        assert_eq!(canonical.data["a"], Value::String("9".to_string()));
        assert_eq!(canonical.data["b"], Value::String("2".to_string()));
        assert_eq!(canonical.data["c"], Value::String("3".to_string()));
    }

    #[tokio::test]
    async fn urlencoded_form_overrides_query() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/submit?a=1")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("a=2&b=3"))
            .unwrap();
        let canonical = normalize(request, wildcard("submit"), session(), 1024)
            .await
            .unwrap();
        assert_eq!(canonical.data["a"], Value::String("2".to_string()));
        assert_eq!(canonical.data["b"], Value::String("3".to_string()));
    }

    #[tokio::test]
    async fn query_alone_populates_data() {
        let request = Request::builder()
            .uri("/list?page=2&sort=name")
            .body(Body::empty())
            .unwrap();
        let canonical = normalize(request, wildcard("list"), session(), 1024)
            .await
            .unwrap();
        assert_eq!(canonical.data["page"], Value::String("2".to_string()));
        assert_eq!(canonical.data["sort"], Value::String("name".to_string()));
    }

    #[tokio::test]
    async fn multipart_separates_fields_and_files() {
        let boundary = "XBOUNDARY";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"title\"\r\n\r\n\
             Hello\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"upload\"; filename=\"photo.png\"\r\n\
             Content-Type: image/png\r\n\r\n\
             PNGDATA\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::builder()
            .method(Method::POST)
            .uri("/upload?title=FromQuery")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let canonical = normalize(request, wildcard("upload"), session(), 1 << 20)
            .await
            .unwrap();
        // Field part overrides the colliding query parameter.
        assert_eq!(canonical.data["title"], Value::String("Hello".to_string()));
        let file = &canonical.files["upload"];
        assert_eq!(file.filename, "photo.png");
        assert_eq!(file.content_type.as_deref(), Some("image/png"));
        assert_eq!(file.data.as_ref(), b"PNGDATA");
    }

    #[tokio::test]
    async fn invalid_json_is_rejected() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/submit")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let err = normalize(request, wildcard("submit"), session(), 1024)
            .await
            .unwrap_err();
        assert!(matches!(err, NormalizeError::Json(_)));
    }

    #[tokio::test]
    async fn host_header_splits_port() {
        let request = Request::builder()
            .uri("/")
            .header(header::HOST, "localhost:3000")
            .header("x-forwarded-proto", "https")
            .body(Body::empty())
            .unwrap();
        let canonical = normalize(request, HashMap::new(), session(), 1024)
            .await
            .unwrap();
        assert_eq!(canonical.host, "localhost");
        assert_eq!(canonical.port, Some(3000));
        assert_eq!(canonical.scheme, "https");
        assert_eq!(canonical.path, "/");
    }
}
