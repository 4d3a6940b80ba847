//! Static asset responses.
//!
//! # Responsibilities
//! - Map file extensions to mime types
//! - Read an asset file and build its response
//!
//! # Design Decisions
//! - Extensions without a registered mime type are not an error: the
//!   dispatcher routes them to the executor instead
//! - Whole-file reads; asset trees served here are front-end sized

use std::collections::HashMap;

use axum::body::Bytes;
use axum::http::{header, HeaderValue, StatusCode};

use crate::http::response::CanonicalResponse;

/// Extension → mime type table, extensible at startup.
pub struct MimeRegistry {
    types: HashMap<String, String>,
}

impl Default for MimeRegistry {
    fn default() -> Self {
        let mut registry = Self {
            types: HashMap::new(),
        };
        for (ext, mime) in [
            ("html", "text/html"),
            ("htm", "text/html"),
            ("css", "text/css"),
            ("js", "text/javascript"),
            ("ts", "text/javascript"),
            ("json", "application/json"),
            ("map", "application/json"),
            ("ico", "image/x-icon"),
            ("png", "image/png"),
            ("jpg", "image/jpeg"),
            ("jpeg", "image/jpeg"),
            ("gif", "image/gif"),
            ("svg", "image/svg+xml"),
            ("webp", "image/webp"),
            ("woff", "font/woff"),
            ("woff2", "font/woff2"),
            ("ttf", "font/ttf"),
            ("otf", "font/otf"),
            ("txt", "text/plain"),
            ("xml", "application/xml"),
            ("pdf", "application/pdf"),
            ("mp3", "audio/mpeg"),
            ("mp4", "video/mp4"),
            ("webm", "video/webm"),
            ("wasm", "application/wasm"),
        ] {
            registry.register(ext, mime);
        }
        registry
    }
}

impl MimeRegistry {
    /// Register or override the mime type for an extension.
    pub fn register(&mut self, extension: &str, mime: &str) {
        self.types.insert(extension.to_string(), mime.to_string());
    }

    /// Mime type for an extension, if one is configured.
    pub fn mime_for(&self, extension: &str) -> Option<&str> {
        self.types.get(extension).map(String::as_str)
    }
}

/// Read `full_path` and build a 200 response carrying its bytes.
pub async fn asset_response(full_path: &str, mime: &str) -> std::io::Result<CanonicalResponse> {
    let bytes = tokio::fs::read(full_path).await?;
    let mut response = CanonicalResponse::new(StatusCode::OK, Bytes::from(bytes));
    if let Ok(value) = HeaderValue::from_str(mime) {
        response.headers.insert(header::CONTENT_TYPE, value);
    }
    Ok(response)
}
