//! Multipart body model.
//!
//! # Responsibilities
//! - Collect multipart parts into a tagged field/file model
//! - Buffer file payloads fully in memory (bounded by the body limit)
//!
//! # Design Decisions
//! - Exactly two part kinds; a part with a filename is a file, anything
//!   else is a field
//! - Files keep their client-reported filename and content type, but
//!   are keyed by field name downstream

use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartError};

/// One uploaded file, fully buffered.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-reported filename.
    pub filename: String,
    /// Client-reported content type, if any.
    pub content_type: Option<String>,
    /// The file's bytes.
    pub data: Bytes,
}

/// A multipart part, discriminated into exactly two cases.
#[derive(Debug, Clone)]
pub enum Part {
    Field {
        name: String,
        value: String,
    },
    File {
        name: String,
        file: UploadedFile,
    },
}

/// Drain a multipart stream into parts.
pub async fn collect_parts(mut multipart: Multipart) -> Result<Vec<Part>, MultipartError> {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name() {
            Some(filename) => {
                let filename = filename.to_string();
                let content_type = field.content_type().map(|ct| ct.to_string());
                let data = field.bytes().await?;
                parts.push(Part::File {
                    name,
                    file: UploadedFile {
                        filename,
                        content_type,
                        data,
                    },
                });
            }
            None => {
                let value = field.text().await?;
                parts.push(Part::Field { name, value });
            }
        }
    }
    Ok(parts)
}
