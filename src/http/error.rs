//! Failure-to-response mapping.
//!
//! # Responsibilities
//! - Map normalization failures to 400, everything else to 500
//! - Keep response bodies generic; log the concrete error instead
//!
//! # Design Decisions
//! - The client learns nothing beyond the status class; the real error
//!   goes to the log with structured fields

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::executor::ExecuteError;
use crate::http::request::NormalizeError;
use crate::http::response::CanonicalResponse;
use crate::scanner::ScanError;

/// Everything that can fail while answering one request.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid request: {0}")]
    BadRequest(#[from] NormalizeError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("failed to read asset {path}: {source}")]
    Asset {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("executor failed: {0}")]
    Execute(#[source] ExecuteError),
}

impl HttpError {
    fn status(&self) -> StatusCode {
        match self {
            HttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HttpError::Scan(_) | HttpError::Asset { .. } | HttpError::Execute(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        let status = self.status();
        let body = if status == StatusCode::BAD_REQUEST {
            json!({
                "error": "Bad Request",
                "message": "Invalid request.",
                "statusCode": 400,
            })
        } else {
            json!({
                "error": "Internal Server Error",
                "message": "Something went wrong. We are working on it.",
                "statusCode": 500,
            })
        };
        CanonicalResponse::json(status, &body).into_response()
    }
}
