//! API error type and the public error body.
//!
//! Validation, not-found and auth failures carry a message that is safe to
//! return. Everything else collapses to a generic 500 body; the full detail
//! is only written to the server log.

use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const INTERNAL_MESSAGE: &str = "Internal server error";
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests, please try again later";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Client-visible error body: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad or missing field (400).
    #[error("{0}")]
    Validation(String),

    /// Unknown identifier (404).
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Admission denied (429).
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Missing or invalid credentials (401).
    #[error("{0}")]
    Unauthorized(&'static str),

    /// Credentials present but not accepted (403).
    #[error("{0}")]
    Forbidden(&'static str),

    /// Route exists, method does not (405).
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Handler did not finish within the request timeout (408).
    #[error("Request timed out")]
    Timeout,

    /// Body over `security.max_body_size` (413).
    #[error("Request body too large")]
    PayloadTooLarge,

    /// Anything else (500).
    #[error("internal error: {0}")]
    Internal(#[source] BoxError),
}

impl ApiError {
    pub fn internal<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Internal(err.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Status code and the body the client is allowed to see.
    ///
    /// Internal errors are logged here with their full source chain.
    pub fn normalize(&self) -> (StatusCode, ErrorBody) {
        let status = self.status();
        let message = match self {
            Self::Internal(source) => {
                tracing::error!(error = %self, detail = ?source, "Request failed");
                INTERNAL_MESSAGE.to_string()
            }
            Self::RateLimited { .. } => RATE_LIMITED_MESSAGE.to_string(),
            Self::Validation(_) => {
                tracing::debug!(error = %self, "Rejected request");
                self.to_string()
            }
            _ => self.to_string(),
        };
        (status, ErrorBody { error: message })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.normalize();
        let mut response = (status, Json(body)).into_response();

        if let Self::RateLimited { retry_after_secs } = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }
        response
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::PayloadTooLarge;
        }
        let message = match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                "Expected request with `Content-Type: application/json`"
            }
            JsonRejection::JsonSyntaxError(_) => "Malformed JSON body",
            JsonRejection::JsonDataError(_) => "Invalid JSON body",
            JsonRejection::BytesRejection(_) => "Failed to read request body",
            _ => "Invalid request body",
        };
        Self::Validation(message.to_string())
    }
}
