//! Backend client error types.

use std::sync::Arc;

use reqwest::StatusCode;

/// Errors from talking to the course-search backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// Endpoint path could not be joined onto the base URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Non-2xx response. `message` is the body's `message` field, if any.
    #[error("HTTP error: {status}")]
    HttpError { status: u16, message: Option<String> },

    /// Response body was not the expected JSON.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// Standard reason phrase for an HTTP error status, e.g. "Not Found".
    pub fn reason_phrase(&self) -> Option<&'static str> {
        match self {
            ApiError::HttpError { status, .. } => StatusCode::from_u16(*status).ok()?.canonical_reason(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ApiError::Timeout } else { ApiError::Network(Arc::new(err)) }
    }
}

impl From<ApiError> for coursefind_core::Error {
    fn from(err: ApiError) -> Self {
        coursefind_core::Error::Transport(err.to_string())
    }
}
