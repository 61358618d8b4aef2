//! Store error types.

use thiserror::Error;

use crate::http::Rejection;

/// Errors from the snapshot collection service.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP transport error (timeout, unreachable).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the service.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The service returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// A response or stored document had an unexpected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// The store is not reachable.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<Rejection> for StoreError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::RateLimited { retry_after_secs } => Self::RateLimited { retry_after_secs },
            Rejection::Status { status, message } => Self::Api { status, message },
        }
    }
}
