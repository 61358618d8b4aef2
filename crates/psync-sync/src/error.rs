//! Platform error types.

use psync_store::http::Rejection;
use thiserror::Error;

/// Errors from the gamification platform API.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// HTTP transport error (timeout, unreachable).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the platform.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The platform returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// Failed to parse the platform's response.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<Rejection> for PlatformError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::RateLimited { retry_after_secs } => Self::RateLimited { retry_after_secs },
            Rejection::Status { status, message } => Self::Api { status, message },
        }
    }
}
