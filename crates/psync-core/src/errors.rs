//! Cross-cutting error types for pointsync.
//!
//! Domain-specific errors (`StoreError`, `PlatformError`, `ConfigError`) live in
//! their respective crates. The binary converges everything on `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any pointsync crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Lookup returned no result.
    #[error("Not found: {kind} {id}")]
    NotFound { kind: String, id: String },

    /// Data failed validation (shape, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A stored or supplied record had an unexpected shape.
    #[error("Data processing error: {0}")]
    DataProcessing(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
