//! Platform submission contract.

use std::fmt;
use std::future::Future;

use psync_core::entities::ActionLogEntry;

use crate::PlatformError;

/// Bearer credential sent with every platform request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials").field("token", &"<redacted>").finish()
    }
}

/// The two action-log endpoints of the gamification platform.
///
/// [`crate::PlatformClient`] talks HTTP; tests script their own.
pub trait PlatformTransport: Send + Sync {
    /// Submit all entries in one request. Returns how many the platform
    /// registered, counted from the start of `entries`.
    fn submit_bulk(
        &self,
        entries: &[ActionLogEntry],
        credentials: &Credentials,
    ) -> impl Future<Output = Result<usize, PlatformError>> + Send;

    /// Submit a single entry.
    fn submit_one(
        &self,
        entry: &ActionLogEntry,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<(), PlatformError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_token() {
        let credentials = Credentials::bearer("s3cret");
        assert_eq!(credentials.token(), "s3cret");
        assert!(!format!("{credentials:?}").contains("s3cret"));
    }
}
