//! # psync-sync
//!
//! Turns report uploads into point adjustments on the gamification platform.
//!
//! - [`Comparator`]: diffs each report against the player's latest stored
//!   snapshot for the cycle
//! - [`ActionLogGenerator`]: maps qualifying differences to delta action logs
//! - [`BatchSubmitter`]: bulk submission with individual fallback and retries
//! - [`SyncPipeline`]: runs the stages above and writes snapshots back
//!
//! The platform is reached through [`PlatformTransport`]; [`PlatformClient`]
//! is the HTTP implementation.

pub mod comparator;
pub mod generator;
pub mod pipeline;
pub mod submitter;
pub mod transport;
pub mod validation;

mod client;
mod error;

pub use client::PlatformClient;
pub use comparator::{Comparator, diff_record};
pub use error::PlatformError;
pub use generator::ActionLogGenerator;
pub use pipeline::{RetryOutcome, SUPERSEDED, SyncOutcome, SyncPipeline, SyncPlan};
pub use submitter::{
    BULK_REJECTED, BatchSubmitter, PendingItem, SubmitPhase, SubmitProgress, SubmitterSettings,
    residual,
};
pub use transport::{Credentials, PlatformTransport};
pub use validation::{validate_action_log, validate_batch};
