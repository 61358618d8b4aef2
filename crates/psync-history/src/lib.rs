//! # psync-history
//!
//! Cycle history over stored snapshots: per-cycle final state, upload
//! timelines, roll-up statistics with a trend, and cycle-to-cycle comparison.

pub mod aggregator;
pub mod stats;

mod error;

pub use aggregator::CycleAggregator;
pub use error::HistoryError;
pub use stats::{TREND_THRESHOLD, improvement_summary, trend};
