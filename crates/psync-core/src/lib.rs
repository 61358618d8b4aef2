//! # psync-core
//!
//! Core types and error types for pointsync.
//!
//! This crate provides the value objects handed between pipeline stages:
//! - Report records and platform status (inputs)
//! - Resolved goal metrics (extractor output)
//! - Stored snapshots, metric differences, and action logs (sync pipeline)
//! - Cycle aggregates (history views)
//! - Metric, slot, band, trend, and team-variant enums
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;

pub use errors::CoreError;
