//! Value objects passed between pipeline stages.
//!
//! Every struct derives `Serialize` and `Deserialize`; the ones that cross a
//! process boundary (report input, stored snapshots, batch results) also
//! derive `JsonSchema`.

mod action_log;
mod batch;
mod cycle;
mod difference;
mod goal;
mod report;
mod snapshot;
mod status;

pub use action_log::{ActionAttributes, ActionAudit, ActionLog, ActionLogEntry};
pub use batch::{BatchResult, ItemResult};
pub use cycle::{
    CycleComparison, CycleDetails, CycleHistoryData, CycleInfo, CycleSummaryStats,
    ProgressDataPoint,
};
pub use difference::{ComparisonReport, ComparisonResult, MetricDifference};
pub use goal::{GoalMetric, GoalPercentages, PlayerGoals};
pub use report::{ReportRecord, parse_report_day};
pub use snapshot::StoredSnapshot;
pub use status::{ChallengeProgress, PlatformStatus};
