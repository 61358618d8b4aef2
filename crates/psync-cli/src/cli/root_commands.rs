use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Upload a performance report: diff, submit deltas, record snapshots.
    Sync(SyncArgs),
    /// Re-submit the failed action logs of a saved batch result.
    Retry(RetryArgs),
    /// Show a player's three goals from the platform status.
    Goals(GoalsArgs),
    /// Completed cycles of a player, newest first.
    History(PlayerArgs),
    /// Final state and upload timeline of one cycle.
    Cycle(CycleArgs),
    /// Averages, best/worst cycle and trend over completed cycles.
    Stats(PlayerArgs),
    /// Goal deltas between two cycles.
    Compare(CompareArgs),
    /// Team variant mapping table and challenge identifier collisions.
    Variants,
    /// Print the JSON Schema of an input file format.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct SyncArgs {
    /// Report file (JSON array or JSON Lines of report records)
    #[arg(long)]
    pub report: PathBuf,

    /// Cycle the report belongs to
    #[arg(long)]
    pub cycle: u32,

    /// Treat the report as the first upload of a new cycle (no baseline)
    #[arg(long)]
    pub new_cycle: bool,

    /// Compare and generate action logs without submitting or writing snapshots
    #[arg(long)]
    pub dry_run: bool,

    /// Save the batch result here so failures can be retried later
    #[arg(long)]
    pub result_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct RetryArgs {
    /// Batch result saved by `psync sync --result-out`
    #[arg(long)]
    pub result: PathBuf,

    /// Cycle of the upload being retried
    #[arg(long)]
    pub cycle: u32,

    /// Save the retry result here
    #[arg(long)]
    pub result_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct GoalsArgs {
    pub player: String,

    /// Team variant (carteira_i, carteira_ii, carteira_iii, carteira_iv, er, cs)
    #[arg(long)]
    pub team: String,

    /// Report file holding the player's latest record, used as a fallback source
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct PlayerArgs {
    pub player: String,
}

#[derive(Clone, Debug, Args)]
pub struct CycleArgs {
    pub player: String,
    pub cycle: u32,
}

#[derive(Clone, Debug, Args)]
pub struct CompareArgs {
    pub player: String,
    pub cycle_a: u32,
    pub cycle_b: u32,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// report or batch-result
    #[arg(default_value = "report")]
    pub type_name: String,
}
