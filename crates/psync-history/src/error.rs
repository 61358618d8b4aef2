use psync_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("no snapshots for player {player_id} in cycle {cycle_number}")]
    CycleNotFound { player_id: String, cycle_number: u32 },

    #[error(transparent)]
    Store(#[from] StoreError),
}
