use std::sync::Arc;

use psync_config::PsyncConfig;
use psync_sync::{SubmitProgress, SyncPipeline};

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::RetryArgs;
use crate::commands::shared::files::{read_batch_result, write_json};
use crate::output::output;
use crate::progress::SubmitBar;

/// Handle `psync retry`.
pub async fn handle(args: &RetryArgs, config: &PsyncConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let previous = read_batch_result(&args.result)?;
    if previous.failed == 0 {
        tracing::info!("nothing to retry");
        return output(&previous, flags.format);
    }

    let store = Arc::new(bootstrap::snapshot_store(config)?);
    let pipeline = SyncPipeline::from_config(store, bootstrap::platform_client(config)?, config)?;

    let mut bar = SubmitBar::new(previous.failed);
    let outcome = pipeline
        .retry(
            &previous,
            args.cycle,
            &bootstrap::credentials(config),
            &mut |event: SubmitProgress| bar.update(event),
        )
        .await;
    bar.finish(&outcome.batch.summary);

    if let Some(path) = &args.result_out {
        write_json(path, &outcome.batch)?;
    }
    output(&outcome, flags.format)?;

    if outcome.batch.failed > 0 {
        anyhow::bail!(
            "{} of {} action logs still failing",
            outcome.batch.failed,
            outcome.batch.total
        );
    }
    Ok(())
}
