use psync_config::PsyncConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    config: &PsyncConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Sync(args) => commands::sync::handle(&args, config, flags).await,
        Commands::Retry(args) => commands::retry::handle(&args, config, flags).await,
        Commands::Goals(args) => commands::goals::handle(&args, config, flags).await,
        Commands::History(args) => commands::history::handle_history(&args, config, flags).await,
        Commands::Cycle(args) => commands::history::handle_cycle(&args, config, flags).await,
        Commands::Stats(args) => commands::history::handle_stats(&args, config, flags).await,
        Commands::Compare(args) => commands::history::handle_compare(&args, config, flags).await,
        Commands::Variants => commands::variants::handle(flags),
        Commands::Schema(args) => commands::schema::handle(&args, flags),
    }
}
