//! Dispatches the parsed command once configuration is merged.

use super::handlers::ServeCommandHandler;
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::error::AppResult;

/// Run the selected command. No subcommand means `serve`.
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings).execute(*dry_run).await
        }
        None => ServeCommandHandler::new(settings).execute(false).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageBackend;
    use clap::Parser;

    #[tokio::test]
    async fn test_dry_run_returns_without_serving() {
        let cli = Cli::try_parse_from(["shareit", "serve", "--dry-run"]).unwrap();
        let mut settings = Settings::default();
        settings.database.backend = StorageBackend::Memory;

        assert!(execute_command(&cli, settings).await.is_ok());
    }
}
