//! Command routing logic for CLI

use crate::args::{Cli, Commands, ConfigAction};
use crate::commands;
use anyhow::Result;
use arbiter_core::ArbiterConfig;

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli, config: ArbiterConfig) -> Result<()> {
    let verbose = cli.verbose;
    match cli.command {
        Commands::Decide {
            fixture,
            max_recommendations,
            json,
        } => commands::decide::execute(config, &fixture, max_recommendations, json, verbose).await,
        Commands::Replay {
            input,
            export,
            pattern,
        } => commands::replay::execute(config, &input, export, pattern.as_deref(), verbose).await,
        Commands::Analytics { input, days, steps } => {
            commands::analytics::execute(config, &input, days, steps, verbose).await
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&config, &cli.config_file).await,
            ConfigAction::Validate => commands::config::validate(&cli.config_file).await,
        },
    }
}
