//! Arbiter CLI application
//!
//! Drives the decision engine and the confidence tracker from recorded
//! fixtures:
//!
//! - `arbiter decide` runs one context through analysis, matching,
//!   recommendation and decision
//! - `arbiter replay` applies recorded outcomes to a pattern set and
//!   summarizes (or exports) the resulting confidence history
//! - `arbiter analytics` replays outcomes, then reports trend, volatility
//!   and a forecast per pattern
//! - `arbiter config` shows or validates the effective configuration

mod args;
mod commands;
mod console;
mod fixture;
mod logging;
mod router;

use clap::Parser;

pub use args::{Cli, Commands, ConfigAction};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // `config validate` reports a broken file itself
    let config = match (&cli.command, commands::config::load(&cli.config_file)) {
        (_, Ok(config)) => config,
        (
            Commands::Config {
                action: ConfigAction::Validate,
            },
            Err(_),
        ) => Default::default(),
        (_, Err(e)) => return Err(e),
    };

    logging::init(&config.logging, cli.verbose);
    router::route(cli, config).await
}
