//! CLI argument definitions using clap
//!
//! - arbiter decide --fixture ctx.json               # Run the decision pipeline
//! - arbiter replay --patterns p.json --outcomes o.json
//! - arbiter analytics --patterns p.json --outcomes o.json
//! - arbiter config show|validate

use arbiter_core::tracking::ExportFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default configuration file name used across all CLI commands.
pub const DEFAULT_CONFIG_FILE: &str = "arbiter.toml";

#[derive(Parser, Debug)]
#[command(name = "arbiter")]
#[command(about = "Arbiter - confidence tracking and pattern decision engine")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (JSON, TOML or YAML)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: PathBuf,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the decision pipeline against a recorded context fixture
    Decide {
        /// Fixture holding the context, its analysis and the raw matches
        #[arg(long)]
        fixture: PathBuf,

        /// Matches turned into recommendations (overrides the config)
        #[arg(long)]
        max_recommendations: Option<usize>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replay recorded outcomes through the confidence tracker
    Replay {
        #[command(flatten)]
        input: ReplayInput,

        /// Export one pattern's tracking data instead of the summary
        #[arg(long, requires = "pattern")]
        export: Option<ExportFormat>,

        /// Pattern to export
        #[arg(long)]
        pattern: Option<String>,
    },

    /// Replay outcomes, then report analytics and forecasts per pattern
    Analytics {
        #[command(flatten)]
        input: ReplayInput,

        /// Only consider entries from the last N days
        #[arg(long)]
        days: Option<u32>,

        /// Forecast steps per pattern
        #[arg(long, default_value_t = 5)]
        steps: usize,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Pattern and outcome files for a replay
#[derive(clap::Args, Debug, Clone)]
pub struct ReplayInput {
    /// JSON array of patterns
    #[arg(long)]
    pub patterns: PathBuf,

    /// JSON array of recorded outcomes, applied in order
    #[arg(long)]
    pub outcomes: PathBuf,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigAction {
    /// Display the effective configuration
    Show,

    /// Validate the configuration file and environment overrides
    Validate,
}
