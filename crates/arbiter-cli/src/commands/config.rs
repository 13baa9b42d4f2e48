//! Configuration management commands

use crate::console::CliConsole;
use anyhow::{Result, bail};
use arbiter_core::ArbiterConfig;
use arbiter_core::config::ConfigLoader;
use colored::*;
use std::path::Path;

/// Load the configuration file (if present) plus `ARBITER_*` overrides
pub fn load(config_file: &Path) -> Result<ArbiterConfig> {
    Ok(ConfigLoader::new().with_file(config_file).with_env().load()?)
}

/// Show the effective configuration
pub async fn show(config: &ArbiterConfig, config_file: &Path) -> Result<()> {
    let console = CliConsole::new(true);
    console.print_header("Configuration");

    if config_file.exists() {
        console.success(&format!("Loaded configuration from: {}", config_file.display()));
    } else {
        console.warn(&format!("Configuration file not found: {}", config_file.display()));
        console.info("Using default configuration");
    }

    print_config(&console, config);
    Ok(())
}

/// Validate the configuration file
pub async fn validate(config_file: &Path) -> Result<()> {
    let console = CliConsole::new(true);
    console.print_header("Configuration Validation");

    if !config_file.exists() {
        bail!("Configuration file not found: {}", config_file.display());
    }

    match load(config_file) {
        Ok(config) => {
            console.success("Configuration is valid");
            print_config(&console, &config);
            Ok(())
        }
        Err(e) => {
            console.error(&format!("Configuration validation failed: {e:#}"));
            Err(e)
        }
    }
}

fn print_config(console: &CliConsole, config: &ArbiterConfig) {
    let tracker = &config.tracker;
    console.print_header("Tracker");
    console.field("Max history size", tracker.max_history_size);
    console.field(
        "Analytics cache TTL",
        format!("{}s", tracker.analytics_cache_ttl.as_secs()),
    );
    console.field("Analytics window", tracker.analytics_window);
    console.field(
        "Anomaly thresholds",
        format!("{} / {}", tracker.anomaly_threshold, tracker.high_anomaly_threshold),
    );
    console.field("Volatility threshold", tracker.volatility_threshold);
    console.field(
        "Confidence bounds",
        format!("[{}, {}]", tracker.min_confidence, tracker.max_confidence).yellow(),
    );
    console.field("Retention", format!("{}d", tracker.retention.as_secs() / 86_400));

    let matching = &config.matching;
    console.print_header("Matching");
    console.field("Cache size", matching.cache_size);
    console.field("Cache TTL", format!("{}s", matching.cache_ttl.as_secs()));
    console.field("Max recommendations", matching.max_recommendations);
    console.field(
        "Decision threshold",
        format!("{}", matching.decision_threshold).green(),
    );
    console.field("Review threshold", format!("{:.2}", matching.review_threshold()));

    console.print_header("Logging");
    console.field("Level", &config.logging.level);
    console.field("Format", format!("{:?}", config.logging.format).to_lowercase());
}
