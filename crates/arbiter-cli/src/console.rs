//! CLI console utilities

use arbiter_core::DecisionType;
use arbiter_core::tracking::ConfidenceTrend;
use colored::*;

/// CLI console for formatted output
pub struct CliConsole {
    verbose: bool,
}

impl CliConsole {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        println!("{} {}", "ℹ".blue().bold(), message);
    }

    /// Print a detail line, only in verbose mode
    pub fn detail(&self, message: &str) {
        if self.verbose {
            println!("  {}", message.dimmed());
        }
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message.green());
    }

    pub fn warn(&self, message: &str) {
        println!("{} {}", "⚠".yellow().bold(), message.yellow());
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }

    pub fn print_header(&self, title: &str) {
        println!();
        println!("{}", title.bold().underline());
        println!("{}", "=".repeat(title.len()).dimmed());
    }

    /// Key/value line
    pub fn field(&self, key: &str, value: impl std::fmt::Display) {
        println!("  {:<24} {}", format!("{key}:").dimmed(), value);
    }
}

/// Colorize a decision label
pub fn decision_label(decision: DecisionType) -> ColoredString {
    match decision {
        DecisionType::ApplyPattern => decision.as_str().green().bold(),
        DecisionType::ReviewPattern => decision.as_str().yellow().bold(),
        DecisionType::GatherMoreContext => decision.as_str().cyan().bold(),
        DecisionType::NoAction => decision.as_str().dimmed(),
    }
}

/// Colorize a confidence trend: red when falling, green when rising
pub fn trend_label(trend: ConfidenceTrend) -> ColoredString {
    if trend.is_declining() {
        trend.as_str().red()
    } else if trend.is_improving() {
        trend.as_str().green()
    } else {
        trend.as_str().normal()
    }
}
