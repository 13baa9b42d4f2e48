//! Tracing subscriber setup

use arbiter_core::config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level; `--verbose` raises the
/// configured level to `debug`. Logs go to stderr so command output stays
/// pipeable.
pub fn init(config: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.with_target(false).init(),
    }
}
