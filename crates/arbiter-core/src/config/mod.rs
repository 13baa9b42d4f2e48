//! Configuration for Arbiter
//!
//! [`ArbiterConfig`] groups the tracker, matching and logging settings. All
//! sections implement `Default` with the engine's documented defaults, so a
//! config file only needs to name the values it changes.

mod loader;
mod logging_config;
mod matching_config;
mod tracker_config;

pub use loader::{ConfigLoader, ConfigSource, ENV_PREFIX};
pub use logging_config::{LogFormat, LoggingConfig};
pub use matching_config::MatchingConfig;
pub use tracker_config::TrackerConfig;

use crate::error::{ArbiterError, ArbiterResult};
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbiterConfig {
    pub tracker: TrackerConfig,
    pub matching: MatchingConfig,
    pub logging: LoggingConfig,
    /// Buffered notifications per subscriber
    pub event_capacity: usize,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            tracker: TrackerConfig::default(),
            matching: MatchingConfig::default(),
            logging: LoggingConfig::default(),
            event_capacity: 256,
        }
    }
}

impl ArbiterConfig {
    /// Validate every section
    pub fn validate(&self) -> ArbiterResult<()> {
        self.tracker.validate()?;
        self.matching.validate()?;
        if self.event_capacity == 0 {
            return Err(ArbiterError::config_with_context(
                "event capacity must be at least 1",
                "event_capacity",
            ));
        }
        Ok(())
    }
}
