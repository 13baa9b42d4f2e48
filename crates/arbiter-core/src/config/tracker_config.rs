//! Confidence tracker configuration

use crate::error::{ArbiterError, ArbiterResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Confidence tracker settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Maximum tracking entries (and adaptation events) kept per pattern
    pub max_history_size: usize,
    /// How long computed analytics stay valid
    #[serde(with = "humantime_serde")]
    pub analytics_cache_ttl: Duration,
    /// Entries considered by analytics when no day range is requested
    pub analytics_window: usize,
    /// Absolute single-step change above which an anomaly is reported
    pub anomaly_threshold: f64,
    /// Absolute single-step change above which an anomaly is `high`
    pub high_anomaly_threshold: f64,
    /// Entries considered by volatility detection
    pub volatility_window: usize,
    /// Minimum entries before volatility is evaluated
    pub volatility_min_points: usize,
    /// Volatility above which a notification is published
    pub volatility_threshold: f64,
    /// Lower clamp for outcome-driven confidence
    pub min_confidence: f64,
    /// Upper clamp for outcome-driven confidence
    pub max_confidence: f64,
    /// Age after which cleanup purges history entries
    #[serde(with = "humantime_serde")]
    pub retention: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_history_size: 1000,
            analytics_cache_ttl: Duration::from_secs(300), // 5 minutes
            analytics_window: 20,
            anomaly_threshold: 0.10,
            high_anomaly_threshold: 0.20,
            volatility_window: 10,
            volatility_min_points: 5,
            volatility_threshold: 0.15,
            min_confidence: 0.10,
            max_confidence: 0.95,
            retention: Duration::from_secs(30 * 24 * 3600), // 30 days
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> ArbiterResult<()> {
        if self.max_history_size == 0 {
            return Err(ArbiterError::config_with_context(
                "history size must be at least 1",
                "tracker.max_history_size",
            ));
        }
        if self.analytics_window == 0 {
            return Err(ArbiterError::config_with_context(
                "analytics window must be at least 1",
                "tracker.analytics_window",
            ));
        }
        if self.volatility_min_points < 2 || self.volatility_window < self.volatility_min_points {
            return Err(ArbiterError::config_with_context(
                "volatility window must hold at least volatility_min_points (>= 2) entries",
                "tracker.volatility_window",
            ));
        }
        if !(0.0..=1.0).contains(&self.min_confidence)
            || !(0.0..=1.0).contains(&self.max_confidence)
            || self.min_confidence >= self.max_confidence
        {
            return Err(ArbiterError::config_with_context(
                format!(
                    "confidence bounds must satisfy 0 <= min < max <= 1 (got {} and {})",
                    self.min_confidence, self.max_confidence
                ),
                "tracker.min_confidence",
            ));
        }
        if self.high_anomaly_threshold < self.anomaly_threshold {
            return Err(ArbiterError::config_with_context(
                "high anomaly threshold must not be below the anomaly threshold",
                "tracker.high_anomaly_threshold",
            ));
        }
        Ok(())
    }
}
