//! Decision engine configuration

use crate::error::{ArbiterError, ArbiterResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Decision engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Maximum cached matching results
    pub cache_size: usize,
    /// How long a cached matching result is served
    #[serde(with = "humantime_serde")]
    pub cache_ttl: Duration,
    /// Raw matches converted into recommendations
    pub max_recommendations: usize,
    /// Pattern recommendations considered by the decision
    pub max_decision_patterns: usize,
    /// Decision confidence above which a pattern is applied
    pub decision_threshold: f64,
    /// Context quality below which a context-improvement item is added
    pub context_quality_threshold: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            cache_size: 100,
            cache_ttl: Duration::from_secs(300), // 5 minutes
            max_recommendations: 5,
            max_decision_patterns: 3,
            decision_threshold: 0.7,
            context_quality_threshold: 0.7,
        }
    }
}

impl MatchingConfig {
    pub fn validate(&self) -> ArbiterResult<()> {
        if self.cache_size == 0 {
            return Err(ArbiterError::config_with_context(
                "cache size must be at least 1",
                "matching.cache_size",
            ));
        }
        if !(self.decision_threshold > 0.0 && self.decision_threshold <= 1.0) {
            return Err(ArbiterError::config_with_context(
                format!(
                    "decision threshold must be in (0, 1], got {}",
                    self.decision_threshold
                ),
                "matching.decision_threshold",
            ));
        }
        if self.max_recommendations == 0 || self.max_decision_patterns == 0 {
            return Err(ArbiterError::config_with_context(
                "recommendation limits must be at least 1",
                "matching.max_recommendations",
            ));
        }
        Ok(())
    }

    /// Decision confidence above which a pattern is sent to review
    pub fn review_threshold(&self) -> f64 {
        0.7 * self.decision_threshold
    }
}
