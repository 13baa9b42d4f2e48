//! Confidence calculation contract

use crate::error::ArbiterResult;
use crate::tracking::TrackOptions;
use crate::types::{Pattern, RawContext};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Instantaneous confidence for a pattern in a context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceScore {
    pub score: f64,
    /// Named contributions to the score, each in [0, 1]
    #[serde(default)]
    pub factors: BTreeMap<String, f64>,
    pub calculation_method: String,
}

/// Confidence change proposed after an outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeUpdate {
    pub previous_confidence: f64,
    pub new_confidence: f64,
    #[serde(default)]
    pub factors: BTreeMap<String, f64>,
}

/// Numeric forecast of future confidence values, one per step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceForecast {
    pub predictions: Vec<f64>,
    pub method: String,
}

/// Computes confidence values for patterns
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfidenceCalculator: Send + Sync {
    /// Score a pattern for a context
    async fn calculate_confidence(
        &self,
        pattern: &Pattern,
        context: &RawContext,
        options: &TrackOptions,
    ) -> ArbiterResult<ConfidenceScore>;

    /// Propose a new stored confidence after the pattern was applied
    async fn update_confidence_from_outcome(
        &self,
        pattern: &Pattern,
        success: bool,
        quality_impact: f64,
        context: &RawContext,
    ) -> ArbiterResult<OutcomeUpdate>;

    /// Forecast the next `steps` confidence values
    async fn predict_future_confidence(
        &self,
        pattern: &Pattern,
        steps: usize,
    ) -> ArbiterResult<ConfidenceForecast>;
}
