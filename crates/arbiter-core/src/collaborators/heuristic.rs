//! Baseline confidence calculator
//!
//! A deterministic calculator built only from the statistics stored on the
//! pattern. It is what the CLI uses when no richer calculator is plugged in.

use super::calculator::{ConfidenceCalculator, ConfidenceForecast, ConfidenceScore, OutcomeUpdate};
use crate::error::ArbiterResult;
use crate::tracking::TrackOptions;
use crate::types::{Pattern, RawContext};
use async_trait::async_trait;
use std::collections::BTreeMap;

const STORED_CONFIDENCE_WEIGHT: f64 = 0.5;
const SUCCESS_RATE_WEIGHT: f64 = 0.35;
const MATURITY_WEIGHT: f64 = 0.15;
/// Applications after which a pattern counts as fully mature
const MATURITY_USAGE: f64 = 20.0;

const SUCCESS_STEP: f64 = 0.05;
const FAILURE_STEP: f64 = 0.08;
const QUALITY_STEP: f64 = 0.05;

/// Fraction of the gap to the success rate closed per forecast step
const REVERSION_RATE: f64 = 0.2;

/// Weighted-sum calculator over stored pattern statistics
#[derive(Debug, Clone)]
pub struct HeuristicConfidenceCalculator {
    min_confidence: f64,
    max_confidence: f64,
}

impl HeuristicConfidenceCalculator {
    pub fn new(min_confidence: f64, max_confidence: f64) -> Self {
        Self {
            min_confidence,
            max_confidence,
        }
    }
}

impl Default for HeuristicConfidenceCalculator {
    fn default() -> Self {
        Self::new(0.10, 0.95)
    }
}

#[async_trait]
impl ConfidenceCalculator for HeuristicConfidenceCalculator {
    async fn calculate_confidence(
        &self,
        pattern: &Pattern,
        _context: &RawContext,
        _options: &TrackOptions,
    ) -> ArbiterResult<ConfidenceScore> {
        let maturity = (pattern.usage_count as f64 / MATURITY_USAGE).min(1.0);
        let mut factors = BTreeMap::new();
        factors.insert("stored_confidence".to_string(), pattern.confidence_score);
        factors.insert("success_rate".to_string(), pattern.success_rate);
        factors.insert("usage_maturity".to_string(), maturity);

        let score = STORED_CONFIDENCE_WEIGHT * pattern.confidence_score
            + SUCCESS_RATE_WEIGHT * pattern.success_rate
            + MATURITY_WEIGHT * maturity;

        Ok(ConfidenceScore {
            score: score.clamp(0.0, 1.0),
            factors,
            calculation_method: "weighted_heuristic".to_string(),
        })
    }

    async fn update_confidence_from_outcome(
        &self,
        pattern: &Pattern,
        success: bool,
        quality_impact: f64,
        _context: &RawContext,
    ) -> ArbiterResult<OutcomeUpdate> {
        let impact = quality_impact.abs().min(1.0);
        let step = if success {
            SUCCESS_STEP + QUALITY_STEP * impact
        } else {
            -(FAILURE_STEP + QUALITY_STEP * impact)
        };
        let previous = pattern.confidence_score;
        let new_confidence = (previous + step).clamp(self.min_confidence, self.max_confidence);

        let mut factors = BTreeMap::new();
        factors.insert("outcome".to_string(), if success { 1.0 } else { 0.0 });
        factors.insert("quality_impact".to_string(), impact);
        factors.insert("step".to_string(), step);

        Ok(OutcomeUpdate {
            previous_confidence: previous,
            new_confidence,
            factors,
        })
    }

    async fn predict_future_confidence(
        &self,
        pattern: &Pattern,
        steps: usize,
    ) -> ArbiterResult<ConfidenceForecast> {
        let target = pattern.success_rate;
        let mut current = pattern.confidence_score;
        let predictions = (0..steps)
            .map(|_| {
                current += REVERSION_RATE * (target - current);
                current.clamp(self.min_confidence, self.max_confidence)
            })
            .collect();

        Ok(ConfidenceForecast {
            predictions,
            method: "mean_reversion".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PatternType;
    use serde_json::json;

    fn pattern(confidence: f64, success_rate: f64) -> Pattern {
        Pattern::new("p", "Input validation", PatternType::Security)
            .with_confidence(confidence)
            .with_success_rate(success_rate)
    }

    #[tokio::test]
    async fn test_calculate_confidence_weights() {
        let calc = HeuristicConfidenceCalculator::default();
        let score = calc
            .calculate_confidence(&pattern(0.8, 0.6), &json!({}), &TrackOptions::default())
            .await
            .unwrap();

        assert!((score.score - (0.4 + 0.21)).abs() < 1e-9);
        assert_eq!(score.factors.len(), 3);
        assert_eq!(score.calculation_method, "weighted_heuristic");
    }

    #[tokio::test]
    async fn test_outcome_update_respects_bounds() {
        let calc = HeuristicConfidenceCalculator::default();

        let up = calc
            .update_confidence_from_outcome(&pattern(0.94, 0.9), true, 1.0, &json!({}))
            .await
            .unwrap();
        assert_eq!(up.new_confidence, 0.95);

        let down = calc
            .update_confidence_from_outcome(&pattern(0.12, 0.1), false, -1.0, &json!({}))
            .await
            .unwrap();
        assert_eq!(down.new_confidence, 0.10);
        assert_eq!(down.previous_confidence, 0.12);
    }

    #[tokio::test]
    async fn test_forecast_moves_toward_success_rate() {
        let calc = HeuristicConfidenceCalculator::default();
        let forecast = calc
            .predict_future_confidence(&pattern(0.4, 0.9), 5)
            .await
            .unwrap();

        assert_eq!(forecast.predictions.len(), 5);
        assert!(forecast.predictions.windows(2).all(|w| w[1] > w[0]));
        assert!(forecast.predictions.iter().all(|p| *p < 0.9));
    }
}
