//! Windowed analytics and rule-based advice

use chrono::Utc;

use super::statistics;
use super::types::{ConfidenceAnalytics, ConfidenceTrend, FactorAnalysis, TrackingEntry};
use crate::types::PatternId;

/// Confidence at or above which a pattern is considered reliable
pub const HIGH_CONFIDENCE: f64 = 0.8;
/// Confidence at or above which a pattern can be applied with review
pub const MODERATE_CONFIDENCE: f64 = 0.6;
/// Confidence below which a pattern should be reworked
pub const LOW_CONFIDENCE: f64 = 0.4;
/// Average factor contribution above which a factor dominates
pub const DOMINANT_FACTOR: f64 = 0.7;

/// Inputs for [`build_analytics`] beyond the window itself
pub struct AnalyticsInput<'a> {
    pub pattern_id: &'a PatternId,
    pub window: &'a [&'a TrackingEntry],
    pub total_tracking_points: usize,
    pub adaptation_events: usize,
    pub volatility_threshold: f64,
}

/// Compute analytics over a non-empty window of entries, oldest first.
///
/// Returns `None` for an empty window.
pub fn build_analytics(input: AnalyticsInput<'_>) -> Option<ConfidenceAnalytics> {
    let current = input.window.last()?.confidence_score;
    let scores: Vec<f64> = input.window.iter().map(|e| e.confidence_score).collect();

    let trend = statistics::trend(&scores);
    let volatility = statistics::volatility(&scores);
    let confidence_range = statistics::range(&scores)?;
    let factor_analysis = statistics::rank_factors(input.window.iter().map(|e| &e.factors));
    let recommendations = recommendations(
        current,
        trend,
        volatility,
        input.volatility_threshold,
        &factor_analysis,
    );

    Some(ConfidenceAnalytics {
        pattern_id: input.pattern_id.clone(),
        current_confidence: current,
        trend,
        volatility,
        average_confidence: statistics::mean(&scores),
        confidence_range,
        adaptation_events: input.adaptation_events,
        total_tracking_points: input.total_tracking_points,
        window_size: scores.len(),
        factor_analysis,
        recommendations,
        generated_at: Utc::now(),
    })
}

/// Textual advice driven by confidence level, trend, volatility and factors
pub fn recommendations(
    current: f64,
    trend: ConfidenceTrend,
    volatility: f64,
    volatility_threshold: f64,
    factors: &FactorAnalysis,
) -> Vec<String> {
    let mut advice = Vec::new();

    if current >= HIGH_CONFIDENCE {
        advice.push("High confidence: pattern is reliable for automatic application".to_string());
    } else if current >= MODERATE_CONFIDENCE {
        advice.push("Moderate confidence: apply with review".to_string());
    } else if current >= LOW_CONFIDENCE {
        advice.push("Low confidence: gather more evidence before applying".to_string());
    } else {
        advice.push("Very low confidence: consider reworking or retiring this pattern".to_string());
    }

    match trend {
        ConfidenceTrend::StronglyDeclining => advice.push(
            "Confidence is dropping sharply: review recent failures before further use".to_string(),
        ),
        ConfidenceTrend::Declining => {
            advice.push("Confidence is declining: monitor upcoming outcomes closely".to_string())
        }
        ConfidenceTrend::StronglyImproving => advice.push(
            "Confidence is rising quickly: consider applying this pattern more broadly".to_string(),
        ),
        ConfidenceTrend::Improving => {
            advice.push("Confidence is improving: keep collecting outcomes".to_string())
        }
        ConfidenceTrend::Stable | ConfidenceTrend::InsufficientData => {}
    }

    if volatility > volatility_threshold {
        advice.push(format!(
            "High volatility ({:.2}): outcomes are inconsistent across contexts",
            volatility
        ));
    }

    if let Some(top) = factors.top_factors.first() {
        if top.average > DOMINANT_FACTOR {
            advice.push(format!(
                "Factor '{}' dominates confidence (average {:.2})",
                top.factor, top.average
            ));
        }
    }

    advice
}
