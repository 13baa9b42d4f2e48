//! Decision making over ranked recommendations

use super::scoring;
use super::types::{Decision, DecisionType, ImplementationPlan, Recommendation, RiskAssessment};
use crate::config::MatchingConfig;
use crate::types::{ContextAnalysis, PatternType};

/// Confidence reported when there is nothing to act on
pub const NO_ACTION_CONFIDENCE: f64 = 0.8;

pub const PRIMARY_CONFIDENCE_WEIGHT: f64 = 0.5;
pub const PRIMARY_RELEVANCE_WEIGHT: f64 = 0.3;
pub const PRIMARY_PRIORITY_WEIGHT: f64 = 0.2;
/// Context quality multiplier is `QUALITY_BASE + QUALITY_WEIGHT * quality`
pub const QUALITY_BASE: f64 = 0.8;
pub const QUALITY_WEIGHT: f64 = 0.4;
/// Business risk added to the blended assessment when the context has risks
pub const CONTEXT_BUSINESS_RISK: f64 = 0.2;
/// Confidence must clear a band boundary by more than this to land above it
pub const BAND_TOLERANCE: f64 = 1e-9;

/// Decide what to do with a priority-ordered recommendation list
pub fn decide(
    analysis: &ContextAnalysis,
    recommendations: &[Recommendation],
    config: &MatchingConfig,
) -> Decision {
    let top: Vec<Recommendation> = recommendations
        .iter()
        .filter(|r| !r.recommendation_type.is_context_derived())
        .take(config.max_decision_patterns)
        .cloned()
        .collect();

    let Some(primary) = top.first() else {
        return Decision {
            decision_type: DecisionType::NoAction,
            confidence: NO_ACTION_CONFIDENCE,
            recommended_patterns: Vec::new(),
            risk_assessment: RiskAssessment::default(),
            implementation_plan: ImplementationPlan::default(),
            reasoning: "No pattern recommendations qualified for this context".to_string(),
        };
    };

    let confidence = decision_confidence(primary, analysis.quality.overall_score);
    let decision_type = classify(confidence, config.decision_threshold, config.review_threshold());
    let risk_assessment = blended_risk(&top, analysis.has_risks());
    let implementation_plan = implementation_plan(primary);
    let reasoning = format!(
        "{} with confidence {:.2}: primary recommendation '{}' (priority {:.0}, relevance {:.2}), context quality {:.2}, {} context risk(s)",
        decision_type,
        confidence,
        primary.action,
        primary.priority,
        primary.relevance_score,
        analysis.quality.overall_score,
        analysis.risks.len()
    );

    Decision {
        decision_type,
        confidence,
        recommended_patterns: top,
        risk_assessment,
        implementation_plan,
        reasoning,
    }
}

/// Decision confidence from the primary recommendation, capped at 1
pub fn decision_confidence(primary: &Recommendation, context_quality: f64) -> f64 {
    let base = PRIMARY_CONFIDENCE_WEIGHT * primary.confidence_score
        + PRIMARY_RELEVANCE_WEIGHT * primary.relevance_score
        + PRIMARY_PRIORITY_WEIGHT * (primary.priority / scoring::MAX_PRIORITY);
    (base * (QUALITY_BASE + QUALITY_WEIGHT * context_quality)).min(1.0)
}

/// Band a decision confidence; values within [`BAND_TOLERANCE`] of a
/// threshold count as sitting on it.
pub fn classify(confidence: f64, apply_threshold: f64, review_threshold: f64) -> DecisionType {
    if confidence > apply_threshold + BAND_TOLERANCE {
        DecisionType::ApplyPattern
    } else if confidence > review_threshold + BAND_TOLERANCE {
        DecisionType::ReviewPattern
    } else {
        DecisionType::GatherMoreContext
    }
}

/// Average risk of the considered recommendations, raised for risky contexts
pub fn blended_risk(recommendations: &[Recommendation], context_has_risks: bool) -> RiskAssessment {
    if recommendations.is_empty() {
        return RiskAssessment::default();
    }
    let n = recommendations.len() as f64;
    let average = |f: fn(&RiskAssessment) -> f64| {
        recommendations.iter().map(|r| f(&r.risk_assessment)).sum::<f64>() / n
    };

    let technical = average(|r| r.technical).min(1.0);
    let mut business = average(|r| r.business);
    if context_has_risks {
        business += CONTEXT_BUSINESS_RISK;
    }
    let business = business.min(1.0);
    let implementation = average(|r| r.implementation).min(1.0);

    RiskAssessment {
        technical,
        business,
        implementation,
        overall: scoring::overall_risk(technical, business, implementation),
    }
}

const SECURITY_STEPS: &[&str] = &[
    "Identify all affected entry points",
    "Review the threat model for the change",
    "Apply the security pattern",
    "Add security-focused tests",
    "Run static analysis and dependency audit",
    "Request a security review",
];

const ARCHITECTURE_STEPS: &[&str] = &[
    "Map the affected modules and dependencies",
    "Draft the target structure",
    "Introduce the new boundaries behind the existing interface",
    "Migrate callers incrementally",
    "Remove the superseded structure",
    "Review the result with module owners",
];

const PERFORMANCE_STEPS: &[&str] = &[
    "Capture baseline measurements",
    "Locate the hot path",
    "Apply the performance pattern",
    "Benchmark against the baseline",
    "Check for regressions under load",
    "Document the measured improvement",
];

const DEFAULT_STEPS: &[&str] = &[
    "Review the recommended pattern",
    "Plan the change",
    "Apply the pattern",
    "Test the change",
    "Review and merge",
];

/// Fixed plan template for the primary recommendation's pattern type
pub fn implementation_plan(primary: &Recommendation) -> ImplementationPlan {
    let (steps, hours) = match primary.pattern_type {
        Some(PatternType::Security) => (SECURITY_STEPS, 16),
        Some(PatternType::Architecture) => (ARCHITECTURE_STEPS, 24),
        Some(PatternType::Performance) => (PERFORMANCE_STEPS, 12),
        _ => (DEFAULT_STEPS, 8),
    };

    ImplementationPlan {
        steps: steps.iter().map(|s| s.to_string()).collect(),
        estimated_effort_hours: hours,
        dependencies: primary.prerequisites.clone(),
        success_criteria: primary.success_criteria.clone(),
    }
}
