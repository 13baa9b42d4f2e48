//! Heuristic scoring of matches
//!
//! All coefficients are named so tests and callers can reason about them.

use super::types::{ExpectedImpact, RiskAssessment};
use crate::types::{Match, PatternType};

/// Weight of `relevance_score` in the priority
pub const RELEVANCE_PRIORITY_WEIGHT: f64 = 40.0;
/// Match confidence above which the high bonus applies
pub const HIGH_CONFIDENCE_LEVEL: f64 = 0.8;
pub const HIGH_CONFIDENCE_BONUS: f64 = 20.0;
/// Match confidence above which the moderate bonus applies
pub const MODERATE_CONFIDENCE_LEVEL: f64 = 0.6;
pub const MODERATE_CONFIDENCE_BONUS: f64 = 10.0;
pub const SECURITY_PRIORITY_BONUS: f64 = 15.0;
pub const ARCHITECTURE_PRIORITY_BONUS: f64 = 10.0;
/// Added when the context carries any risk
pub const CONTEXT_RISK_BONUS: f64 = 10.0;
/// Implementation complexity above which the penalty applies
pub const COMPLEXITY_PENALTY_LEVEL: f64 = 0.7;
pub const COMPLEXITY_PENALTY: f64 = 10.0;
pub const MAX_PRIORITY: f64 = 100.0;

pub const BASE_COMPLEXITY: f64 = 0.5;
pub const CHARACTERISTIC_COMPLEXITY_WEIGHT: f64 = 0.3;
pub const CHARACTERISTIC_RISK_WEIGHT: f64 = 0.2;
pub const ARCHITECTURE_COMPLEXITY: f64 = 0.3;
pub const SECURITY_COMPLEXITY: f64 = 0.2;
pub const PERFORMANCE_COMPLEXITY: f64 = 0.1;

pub const RISKY_CONTEXT_BUSINESS_RISK: f64 = 0.6;
pub const CALM_CONTEXT_BUSINESS_RISK: f64 = 0.2;
pub const IMPLEMENTATION_RISK_WEIGHT: f64 = 0.7;
pub const TECHNICAL_RISK_SHARE: f64 = 0.4;
pub const BUSINESS_RISK_SHARE: f64 = 0.3;
pub const IMPLEMENTATION_RISK_SHARE: f64 = 0.3;

/// Extra complexity carried by a pattern type
fn type_complexity(pattern_type: PatternType) -> f64 {
    match pattern_type {
        PatternType::Architecture => ARCHITECTURE_COMPLEXITY,
        PatternType::Security => SECURITY_COMPLEXITY,
        PatternType::Performance => PERFORMANCE_COMPLEXITY,
        _ => 0.0,
    }
}

fn type_priority_bonus(pattern_type: PatternType) -> f64 {
    match pattern_type {
        PatternType::Security => SECURITY_PRIORITY_BONUS,
        PatternType::Architecture => ARCHITECTURE_PRIORITY_BONUS,
        _ => 0.0,
    }
}

fn confidence_bonus(confidence: f64) -> f64 {
    if confidence > HIGH_CONFIDENCE_LEVEL {
        HIGH_CONFIDENCE_BONUS
    } else if confidence > MODERATE_CONFIDENCE_LEVEL {
        MODERATE_CONFIDENCE_BONUS
    } else {
        0.0
    }
}

/// Effort estimate in [0, 1] from the pattern's characteristics and type
pub fn implementation_complexity(m: &Match) -> f64 {
    let characteristics = &m.pattern_characteristics;
    (BASE_COMPLEXITY
        + CHARACTERISTIC_COMPLEXITY_WEIGHT * characteristics.complexity
        + CHARACTERISTIC_RISK_WEIGHT * characteristics.risk_level
        + type_complexity(m.pattern_type))
    .min(1.0)
}

/// Priority in [0, 100]
pub fn priority(m: &Match, implementation_complexity: f64, context_has_risks: bool) -> f64 {
    let mut priority = RELEVANCE_PRIORITY_WEIGHT * m.relevance_score
        + confidence_bonus(m.confidence_score)
        + type_priority_bonus(m.pattern_type);
    if context_has_risks {
        priority += CONTEXT_RISK_BONUS;
    }
    if implementation_complexity > COMPLEXITY_PENALTY_LEVEL {
        priority -= COMPLEXITY_PENALTY;
    }
    priority.clamp(0.0, MAX_PRIORITY)
}

/// Weighted overall risk from its components
pub fn overall_risk(technical: f64, business: f64, implementation: f64) -> f64 {
    TECHNICAL_RISK_SHARE * technical
        + BUSINESS_RISK_SHARE * business
        + IMPLEMENTATION_RISK_SHARE * implementation
}

pub fn risk_assessment(m: &Match, implementation_complexity: f64, context_has_risks: bool) -> RiskAssessment {
    let technical = m.pattern_characteristics.risk_level;
    let business = if context_has_risks {
        RISKY_CONTEXT_BUSINESS_RISK
    } else {
        CALM_CONTEXT_BUSINESS_RISK
    };
    let implementation = IMPLEMENTATION_RISK_WEIGHT * implementation_complexity;

    RiskAssessment {
        technical,
        business,
        implementation,
        overall: overall_risk(technical, business, implementation),
    }
}

/// Impact profile of a pattern type, scaled by how relevant the match is
pub fn expected_impact(m: &Match) -> ExpectedImpact {
    let (quality, performance, security, maintainability, development_speed) = match m.pattern_type {
        PatternType::Security => (0.6, 0.1, 0.9, 0.5, 0.2),
        PatternType::Architecture => (0.7, 0.4, 0.3, 0.9, 0.3),
        PatternType::Performance => (0.4, 0.9, 0.1, 0.3, 0.3),
        PatternType::Quality => (0.9, 0.2, 0.3, 0.7, 0.4),
        PatternType::Testing => (0.8, 0.1, 0.3, 0.6, 0.5),
        PatternType::Documentation => (0.4, 0.0, 0.1, 0.8, 0.6),
        PatternType::General => (0.5, 0.3, 0.3, 0.5, 0.5),
    };
    let scale = m.relevance_score.clamp(0.0, 1.0);

    ExpectedImpact {
        quality: quality * scale,
        performance: performance * scale,
        security: security * scale,
        maintainability: maintainability * scale,
        development_speed: development_speed * scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_example() {
        let m = Match::new("p", PatternType::Security, 0.9, 1.0).with_characteristics(0.0, 0.0);
        let complexity = implementation_complexity(&m);

        assert!((complexity - 0.7).abs() < 1e-12);
        assert_eq!(priority(&m, complexity, true), 85.0);
        assert_eq!(priority(&m, complexity, false), 75.0);
    }

    #[test]
    fn test_priority_bonuses_and_penalty() {
        let moderate = Match::new("p", PatternType::General, 0.7, 0.5);
        assert_eq!(priority(&moderate, 0.5, false), 30.0);

        let low = Match::new("p", PatternType::Architecture, 0.6, 0.5);
        assert_eq!(priority(&low, 0.5, false), 30.0);
        assert_eq!(priority(&low, 0.71, false), 20.0);
    }

    #[test]
    fn test_priority_is_clamped() {
        let huge = Match::new("p", PatternType::Security, 0.95, 3.0);
        assert_eq!(priority(&huge, 0.5, true), MAX_PRIORITY);

        let negative = Match::new("p", PatternType::General, 0.1, 0.0);
        assert_eq!(priority(&negative, 0.9, false), 0.0);
    }

    #[test]
    fn test_implementation_complexity() {
        let m = Match::new("p", PatternType::Performance, 0.5, 0.5).with_characteristics(0.5, 0.5);
        assert!((implementation_complexity(&m) - 0.85).abs() < 1e-12);

        let capped = Match::new("p", PatternType::Architecture, 0.5, 0.5).with_characteristics(1.0, 1.0);
        assert_eq!(implementation_complexity(&capped), 1.0);
    }

    #[test]
    fn test_risk_assessment() {
        let m = Match::new("p", PatternType::General, 0.5, 0.5).with_characteristics(0.0, 0.4);
        let risk = risk_assessment(&m, 0.5, true);

        assert_eq!(risk.technical, 0.4);
        assert_eq!(risk.business, 0.6);
        assert!((risk.implementation - 0.35).abs() < 1e-12);
        assert!((risk.overall - (0.16 + 0.18 + 0.105)).abs() < 1e-12);

        assert_eq!(risk_assessment(&m, 0.5, false).business, 0.2);
    }
}
