//! Recommendation generation

use std::cmp::Ordering;

use super::scoring;
use super::types::{ExpectedImpact, Recommendation, RecommendationType, RiskAssessment};
use crate::types::{ContextAnalysis, Match, PatternType};

/// Fixed priority of the context-improvement item
pub const CONTEXT_IMPROVEMENT_PRIORITY: f64 = 60.0;
/// Fixed priority of the risk-mitigation item
pub const RISK_MITIGATION_PRIORITY: f64 = 75.0;

/// Turn raw matches into a ranked recommendation list.
///
/// The `max_recommendations` most relevant matches are converted, context
/// improvement and risk mitigation items are appended when the analysis
/// calls for them, and the combined list is ordered by priority.
pub fn generate(
    analysis: &ContextAnalysis,
    matches: &[Match],
    max_recommendations: usize,
    quality_threshold: f64,
) -> Vec<Recommendation> {
    let mut by_relevance: Vec<&Match> = matches.iter().collect();
    by_relevance.sort_by(|a, b| desc(a.relevance_score, b.relevance_score));

    let has_risks = analysis.has_risks();
    let mut recommendations: Vec<Recommendation> = by_relevance
        .into_iter()
        .take(max_recommendations)
        .map(|m| from_match(m, has_risks))
        .collect();

    if analysis.quality.overall_score < quality_threshold {
        recommendations.push(context_improvement(analysis));
    }
    if has_risks {
        recommendations.push(risk_mitigation(analysis));
    }

    // Stable sort keeps relevance order among equal priorities
    recommendations.sort_by(|a, b| desc(a.priority, b.priority));
    for (index, recommendation) in recommendations.iter_mut().enumerate() {
        recommendation.rank = index + 1;
    }
    recommendations
}

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Convert one match into a pattern recommendation
pub fn from_match(m: &Match, context_has_risks: bool) -> Recommendation {
    let complexity = scoring::implementation_complexity(m);
    let name = if m.pattern_name.is_empty() {
        m.pattern_id.as_str()
    } else {
        m.pattern_name.as_str()
    };

    Recommendation {
        rank: 0,
        priority: scoring::priority(m, complexity, context_has_risks),
        recommendation_type: RecommendationType::Pattern,
        pattern_id: Some(m.pattern_id.clone()),
        pattern_type: Some(m.pattern_type),
        action: format!("Apply {} pattern '{}'", m.pattern_type, name),
        rationale: format!(
            "Relevance {:.2}, confidence {:.2}, similarity {:.2}",
            m.relevance_score, m.confidence_score, m.similarity_score
        ),
        confidence_score: m.confidence_score,
        relevance_score: m.relevance_score,
        expected_impact: scoring::expected_impact(m),
        implementation_complexity: complexity,
        risk_assessment: scoring::risk_assessment(m, complexity, context_has_risks),
        prerequisites: prerequisites(m.pattern_type),
        success_criteria: success_criteria(m.pattern_type),
    }
}

fn context_improvement(analysis: &ContextAnalysis) -> Recommendation {
    Recommendation {
        rank: 0,
        priority: CONTEXT_IMPROVEMENT_PRIORITY,
        recommendation_type: RecommendationType::ContextImprovement,
        pattern_id: None,
        pattern_type: None,
        action: "Gather more context before applying patterns".to_string(),
        rationale: format!(
            "Context quality {:.2} is too low for a reliable match",
            analysis.quality.overall_score
        ),
        confidence_score: 1.0 - analysis.quality.overall_score.clamp(0.0, 1.0),
        relevance_score: 1.0,
        expected_impact: ExpectedImpact {
            quality: 0.5,
            development_speed: 0.2,
            ..Default::default()
        },
        implementation_complexity: 0.3,
        risk_assessment: RiskAssessment {
            technical: 0.1,
            business: 0.1,
            implementation: 0.2,
            overall: scoring::overall_risk(0.1, 0.1, 0.2),
        },
        prerequisites: Vec::new(),
        success_criteria: vec!["Context quality reaches the required threshold".to_string()],
    }
}

fn risk_mitigation(analysis: &ContextAnalysis) -> Recommendation {
    let described: Vec<&str> = analysis.risks.iter().map(|r| r.description.as_str()).collect();
    Recommendation {
        rank: 0,
        priority: RISK_MITIGATION_PRIORITY,
        recommendation_type: RecommendationType::RiskMitigation,
        pattern_id: None,
        pattern_type: None,
        action: format!("Mitigate {} identified risk(s)", analysis.risks.len()),
        rationale: format!("Context risks: {}", described.join("; ")),
        confidence_score: 0.8,
        relevance_score: 1.0,
        expected_impact: ExpectedImpact {
            quality: 0.4,
            security: 0.6,
            maintainability: 0.3,
            ..Default::default()
        },
        implementation_complexity: 0.5,
        risk_assessment: RiskAssessment {
            technical: 0.3,
            business: 0.6,
            implementation: 0.35,
            overall: scoring::overall_risk(0.3, 0.6, 0.35),
        },
        prerequisites: vec!["Review each identified risk".to_string()],
        success_criteria: vec!["All identified risks are addressed or accepted".to_string()],
    }
}

fn prerequisites(pattern_type: PatternType) -> Vec<String> {
    let items: &[&str] = match pattern_type {
        PatternType::Security => &["Security review of affected code", "Threat model is current"],
        PatternType::Architecture => &["Architecture review", "Dependency map of affected modules"],
        PatternType::Performance => &["Baseline performance measurements"],
        PatternType::Testing => &["Test environment available"],
        _ => &["Understanding of the affected code"],
    };
    items.iter().map(|s| s.to_string()).collect()
}

fn success_criteria(pattern_type: PatternType) -> Vec<String> {
    let items: &[&str] = match pattern_type {
        PatternType::Security => &["No new vulnerabilities reported", "Security tests pass"],
        PatternType::Architecture => &["Module boundaries respected", "No new cyclic dependencies"],
        PatternType::Performance => &["Measured improvement over the baseline"],
        PatternType::Testing => &["Coverage does not decrease", "All tests pass"],
        _ => &["Existing tests pass", "Change reviewed"],
    };
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContextRisk, RiskSeverity};

    fn analysis(quality: f64, risky: bool) -> ContextAnalysis {
        let analysis = ContextAnalysis::with_quality(quality);
        if risky {
            analysis.with_risk(ContextRisk::new("unsanitized input", RiskSeverity::High))
        } else {
            analysis
        }
    }

    #[test]
    fn test_top_matches_by_relevance() {
        let matches: Vec<Match> = (0..8)
            .map(|i| Match::new(format!("p{i}").as_str(), PatternType::General, 0.5, i as f64 / 10.0))
            .collect();

        let recs = generate(&analysis(0.9, false), &matches, 5, 0.7);
        let ids: Vec<&str> = recs
            .iter()
            .filter_map(|r| r.pattern_id.as_ref().map(|id| id.as_str()))
            .collect();

        assert_eq!(ids, vec!["p7", "p6", "p5", "p4", "p3"]);
        assert_eq!(recs.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_context_items_are_added_and_ranked() {
        let matches = vec![Match::new("weak", PatternType::General, 0.5, 0.5)];
        let recs = generate(&analysis(0.4, true), &matches, 5, 0.7);

        let kinds: Vec<RecommendationType> = recs.iter().map(|r| r.recommendation_type).collect();
        assert_eq!(
            kinds,
            vec![
                RecommendationType::RiskMitigation,
                RecommendationType::ContextImprovement,
                RecommendationType::Pattern,
            ]
        );
        assert!(recs[0].rationale.contains("unsanitized input"));
        assert_eq!(recs[2].priority, 30.0);
    }

    #[test]
    fn test_quality_at_threshold_needs_no_improvement() {
        let recs = generate(&analysis(0.7, false), &[], 5, 0.7);
        assert!(recs.is_empty());
    }

    #[test]
    fn test_from_match_uses_name_when_present() {
        let m = Match::new("sec-1", PatternType::Security, 0.9, 1.0).with_name("Parameterized queries");
        let rec = from_match(&m, true);

        assert_eq!(rec.priority, 85.0);
        assert!(rec.action.contains("Parameterized queries"));
        assert_eq!(rec.prerequisites.len(), 2);
    }
}
