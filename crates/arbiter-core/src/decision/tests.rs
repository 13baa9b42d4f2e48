//! Tests for the decision engine pipeline.

use super::*;
use crate::collaborators::{ContextAnalyzer, MockContextAnalyzer, MockContextMatcher};
use crate::config::MatchingConfig;
use crate::error::{ArbiterError, ArbiterResult};
use crate::events::{self, Event};
use crate::types::{ContextAnalysis, ContextRisk, Match, MatchSet, PatternType, RawContext, RiskSeverity};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

fn analyzer(analysis: ContextAnalysis, times: usize) -> MockContextAnalyzer {
    let mut analyzer = MockContextAnalyzer::new();
    analyzer
        .expect_analyze_context()
        .times(times)
        .returning(move |_, _| Ok(analysis.clone()));
    analyzer
}

fn matcher(matches: Vec<Match>) -> MockContextMatcher {
    let mut matcher = MockContextMatcher::new();
    matcher
        .expect_match_context_with_patterns()
        .returning(move |_, _| {
            Ok(MatchSet {
                matches: matches.clone(),
            })
        });
    matcher
}

fn security_match() -> Match {
    Match::new("sec-1", PatternType::Security, 0.9, 1.0)
        .with_name("Parameterized queries")
        .with_characteristics(0.0, 0.0)
}

fn engine(
    config: MatchingConfig,
    analyzer: impl ContextAnalyzer + 'static,
    matcher: MockContextMatcher,
) -> DecisionEngine {
    DecisionEngine::new(config, Arc::new(analyzer), Arc::new(matcher))
}

#[tokio::test]
async fn test_pipeline_applies_strong_pattern() {
    let engine = engine(
        MatchingConfig::default(),
        analyzer(ContextAnalysis::with_quality(0.9), 1),
        matcher(vec![
            security_match(),
            Match::new("gen-1", PatternType::General, 0.5, 0.4),
        ]),
    );
    let mut rx = engine.subscribe();

    let result = engine
        .match_patterns(&json!({"task": "login form"}), &MatchOptions::default())
        .await
        .unwrap();

    assert!(!result.cached);
    assert_eq!(result.recommendations.len(), 2);
    assert_eq!(result.recommendations[0].priority, 75.0);
    assert_eq!(result.recommendations[0].rank, 1);
    assert_eq!(result.decision.decision_type, DecisionType::ApplyPattern);
    assert_eq!(result.decision.confidence, 1.0);
    assert_eq!(result.decision.recommended_patterns.len(), 2);
    assert_eq!(result.decision.implementation_plan.estimated_effort_hours, 16);

    let kinds: Vec<&str> = events::drain(&mut rx).iter().map(Event::event_type).collect();
    assert_eq!(kinds, vec!["context_analyzed", "context_matched", "patterns_matched"]);
    assert!(engine.active_matches().is_empty());
}

#[tokio::test]
async fn test_risky_context_priority_example() {
    let analysis = ContextAnalysis::with_quality(0.9)
        .with_risk(ContextRisk::new("user input reaches SQL", RiskSeverity::High));
    let engine = engine(
        MatchingConfig::default(),
        analyzer(analysis, 1),
        matcher(vec![security_match()]),
    );

    let result = engine
        .match_patterns(&json!({"task": "query"}), &MatchOptions::default())
        .await
        .unwrap();

    let pattern = result
        .recommendations
        .iter()
        .find(|r| r.recommendation_type == RecommendationType::Pattern)
        .unwrap();
    assert_eq!(pattern.priority, 85.0);
    assert_eq!(result.recommendations[0].priority, 85.0);
    assert_eq!(
        result.recommendations[1].recommendation_type,
        RecommendationType::RiskMitigation
    );
    assert!((result.decision.risk_assessment.business - 0.8).abs() < 1e-12);
}

#[tokio::test]
async fn test_no_matches_means_no_action() {
    let engine = engine(
        MatchingConfig::default(),
        analyzer(ContextAnalysis::with_quality(0.3), 1),
        matcher(vec![]),
    );

    let result = engine
        .match_patterns(&json!({}), &MatchOptions::default())
        .await
        .unwrap();
    assert_eq!(result.decision.decision_type, DecisionType::NoAction);
    assert_eq!(result.decision.confidence, 0.8);
    assert_eq!(result.recommendations.len(), 1);
    assert_eq!(
        result.recommendations[0].recommendation_type,
        RecommendationType::ContextImprovement
    );
}

#[tokio::test]
async fn test_low_quality_context_gathers_more() {
    let engine = engine(
        MatchingConfig::default(),
        analyzer(ContextAnalysis::with_quality(0.1), 1),
        matcher(vec![Match::new("gen-1", PatternType::General, 0.4, 0.5)]),
    );

    let result = engine
        .match_patterns(&json!({"task": "vague"}), &MatchOptions::default())
        .await
        .unwrap();
    assert_eq!(result.decision.decision_type, DecisionType::GatherMoreContext);
}

#[tokio::test]
async fn test_identical_context_is_served_from_cache() {
    let engine = engine(
        MatchingConfig::default(),
        analyzer(ContextAnalysis::with_quality(0.9), 1),
        matcher(vec![security_match()]),
    );
    let mut rx = engine.subscribe();
    let context = json!({"task": "login form", "language": "rust"});

    let first = engine.match_patterns(&context, &MatchOptions::default()).await.unwrap();
    let second = engine
        .match_patterns(&json!({"language": "rust", "task": "login form"}), &MatchOptions::default())
        .await
        .unwrap();

    assert!(!first.cached);
    assert!(second.cached);
    assert_eq!(second.operation_id, first.operation_id);
    assert_eq!(second.decision, first.decision);

    let cached_flags: Vec<bool> = events::drain(&mut rx)
        .into_iter()
        .filter_map(|e| match e {
            Event::PatternsMatched { cached, .. } => Some(cached),
            _ => None,
        })
        .collect();
    assert_eq!(cached_flags, vec![false, true]);

    let stats = engine.statistics();
    assert_eq!(stats.total_requests, 2);
    assert_eq!(stats.completed, 1);
    assert_eq!((stats.cache_hits, stats.cache_misses), (1, 1));
    assert_eq!(stats.cache_hit_rate(), 0.5);
}

#[tokio::test]
async fn test_skip_cache_recomputes() {
    let engine = engine(
        MatchingConfig::default(),
        analyzer(ContextAnalysis::with_quality(0.9), 2),
        matcher(vec![security_match()]),
    );
    let context = json!({"task": "x"});

    engine.match_patterns(&context, &MatchOptions::default()).await.unwrap();
    let fresh = engine.match_patterns(&context, &MatchOptions::skip_cache()).await.unwrap();
    assert!(!fresh.cached);
    assert_eq!(engine.statistics().cache_entries, 1);
}

#[tokio::test(start_paused = true)]
async fn test_cached_result_expires_after_ttl() {
    let config = MatchingConfig {
        cache_ttl: Duration::from_secs(300),
        ..Default::default()
    };
    let engine = engine(
        config,
        analyzer(ContextAnalysis::with_quality(0.9), 2),
        matcher(vec![security_match()]),
    );
    let context = json!({"task": "x"});

    engine.match_patterns(&context, &MatchOptions::default()).await.unwrap();
    tokio::time::advance(Duration::from_secs(120)).await;
    assert!(engine.match_patterns(&context, &MatchOptions::default()).await.unwrap().cached);

    tokio::time::advance(Duration::from_secs(181)).await;
    assert!(!engine.match_patterns(&context, &MatchOptions::default()).await.unwrap().cached);
}

#[tokio::test]
async fn test_overflow_evicts_first_inserted_context() {
    let config = MatchingConfig {
        cache_size: 3,
        ..Default::default()
    };
    // Four fresh contexts, then the evicted first one again
    let engine = engine(
        config,
        analyzer(ContextAnalysis::with_quality(0.9), 5),
        matcher(vec![security_match()]),
    );
    let contexts: Vec<RawContext> = (0..4).map(|i| json!({"task": i})).collect();

    for context in &contexts {
        engine.match_patterns(context, &MatchOptions::default()).await.unwrap();
    }
    assert_eq!(engine.statistics().cache_evictions, 1);

    // Reads do not refresh position
    for context in &contexts[1..] {
        assert!(engine.match_patterns(context, &MatchOptions::default()).await.unwrap().cached);
    }

    let refetched = engine
        .match_patterns(&contexts[0], &MatchOptions::default())
        .await
        .unwrap();
    assert!(!refetched.cached);

    let stats = engine.statistics();
    assert_eq!(stats.cache_entries, 3);
    assert_eq!(stats.cache_evictions, 2);
}

#[tokio::test]
async fn test_analysis_failure_aborts_request() {
    let mut analyzer = MockContextAnalyzer::new();
    analyzer
        .expect_analyze_context()
        .times(2)
        .returning(|_, _| Err(ArbiterError::analysis("feature extraction failed")));
    let mut matcher = MockContextMatcher::new();
    matcher.expect_match_context_with_patterns().never();

    let engine = engine(MatchingConfig::default(), analyzer, matcher);
    let mut rx = engine.subscribe();

    let err = engine
        .match_patterns(&json!({"task": "x"}), &MatchOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err, ArbiterError::analysis("feature extraction failed"));
    assert!(engine.active_matches().is_empty());

    let kinds: Vec<&str> = events::drain(&mut rx).iter().map(Event::event_type).collect();
    assert_eq!(kinds, vec!["context_analysis_failed", "pattern_matching_failed"]);

    // Failures are never cached
    assert!(
        engine
            .match_patterns(&json!({"task": "x"}), &MatchOptions::default())
            .await
            .is_err()
    );
    let stats = engine.statistics();
    assert_eq!(stats.failures, 2);
    assert_eq!(stats.cache_entries, 0);
}

#[tokio::test]
async fn test_matching_failure_aborts_request() {
    let mut matcher = MockContextMatcher::new();
    matcher
        .expect_match_context_with_patterns()
        .times(1)
        .returning(|_, _| Err(ArbiterError::matching("pattern index unavailable")));

    let engine = engine(
        MatchingConfig::default(),
        analyzer(ContextAnalysis::with_quality(0.9), 1),
        matcher,
    );
    let mut rx = engine.subscribe();

    let err = engine
        .match_patterns(&json!({"task": "x"}), &MatchOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ArbiterError::Matching { .. }));
    assert!(engine.active_matches().is_empty());

    let kinds: Vec<&str> = events::drain(&mut rx).iter().map(Event::event_type).collect();
    assert_eq!(
        kinds,
        vec!["context_analyzed", "context_matching_failed", "pattern_matching_failed"]
    );
}

#[tokio::test]
async fn test_non_finite_matches_are_dropped() {
    let engine = engine(
        MatchingConfig::default(),
        analyzer(ContextAnalysis::with_quality(0.9), 1),
        matcher(vec![
            Match::new("nan", PatternType::Security, f64::NAN, 1.0),
            security_match(),
        ]),
    );

    let result = engine
        .match_patterns(&json!({}), &MatchOptions::default())
        .await
        .unwrap();
    assert_eq!(result.matches.len(), 1);
    assert!(result.recommendations.iter().all(|r| r.priority.is_finite()));
    assert!(result.decision.confidence.is_finite());
}

#[tokio::test]
async fn test_max_recommendations_override() {
    let matches: Vec<Match> = (0..6)
        .map(|i| Match::new(format!("p{i}").as_str(), PatternType::Quality, 0.7, 0.5))
        .collect();
    let engine = engine(
        MatchingConfig::default(),
        analyzer(ContextAnalysis::with_quality(0.9), 2),
        matcher(matches),
    );

    let default = engine
        .match_patterns(&json!({"n": 1}), &MatchOptions::default())
        .await
        .unwrap();
    assert_eq!(default.recommendations.len(), 5);

    let options = MatchOptions {
        max_recommendations: Some(2),
        ..Default::default()
    };
    let limited = engine.match_patterns(&json!({"n": 2}), &options).await.unwrap();
    assert_eq!(limited.recommendations.len(), 2);
}

#[tokio::test]
async fn test_clear_cache() {
    let engine = engine(
        MatchingConfig::default(),
        analyzer(ContextAnalysis::with_quality(0.9), 2),
        matcher(vec![]),
    );
    let mut rx = engine.subscribe();
    let context = json!({"task": "x"});

    engine.match_patterns(&context, &MatchOptions::default()).await.unwrap();
    assert_eq!(engine.clear_cache(), 1);
    assert!(
        events::drain(&mut rx)
            .contains(&Event::CacheCleared { entries: 1 })
    );

    let again = engine.match_patterns(&context, &MatchOptions::default()).await.unwrap();
    assert!(!again.cached);
}

/// Analyzer that waits for a signal before answering
struct GatedAnalyzer {
    gate: Arc<Notify>,
}

#[async_trait]
impl ContextAnalyzer for GatedAnalyzer {
    async fn analyze_context(
        &self,
        _context: &RawContext,
        _options: &serde_json::Value,
    ) -> ArbiterResult<ContextAnalysis> {
        self.gate.notified().await;
        Ok(ContextAnalysis::with_quality(0.9))
    }
}

#[tokio::test]
async fn test_active_matches_tracks_in_flight_requests() {
    let gate = Arc::new(Notify::new());
    let engine = Arc::new(engine(
        MatchingConfig::default(),
        GatedAnalyzer { gate: gate.clone() },
        matcher(vec![security_match()]),
    ));

    let task = {
        let engine = engine.clone();
        tokio::spawn(async move {
            engine
                .match_patterns(&json!({"task": "slow"}), &MatchOptions::default())
                .await
        })
    };

    let mut active = Vec::new();
    for _ in 0..100 {
        active = engine.active_matches();
        if !active.is_empty() {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].status, OperationStatus::Analyzing);
    assert_eq!(engine.statistics().active_operations, 1);

    gate.notify_one();
    let result = task.await.unwrap().unwrap();
    assert_eq!(result.operation_id, active[0].operation_id);
    assert!(engine.active_matches().is_empty());
}
