//! Decision pipeline data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ContextAnalysis, Match, PatternId, PatternType};

/// Kind of recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    /// Apply a matched pattern
    Pattern,
    /// Improve the context before deciding
    ContextImprovement,
    /// Address risks found in the context
    RiskMitigation,
}

impl RecommendationType {
    /// Whether this recommendation was derived from the context rather than a match
    pub fn is_context_derived(&self) -> bool {
        matches!(self, Self::ContextImprovement | Self::RiskMitigation)
    }
}

/// Estimated effect of following a recommendation, each in [0, 1]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpectedImpact {
    pub quality: f64,
    pub performance: f64,
    pub security: f64,
    pub maintainability: f64,
    pub development_speed: f64,
}

/// Risk components, each in [0, 1]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub technical: f64,
    pub business: f64,
    pub implementation: f64,
    pub overall: f64,
}

/// A ranked, enriched match (or context-derived item) ready for a decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// 1-based position after sorting by priority
    pub rank: usize,
    /// Priority in [0, 100]
    pub priority: f64,
    #[serde(rename = "type")]
    pub recommendation_type: RecommendationType,
    #[serde(default)]
    pub pattern_id: Option<PatternId>,
    #[serde(default)]
    pub pattern_type: Option<PatternType>,
    pub action: String,
    pub rationale: String,
    pub confidence_score: f64,
    pub relevance_score: f64,
    pub expected_impact: ExpectedImpact,
    pub implementation_complexity: f64,
    pub risk_assessment: RiskAssessment,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub success_criteria: Vec<String>,
}

/// Final classification of a matching request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionType {
    NoAction,
    ApplyPattern,
    ReviewPattern,
    GatherMoreContext,
}

impl DecisionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoAction => "no_action",
            Self::ApplyPattern => "apply_pattern",
            Self::ReviewPattern => "review_pattern",
            Self::GatherMoreContext => "gather_more_context",
        }
    }
}

impl std::fmt::Display for DecisionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Steps for carrying out a decision
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImplementationPlan {
    pub steps: Vec<String>,
    pub estimated_effort_hours: u32,
    pub dependencies: Vec<String>,
    pub success_criteria: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub decision_type: DecisionType,
    /// Decision confidence in [0, 1]
    pub confidence: f64,
    pub recommended_patterns: Vec<Recommendation>,
    pub risk_assessment: RiskAssessment,
    pub implementation_plan: ImplementationPlan,
    pub reasoning: String,
}

/// Output of one `match_patterns` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingResult {
    pub operation_id: String,
    pub analysis: ContextAnalysis,
    pub matches: Vec<Match>,
    pub recommendations: Vec<Recommendation>,
    pub decision: Decision,
    pub processing_time_ms: u64,
    /// Served from the result cache
    pub cached: bool,
    pub timestamp: DateTime<Utc>,
}

/// Pipeline stage of an in-flight request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    Pending,
    Analyzing,
    Matching,
    Recommending,
    Deciding,
    Completed,
    Failed,
}

/// Snapshot of an in-flight request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveOperation {
    pub operation_id: String,
    pub status: OperationStatus,
    pub cache_key: String,
    pub started_at: DateTime<Utc>,
}

/// Per-request options for `match_patterns`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Overrides the configured number of matches turned into recommendations
    pub max_recommendations: Option<usize>,
    /// Bypass the cache lookup (the fresh result is still cached)
    pub skip_cache: bool,
    /// Passed through to the context analyzer
    pub analysis_options: serde_json::Value,
    /// Passed through to the context matcher
    pub matching_options: serde_json::Value,
}

impl MatchOptions {
    pub fn skip_cache() -> Self {
        Self {
            skip_cache: true,
            ..Default::default()
        }
    }
}

/// Counters maintained by the decision engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchingStatistics {
    pub total_requests: u64,
    pub completed: u64,
    pub failures: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_evictions: u64,
    pub cache_entries: usize,
    pub active_operations: usize,
    /// Mean processing time of completed, non-cached requests
    pub average_processing_ms: f64,
}

impl MatchingStatistics {
    pub fn cache_hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            0.0
        } else {
            self.cache_hits as f64 / lookups as f64
        }
    }
}
