//! Confidence tracking data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::PatternId;

/// Options passed through to the confidence calculator when tracking
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackOptions {
    /// What triggered this data point (e.g. "manual", "outcome:success")
    #[serde(default)]
    pub source: Option<String>,
    /// Free-form calculator parameters
    #[serde(default)]
    pub parameters: serde_json::Value,
}

impl TrackOptions {
    pub fn with_source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            parameters: serde_json::Value::Null,
        }
    }

    /// Options for the data point recorded right after an outcome update
    pub fn outcome(trigger: OutcomeTrigger) -> Self {
        Self::with_source(format!("outcome:{}", trigger))
    }
}

/// One confidence data point for a pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingEntry {
    pub timestamp: DateTime<Utc>,
    pub pattern_id: PatternId,
    pub confidence_score: f64,
    pub factors: BTreeMap<String, f64>,
    pub calculation_method: String,
    /// Score of the previous entry, `None` for the first data point
    pub previous_confidence: Option<f64>,
    /// `confidence_score - previous_confidence`, 0 for the first data point
    pub confidence_change: f64,
    #[serde(default)]
    pub source: Option<String>,
}

/// What caused an adaptation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeTrigger {
    Success,
    Failure,
}

impl From<bool> for OutcomeTrigger {
    fn from(success: bool) -> Self {
        if success {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

impl std::fmt::Display for OutcomeTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// A recorded outcome-driven confidence change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptationEvent {
    pub timestamp: DateTime<Utc>,
    pub pattern_id: PatternId,
    pub trigger: OutcomeTrigger,
    pub previous_confidence: f64,
    pub new_confidence: f64,
    pub quality_impact: f64,
    #[serde(default)]
    pub factors: BTreeMap<String, f64>,
}

impl AdaptationEvent {
    pub fn confidence_change(&self) -> f64 {
        self.new_confidence - self.previous_confidence
    }
}

/// Directional movement of confidence over a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTrend {
    InsufficientData,
    StronglyDeclining,
    Declining,
    Stable,
    Improving,
    StronglyImproving,
}

impl ConfidenceTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InsufficientData => "insufficient_data",
            Self::StronglyDeclining => "strongly_declining",
            Self::Declining => "declining",
            Self::Stable => "stable",
            Self::Improving => "improving",
            Self::StronglyImproving => "strongly_improving",
        }
    }

    pub fn is_declining(&self) -> bool {
        matches!(self, Self::Declining | Self::StronglyDeclining)
    }

    pub fn is_improving(&self) -> bool {
        matches!(self, Self::Improving | Self::StronglyImproving)
    }
}

impl std::fmt::Display for ConfidenceTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for [`get_confidence_analytics`](super::ConfidenceTracker::get_confidence_analytics)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalyticsOptions {
    /// Only consider entries from the last `days` days instead of the
    /// default trailing window. A range holding no entries yields no
    /// analytics, same as an untracked pattern.
    pub days: Option<u32>,
}

impl AnalyticsOptions {
    pub fn last_days(days: u32) -> Self {
        Self { days: Some(days) }
    }
}

/// Lowest and highest confidence in a window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceRange {
    pub min: f64,
    pub max: f64,
}

/// Average contribution of one named factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorContribution {
    pub factor: String,
    pub average: f64,
}

/// Factors ranked by average contribution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorAnalysis {
    /// Strongest factors, strongest first
    pub top_factors: Vec<FactorContribution>,
    /// Weakest factors, weakest first
    pub weak_factors: Vec<FactorContribution>,
}

/// Windowed confidence analytics for one pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceAnalytics {
    pub pattern_id: PatternId,
    pub current_confidence: f64,
    pub trend: ConfidenceTrend,
    pub volatility: f64,
    pub average_confidence: f64,
    pub confidence_range: ConfidenceRange,
    pub adaptation_events: usize,
    pub total_tracking_points: usize,
    /// Entries the window statistics were computed from
    pub window_size: usize,
    pub factor_analysis: FactorAnalysis,
    pub recommendations: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// How much a forecast can be trusted, from the amount of history behind it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionReliability {
    Low,
    Medium,
    High,
}

impl PredictionReliability {
    /// `high` above 10 points, `medium` above 5, else `low`
    pub fn from_history_len(points: usize) -> Self {
        if points > 10 {
            Self::High
        } else if points > 5 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Annotated confidence forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidencePrediction {
    pub pattern_id: PatternId,
    pub current_confidence: f64,
    pub predictions: Vec<f64>,
    pub method: String,
    pub history_points: usize,
    pub reliability: PredictionReliability,
}

/// Export encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unsupported export format '{}'", other)),
        }
    }
}

/// Whole-history summary included in JSON exports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingSummary {
    pub total_points: usize,
    pub current_confidence: Option<f64>,
    pub average_confidence: f64,
    pub min_confidence: Option<f64>,
    pub max_confidence: Option<f64>,
    pub trend: ConfidenceTrend,
    pub volatility: f64,
    pub adaptation_count: usize,
    pub first_tracked: Option<DateTime<Utc>>,
    pub last_tracked: Option<DateTime<Utc>>,
}

/// Tracker-wide counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerStatistics {
    pub tracked_patterns: usize,
    pub total_entries: usize,
    pub total_adaptations: usize,
    pub cached_analytics: usize,
}
