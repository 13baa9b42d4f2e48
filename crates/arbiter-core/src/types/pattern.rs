//! Pattern references
//!
//! Patterns are owned by an external store. This crate only holds copies it
//! fetched through [`crate::collaborators::PatternStore`] and writes outcome
//! driven changes back through the same trait.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pattern identifier, a weak reference into the pattern store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternId(pub String);

impl PatternId {
    /// Create a new random pattern ID
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Create from string
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the ID string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PatternId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PatternId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PatternId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Category of a stored pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Security,
    Architecture,
    Performance,
    Quality,
    Testing,
    Documentation,
    #[default]
    General,
}

impl PatternType {
    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Security => "security",
            Self::Architecture => "architecture",
            Self::Performance => "performance",
            Self::Quality => "quality",
            Self::Testing => "testing",
            Self::Documentation => "documentation",
            Self::General => "general",
        }
    }
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A reusable fix or practice as seen by the decision engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: PatternId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pattern_type: PatternType,
    /// Current belief in the pattern's usefulness, in [0, 1]
    pub confidence_score: f64,
    /// Observed fraction of successful applications, in [0, 1]
    pub success_rate: f64,
    #[serde(default)]
    pub usage_count: u64,
    #[serde(default)]
    pub success_count: u64,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Pattern {
    /// Create a pattern with neutral statistics
    pub fn new(id: impl Into<PatternId>, name: impl Into<String>, pattern_type: PatternType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pattern_type,
            confidence_score: 0.5,
            success_rate: 0.5,
            usage_count: 0,
            success_count: 0,
            updated_at: Utc::now(),
        }
    }

    /// Set the stored confidence
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence_score = confidence;
        self
    }

    /// Set the stored success rate
    pub fn with_success_rate(mut self, success_rate: f64) -> Self {
        self.success_rate = success_rate;
        self
    }

    /// Record the outcome of one application and refresh the success rate.
    pub fn record_outcome(&mut self, success: bool) {
        self.usage_count += 1;
        if success {
            self.success_count += 1;
        }
        self.success_rate = self.success_count as f64 / self.usage_count as f64;
        self.updated_at = Utc::now();
    }
}
