//! Raw matches produced by the external matcher

use serde::{Deserialize, Serialize};

use super::pattern::{PatternId, PatternType};

/// Matcher output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchSet {
    pub matches: Vec<Match>,
}

/// A scored pairing of a context with a stored pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub pattern_id: PatternId,
    #[serde(default)]
    pub pattern_name: String,
    #[serde(default)]
    pub pattern_type: PatternType,
    pub confidence_score: f64,
    pub relevance_score: f64,
    pub similarity_score: f64,
    #[serde(default)]
    pub match_factors: MatchFactors,
    #[serde(default)]
    pub pattern_characteristics: PatternCharacteristics,
}

impl Match {
    /// Create a match with neutral factors and characteristics
    pub fn new(
        pattern_id: impl Into<PatternId>,
        pattern_type: PatternType,
        confidence_score: f64,
        relevance_score: f64,
    ) -> Self {
        Self {
            pattern_id: pattern_id.into(),
            pattern_name: String::new(),
            pattern_type,
            confidence_score,
            relevance_score,
            similarity_score: relevance_score,
            match_factors: MatchFactors::default(),
            pattern_characteristics: PatternCharacteristics::default(),
        }
    }

    /// Set pattern characteristics
    pub fn with_characteristics(mut self, complexity: f64, risk_level: f64) -> Self {
        self.pattern_characteristics = PatternCharacteristics {
            complexity,
            risk_level,
        };
        self
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.pattern_name = name.into();
        self
    }

    /// Whether every score the engine computes with is a finite number
    pub fn is_finite(&self) -> bool {
        [
            self.confidence_score,
            self.relevance_score,
            self.similarity_score,
            self.pattern_characteristics.complexity,
            self.pattern_characteristics.risk_level,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Why a pattern matched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchFactors {
    pub technology_match: f64,
    pub context_completeness: f64,
    pub pattern_maturity: f64,
}

/// Intrinsic pattern properties, each in [0, 1]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternCharacteristics {
    pub complexity: f64,
    pub risk_level: f64,
}
