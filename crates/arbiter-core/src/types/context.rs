//! Context analysis produced by the external analyzer

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw situational input describing the current task.
///
/// Opaque to the engine apart from being hashed into a cache key and handed
/// to the analyzer.
pub type RawContext = serde_json::Value;

/// Structured analysis of a raw context
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextAnalysis {
    pub quality: ContextQuality,
    #[serde(default)]
    pub risks: Vec<ContextRisk>,
    #[serde(default)]
    pub insights: Vec<Insight>,
}

impl ContextAnalysis {
    /// Create an analysis with the given overall quality score
    pub fn with_quality(overall_score: f64) -> Self {
        Self {
            quality: ContextQuality {
                overall_score,
                dimensions: BTreeMap::new(),
            },
            ..Default::default()
        }
    }

    /// Add a risk
    pub fn with_risk(mut self, risk: ContextRisk) -> Self {
        self.risks.push(risk);
        self
    }

    pub fn has_risks(&self) -> bool {
        !self.risks.is_empty()
    }
}

/// Context quality scores
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextQuality {
    /// Overall quality in [0, 1]
    pub overall_score: f64,
    /// Per-dimension scores reported by the analyzer
    #[serde(default)]
    pub dimensions: BTreeMap<String, f64>,
}

/// Severity of a context risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSeverity {
    Low,
    #[default]
    Medium,
    High,
}

/// A risk detected in the context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextRisk {
    pub description: String,
    #[serde(default)]
    pub severity: RiskSeverity,
}

impl ContextRisk {
    pub fn new(description: impl Into<String>, severity: RiskSeverity) -> Self {
        Self {
            description: description.into(),
            severity,
        }
    }
}

/// An insight surfaced by the analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub description: String,
    pub relevance: f64,
}
