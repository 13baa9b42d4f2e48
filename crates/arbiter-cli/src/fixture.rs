//! Recorded inputs for the CLI
//!
//! A decision fixture captures what the external analyzer and matcher
//! returned for one context, so the pipeline can be replayed offline.

use anyhow::{Context, Result};
use arbiter_core::error::ArbiterResult;
use arbiter_core::types::{ContextAnalysis, Match, MatchSet, Pattern, PatternId, RawContext};
use arbiter_core::{ContextAnalyzer, ContextMatcher};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;

/// One recorded decision request
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionFixture {
    pub context: RawContext,
    pub analysis: ContextAnalysis,
    #[serde(default)]
    pub matches: Vec<Match>,
}

/// One recorded pattern application
#[derive(Debug, Clone, Deserialize)]
pub struct OutcomeRecord {
    pub pattern_id: PatternId,
    pub success: bool,
    #[serde(default)]
    pub quality_impact: f64,
    #[serde(default)]
    pub context: RawContext,
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {what} file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {what} file {}", path.display()))
}

impl DecisionFixture {
    pub fn load(path: &Path) -> Result<Self> {
        read_json(path, "fixture")
    }
}

pub fn load_patterns(path: &Path) -> Result<Vec<Pattern>> {
    read_json(path, "patterns")
}

pub fn load_outcomes(path: &Path) -> Result<Vec<OutcomeRecord>> {
    read_json(path, "outcomes")
}

/// Analyzer that answers with a recorded analysis
pub struct FixtureAnalyzer {
    analysis: ContextAnalysis,
}

impl FixtureAnalyzer {
    pub fn new(analysis: ContextAnalysis) -> Self {
        Self { analysis }
    }
}

#[async_trait]
impl ContextAnalyzer for FixtureAnalyzer {
    async fn analyze_context(
        &self,
        _context: &RawContext,
        _options: &serde_json::Value,
    ) -> ArbiterResult<ContextAnalysis> {
        Ok(self.analysis.clone())
    }
}

/// Matcher that answers with recorded matches
pub struct FixtureMatcher {
    matches: Vec<Match>,
}

impl FixtureMatcher {
    pub fn new(matches: Vec<Match>) -> Self {
        Self { matches }
    }
}

#[async_trait]
impl ContextMatcher for FixtureMatcher {
    async fn match_context_with_patterns(
        &self,
        _analysis: &ContextAnalysis,
        _options: &serde_json::Value,
    ) -> ArbiterResult<MatchSet> {
        Ok(MatchSet {
            matches: self.matches.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_decision_fixture() {
        let file = write(
            r#"{
                "context": {"task": "add login"},
                "analysis": {
                    "quality": {"overall_score": 0.8},
                    "risks": [{"description": "plaintext passwords", "severity": "high"}]
                },
                "matches": [{
                    "pattern_id": "sec-1",
                    "pattern_type": "security",
                    "confidence_score": 0.9,
                    "relevance_score": 0.95,
                    "similarity_score": 0.9
                }]
            }"#,
        );

        let fixture = DecisionFixture::load(file.path()).unwrap();
        assert_eq!(fixture.analysis.quality.overall_score, 0.8);
        assert_eq!(fixture.analysis.risks.len(), 1);
        assert_eq!(fixture.matches[0].pattern_id.as_str(), "sec-1");
    }

    #[test]
    fn test_load_outcomes_defaults() {
        let file = write(r#"[{"pattern_id": "p1", "success": true}]"#);
        let outcomes = load_outcomes(file.path()).unwrap();

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].quality_impact, 0.0);
        assert!(outcomes[0].context.is_null());
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let file = write("not json");
        let err = load_patterns(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse patterns file"));
    }

    #[tokio::test]
    async fn test_fixture_collaborators_echo_recording() {
        let analyzer = FixtureAnalyzer::new(ContextAnalysis::with_quality(0.4));
        let analysis = analyzer
            .analyze_context(&serde_json::json!({}), &serde_json::Value::Null)
            .await
            .unwrap();
        assert_eq!(analysis.quality.overall_score, 0.4);

        let matcher = FixtureMatcher::new(vec![]);
        let set = matcher
            .match_context_with_patterns(&analysis, &serde_json::Value::Null)
            .await
            .unwrap();
        assert!(set.matches.is_empty());
    }
}
