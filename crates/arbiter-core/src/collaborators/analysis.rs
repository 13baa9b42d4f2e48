//! Context analysis and matching contracts

use crate::error::ArbiterResult;
use crate::types::{ContextAnalysis, MatchSet, RawContext};
use async_trait::async_trait;

/// Turns a raw context into a structured analysis
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContextAnalyzer: Send + Sync {
    async fn analyze_context(
        &self,
        context: &RawContext,
        options: &serde_json::Value,
    ) -> ArbiterResult<ContextAnalysis>;
}

/// Scores a context analysis against the pattern corpus
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContextMatcher: Send + Sync {
    async fn match_context_with_patterns(
        &self,
        analysis: &ContextAnalysis,
        options: &serde_json::Value,
    ) -> ArbiterResult<MatchSet>;
}
