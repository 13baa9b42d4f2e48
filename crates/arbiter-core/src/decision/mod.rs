//! Pattern decision engine
//!
//! Converts a raw context into a single classified decision:
//!
//! 1. The [`ContextAnalyzer`](crate::collaborators::ContextAnalyzer) scores the context
//! 2. The [`ContextMatcher`](crate::collaborators::ContextMatcher) produces raw matches
//! 3. Matches become prioritized [`Recommendation`]s (see [`scoring`])
//! 4. The top pattern recommendations are classified into a [`Decision`]
//!
//! Complete results are cached per context content with insertion-order
//! eviction and a TTL.

mod cache;
mod decide;
mod engine;
mod recommend;
pub mod scoring;
mod types;

#[cfg(test)]
mod tests;

pub use cache::{CacheLookup, ResultCache, ResultCacheStats, cache_key};
pub use decide::{NO_ACTION_CONFIDENCE, classify, decision_confidence};
pub use engine::{DecisionEngine, SharedDecisionEngine};
pub use recommend::{CONTEXT_IMPROVEMENT_PRIORITY, RISK_MITIGATION_PRIORITY};
pub use types::{
    ActiveOperation, Decision, DecisionType, ExpectedImpact, ImplementationPlan, MatchOptions,
    MatchingResult, MatchingStatistics, OperationStatus, Recommendation, RecommendationType,
    RiskAssessment,
};
