//! Shared data types exchanged with the external collaborators

pub mod context;
pub mod matching;
pub mod pattern;

pub use context::{ContextAnalysis, ContextQuality, ContextRisk, Insight, RawContext, RiskSeverity};
pub use matching::{Match, MatchFactors, MatchSet, PatternCharacteristics};
pub use pattern::{Pattern, PatternId, PatternType};
