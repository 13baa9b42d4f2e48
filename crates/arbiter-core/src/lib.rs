//! Arbiter Core Library
//!
//! Confidence tracking and pattern decision engine. Given a situational
//! context, the [`DecisionEngine`] ranks reusable patterns and classifies a
//! single decision; the [`ConfidenceTracker`] keeps bounded per-pattern
//! confidence histories and feeds outcome-driven confidence back to the
//! pattern store.
//!
//! Feature extraction, similarity matching, confidence calculation and
//! pattern storage are external collaborators behind the traits in
//! [`collaborators`].

pub mod arbiter;
pub mod collaborators;
pub mod config;
pub mod decision;
pub mod error;
pub mod events;
pub mod tracking;
pub mod types;

// Re-export commonly used types
pub use arbiter::{Arbiter, Collaborators};
pub use collaborators::{
    ConfidenceCalculator, ContextAnalyzer, ContextMatcher, HeuristicConfidenceCalculator,
    InMemoryPatternStore, PatternStore,
};
pub use config::{ArbiterConfig, ConfigLoader, LoggingConfig, MatchingConfig, TrackerConfig};
pub use decision::{
    Decision, DecisionEngine, DecisionType, MatchOptions, MatchingResult, Recommendation,
};
pub use error::{ArbiterError, ArbiterResult};
pub use events::{Event, EventBus};
pub use tracking::{
    AnalyticsOptions, ConfidenceAnalytics, ConfidenceTracker, ExportFormat, TrackOptions,
};
pub use types::*;
