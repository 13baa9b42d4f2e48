//! Contracts for the external collaborators at the engine boundary
//!
//! The engine never extracts features, computes similarity or persists
//! patterns itself. It talks to these traits instead:
//!
//! - [`ContextAnalyzer`] turns a raw context into a [`ContextAnalysis`]
//! - [`ContextMatcher`] scores an analysis against the pattern corpus
//! - [`ConfidenceCalculator`] computes instantaneous and outcome-driven confidence
//! - [`PatternStore`] owns the patterns
//!
//! Retries, timeouts and circuit breaking belong to whoever implements or
//! wraps these traits.
//!
//! [`ContextAnalysis`]: crate::types::ContextAnalysis

mod analysis;
mod calculator;
mod heuristic;
mod store;

pub use analysis::{ContextAnalyzer, ContextMatcher};
pub use calculator::{ConfidenceCalculator, ConfidenceForecast, ConfidenceScore, OutcomeUpdate};
pub use heuristic::HeuristicConfidenceCalculator;
pub use store::{InMemoryPatternStore, PatternStore};

#[cfg(test)]
pub use analysis::{MockContextAnalyzer, MockContextMatcher};
#[cfg(test)]
pub use calculator::MockConfidenceCalculator;
#[cfg(test)]
pub use store::MockPatternStore;
