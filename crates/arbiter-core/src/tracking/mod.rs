//! Confidence tracking for patterns
//!
//! Keeps a bounded, oldest-evicted history of confidence data points and
//! outcome-driven adaptation events per pattern, and derives from them:
//!
//! - **Anomalies**: single-step confidence jumps above a threshold
//! - **Volatility**: spread of recent confidence deltas
//! - **Analytics**: windowed trend, range, factor ranking and advice (TTL cached)
//! - **Predictions**: calculator forecasts annotated with a reliability label
//! - **Exports**: JSON documents and flat CSV

mod analytics;
mod export;
mod history;
mod statistics;
mod tracker;
mod types;


pub use analytics::{DOMINANT_FACTOR, HIGH_CONFIDENCE, LOW_CONFIDENCE, MODERATE_CONFIDENCE};
pub use export::{CSV_HEADER, TrackingExport};
pub use history::BoundedHistory;
pub use statistics::{STABLE_CHANGE, STRONG_CHANGE, trend, volatility};
pub use tracker::{ConfidenceTracker, SharedConfidenceTracker};
pub use types::{
    AdaptationEvent, AnalyticsOptions, ConfidenceAnalytics, ConfidencePrediction, ConfidenceRange,
    ConfidenceTrend, ExportFormat, FactorAnalysis, FactorContribution, OutcomeTrigger,
    PredictionReliability, TrackOptions, TrackerStatistics, TrackingEntry, TrackingSummary,
};
