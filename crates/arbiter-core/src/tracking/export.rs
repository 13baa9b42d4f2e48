//! JSON and CSV export of tracking data

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::statistics;
use super::types::{AdaptationEvent, TrackingEntry, TrackingSummary};
use crate::error::ArbiterResult;
use crate::types::PatternId;

/// Fixed CSV header
pub const CSV_HEADER: &str = "timestamp,confidence_score,confidence_change,calculation_method";

/// Full JSON export document
#[derive(Debug, Serialize)]
pub struct TrackingExport<'a> {
    pub pattern_id: &'a PatternId,
    pub exported_at: DateTime<Utc>,
    pub summary: TrackingSummary,
    pub history: &'a [TrackingEntry],
    pub adaptation_events: &'a [AdaptationEvent],
}

/// Summarize a whole history
pub fn summarize(history: &[TrackingEntry], adaptations: &[AdaptationEvent]) -> TrackingSummary {
    let scores: Vec<f64> = history.iter().map(|e| e.confidence_score).collect();
    let range = statistics::range(&scores);

    TrackingSummary {
        total_points: history.len(),
        current_confidence: scores.last().copied(),
        average_confidence: statistics::mean(&scores),
        min_confidence: range.map(|r| r.min),
        max_confidence: range.map(|r| r.max),
        trend: statistics::trend(&scores),
        volatility: statistics::volatility(&scores),
        adaptation_count: adaptations.len(),
        first_tracked: history.first().map(|e| e.timestamp),
        last_tracked: history.last().map(|e| e.timestamp),
    }
}

pub fn to_json(
    pattern_id: &PatternId,
    history: &[TrackingEntry],
    adaptations: &[AdaptationEvent],
) -> ArbiterResult<String> {
    let export = TrackingExport {
        pattern_id,
        exported_at: Utc::now(),
        summary: summarize(history, adaptations),
        history,
        adaptation_events: adaptations,
    };
    Ok(serde_json::to_string_pretty(&export)?)
}

/// Flatten a history to CSV, one row per entry, oldest first
pub fn to_csv(history: &[TrackingEntry]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + history.len() * 64);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for entry in history {
        out.push_str(&format!(
            "{},{},{},{}\n",
            entry.timestamp.to_rfc3339(),
            entry.confidence_score,
            entry.confidence_change,
            csv_field(&entry.calculation_method)
        ));
    }
    out
}

/// Quote a field when it contains a separator, quote or newline
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
