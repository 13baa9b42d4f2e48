//! Replay recorded outcomes through the confidence tracker

use crate::args::ReplayInput;
use crate::console::{CliConsole, trend_label};
use crate::fixture::{load_outcomes, load_patterns};
use anyhow::{Result, bail};
use arbiter_core::tracking::ExportFormat;
use arbiter_core::{
    AnalyticsOptions, ArbiterConfig, ArbiterError, ConfidenceTracker,
    HeuristicConfidenceCalculator, InMemoryPatternStore, PatternId,
};
use std::sync::Arc;

/// Tracker state after a replay
pub struct Replayed {
    pub tracker: ConfidenceTracker,
    pub store: Arc<InMemoryPatternStore>,
    pub applied: usize,
    pub skipped: usize,
}

/// Apply every recorded outcome in order.
///
/// Outcomes for unknown patterns are skipped with a warning; any other error
/// aborts the replay.
pub async fn replay_outcomes(config: &ArbiterConfig, input: &ReplayInput) -> Result<Replayed> {
    let patterns = load_patterns(&input.patterns)?;
    let outcomes = load_outcomes(&input.outcomes)?;

    let store = Arc::new(InMemoryPatternStore::from_patterns(patterns));
    let calculator = HeuristicConfidenceCalculator::new(
        config.tracker.min_confidence,
        config.tracker.max_confidence,
    );
    let tracker = ConfidenceTracker::new(config.tracker.clone(), Arc::new(calculator), store.clone());

    let (mut applied, mut skipped) = (0, 0);
    for outcome in &outcomes {
        match tracker
            .update_confidence_from_outcome(
                &outcome.pattern_id,
                outcome.success,
                outcome.quality_impact,
                &outcome.context,
            )
            .await
        {
            Ok(_) => applied += 1,
            Err(ArbiterError::PatternNotFound { pattern_id }) => {
                tracing::warn!(pattern_id = %pattern_id, "skipping outcome for unknown pattern");
                skipped += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }

    tracing::info!(applied, skipped, patterns = store.len(), "outcome replay finished");
    Ok(Replayed {
        tracker,
        store,
        applied,
        skipped,
    })
}

pub async fn execute(
    config: ArbiterConfig,
    input: &ReplayInput,
    export: Option<ExportFormat>,
    pattern: Option<&str>,
    verbose: bool,
) -> Result<()> {
    let replayed = replay_outcomes(&config, input).await?;

    if let Some(format) = export {
        let Some(pattern) = pattern else {
            bail!("--export needs --pattern");
        };
        let data = replayed
            .tracker
            .export_tracking_data(&PatternId::from(pattern), format)?;
        print!("{data}");
        return Ok(());
    }

    let console = CliConsole::new(verbose);
    console.print_header("Replay");
    console.field("Outcomes applied", replayed.applied);
    if replayed.skipped > 0 {
        console.warn(&format!("{} outcome(s) referenced unknown patterns", replayed.skipped));
    }

    for pattern in replayed.store.all() {
        console.print_header(&format!("{} ({})", pattern.id, pattern.pattern_type));
        if !pattern.name.is_empty() {
            console.field("Name", &pattern.name);
        }
        console.field("Confidence", format!("{:.3}", pattern.confidence_score));
        console.field(
            "Success rate",
            format!("{:.2} ({}/{})", pattern.success_rate, pattern.success_count, pattern.usage_count),
        );
        console.field("Adaptations", replayed.tracker.adaptation_history(&pattern.id).len());
        if let Some(analytics) = replayed
            .tracker
            .get_confidence_analytics(&pattern.id, &AnalyticsOptions::default())
        {
            console.field("Trend", trend_label(analytics.trend));
            console.field("Volatility", format!("{:.3}", analytics.volatility));
        }
    }

    let stats = replayed.tracker.statistics();
    console.detail(&format!(
        "{} tracked pattern(s), {} tracking entries",
        stats.tracked_patterns, stats.total_entries
    ));
    Ok(())
}
