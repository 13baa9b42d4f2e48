//! Confidence analytics and forecasts after a replay

use super::replay::replay_outcomes;
use crate::args::ReplayInput;
use crate::console::{CliConsole, trend_label};
use anyhow::Result;
use arbiter_core::{AnalyticsOptions, ArbiterConfig};

pub async fn execute(
    config: ArbiterConfig,
    input: &ReplayInput,
    days: Option<u32>,
    steps: usize,
    verbose: bool,
) -> Result<()> {
    let replayed = replay_outcomes(&config, input).await?;
    let options = AnalyticsOptions { days };
    let console = CliConsole::new(verbose);

    let tracked = replayed.tracker.tracked_patterns();
    if tracked.is_empty() {
        console.warn("No tracking data: no outcomes matched a known pattern");
        return Ok(());
    }

    for pattern_id in tracked {
        let Some(analytics) = replayed.tracker.get_confidence_analytics(&pattern_id, &options) else {
            continue;
        };

        console.print_header(pattern_id.as_str());
        console.field("Current confidence", format!("{:.3}", analytics.current_confidence));
        console.field("Average", format!("{:.3}", analytics.average_confidence));
        console.field(
            "Range",
            format!(
                "{:.3} .. {:.3}",
                analytics.confidence_range.min, analytics.confidence_range.max
            ),
        );
        console.field("Trend", trend_label(analytics.trend));
        console.field("Volatility", format!("{:.3}", analytics.volatility));
        console.field(
            "Window",
            format!("{} of {} points", analytics.window_size, analytics.total_tracking_points),
        );
        console.field("Adaptations", analytics.adaptation_events);
        for factor in &analytics.factor_analysis.top_factors {
            console.detail(&format!("top factor {} = {:.3}", factor.factor, factor.average));
        }
        for advice in &analytics.recommendations {
            console.info(advice);
        }

        let prediction = replayed
            .tracker
            .predict_future_confidence(&pattern_id, steps)
            .await?;
        let values: Vec<String> = prediction
            .predictions
            .iter()
            .map(|p| format!("{p:.3}"))
            .collect();
        console.field(
            "Forecast",
            format!("{} ({:?} reliability)", values.join(", "), prediction.reliability),
        );
    }
    Ok(())
}
