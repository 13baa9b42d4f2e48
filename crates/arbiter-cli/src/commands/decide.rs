//! Run the decision pipeline on a recorded fixture

use crate::console::{CliConsole, decision_label};
use crate::fixture::{DecisionFixture, FixtureAnalyzer, FixtureMatcher};
use anyhow::Result;
use arbiter_core::{ArbiterConfig, DecisionEngine, MatchOptions, MatchingResult};
use std::path::Path;
use std::sync::Arc;

pub async fn execute(
    config: ArbiterConfig,
    fixture_path: &Path,
    max_recommendations: Option<usize>,
    json: bool,
    verbose: bool,
) -> Result<()> {
    let fixture = DecisionFixture::load(fixture_path)?;
    tracing::debug!(
        fixture = %fixture_path.display(),
        matches = fixture.matches.len(),
        "loaded decision fixture"
    );

    let engine = DecisionEngine::new(
        config.matching,
        Arc::new(FixtureAnalyzer::new(fixture.analysis)),
        Arc::new(FixtureMatcher::new(fixture.matches)),
    );
    let options = MatchOptions {
        max_recommendations,
        ..Default::default()
    };
    let result = engine.match_patterns(&fixture.context, &options).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&CliConsole::new(verbose), &result);
    }
    Ok(())
}

fn print_result(console: &CliConsole, result: &MatchingResult) {
    let decision = &result.decision;

    console.print_header("Decision");
    console.field("Decision", decision_label(decision.decision_type));
    console.field("Confidence", format!("{:.2}", decision.confidence));
    console.field("Context quality", format!("{:.2}", result.analysis.quality.overall_score));
    console.field("Context risks", result.analysis.risks.len());
    console.field("Processing time", format!("{} ms", result.processing_time_ms));
    console.detail(&decision.reasoning);

    console.print_header("Recommendations");
    if result.recommendations.is_empty() {
        console.warn("No recommendations");
    }
    for rec in &result.recommendations {
        console.info(&format!(
            "#{} [{:>5.1}] {}",
            rec.rank, rec.priority, rec.action
        ));
        console.detail(&rec.rationale);
        console.detail(&format!(
            "complexity {:.2}, overall risk {:.2}",
            rec.implementation_complexity, rec.risk_assessment.overall
        ));
    }

    let risk = &decision.risk_assessment;
    console.print_header("Risk");
    console.field("Technical", format!("{:.2}", risk.technical));
    console.field("Business", format!("{:.2}", risk.business));
    console.field("Implementation", format!("{:.2}", risk.implementation));
    console.field("Overall", format!("{:.2}", risk.overall));

    let plan = &decision.implementation_plan;
    if !plan.steps.is_empty() {
        console.print_header("Implementation plan");
        console.field("Estimated effort", format!("{} h", plan.estimated_effort_hours));
        for (index, step) in plan.steps.iter().enumerate() {
            console.info(&format!("{}. {}", index + 1, step));
        }
    }
}
