//! Plain-text scenario table

use crate::models::scenario::SimulationResponse;

/// Render a simulation as a summary followed by one row per scenario
#[must_use]
pub fn format_simulation_report(response: &SimulationResponse) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Scenario Simulation ({}):\n\
         - Baseline: {:.3} stars\n\
         - Open gaps in targeted measures: {}\n\
         - Break-even closures: {}\n\
         - Optimal closure rate: {}\n\n",
        response.recommended_strategy,
        response.baseline_stars,
        response.total_gaps,
        response
            .break_even_closures
            .map_or_else(|| "n/a".to_string(), |gaps| gaps.to_string()),
        response
            .optimal_closure_rate
            .map_or_else(|| "n/a".to_string(), |rate| format!("{:.0}%", rate * 100.0)),
    ));

    output.push_str(
        "Closure | Stars | Gain  | Gaps    | Investment   | Revenue      | Net          | ROI      | Payback\n\
         --------|-------|-------|---------|--------------|--------------|--------------|----------|--------\n",
    );

    for scenario in &response.scenarios {
        let roi = scenario
            .roi
            .map_or_else(|| "n/a".to_string(), |roi| format!("{roi:.1}%"));
        let payback = scenario
            .payback_period_months
            .map_or_else(|| "n/a".to_string(), |months| format!("{months:.1} mo"));

        output.push_str(&format!(
            "{:>6.0}% | {:>5.2} | {:>+5.2} | {:>7} | {:>12.0} | {:>12.0} | {:>12.0} | {:>8} | {}\n",
            scenario.closure_rate * 100.0,
            scenario.projected_stars,
            scenario.star_improvement,
            scenario.gaps_to_close,
            scenario.investment_required,
            scenario.revenue_impact,
            scenario.net_value,
            roi,
            payback,
        ));
    }

    output
}
