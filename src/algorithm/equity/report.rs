//! Plain-text equity report

use crate::models::equity::EquityResult;

/// Render an equity assessment as text
///
/// The summary and the priority interventions are always included. With
/// `detailed`, every comparison is listed as a table row and each
/// intervention carries its recommended actions.
#[must_use]
pub fn format_equity_report(result: &EquityResult, detailed: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Health Equity Summary:\n\
         - Overall equity score: {:.1}\n\
         - Penalty tier: {} ({:+.2} stars, {:+.0} revenue)\n\
         - Measures evaluated: {}\n\
         - Comparisons: {} ({} without two valid groups)\n\
         - Disparities flagged: {} ({} severe)\n\n",
        result.overall_equity_score,
        result.penalty_tier,
        result.penalty_stars,
        result.financial_impact,
        result.measures_evaluated,
        result.comparisons,
        result.excluded_comparisons,
        result.measures_with_disparities,
        result.severe_disparities,
    ));

    if result.priority_interventions.is_empty() {
        output.push_str("No priority interventions.\n");
    } else {
        output.push_str("Priority Interventions:\n");
        for intervention in &result.priority_interventions {
            output.push_str(&format!(
                "{:>2}. {} / {} -> {}: {:.1}% vs {:.1}% (gap {:.1} pp, {}, weight {:.0})\n",
                intervention.rank,
                intervention.measure_code,
                intervention.stratification_variable,
                intervention.target_group,
                intervention.current_rate,
                intervention.goal_rate,
                intervention.gap_to_close,
                intervention.category,
                intervention.measure_weight,
            ));
            if detailed {
                for action in &intervention.recommended_actions {
                    output.push_str(&format!("      * {action}\n"));
                }
            }
        }
    }

    if detailed && !result.disparities.is_empty() {
        output.push_str(
            "\nMeasure  | Stratification              | Lowest           | Highest          | Gap (pp) | Category\n\
             ---------|-----------------------------|------------------|------------------|----------|----------\n",
        );
        for record in &result.disparities {
            let describe = |group: &Option<String>, rate: Option<f64>| match (group, rate) {
                (Some(group), Some(rate)) => format!("{} {rate:.1}%", truncate(group, 10)),
                _ => "-".to_string(),
            };
            output.push_str(&format!(
                "{:<8} | {:<27} | {:<16} | {:<16} | {:>8.1} | {}\n",
                record.measure_code.as_str(),
                record.stratification_variable.to_string(),
                describe(&record.lowest_group, record.lowest_rate),
                describe(&record.highest_group, record.highest_rate),
                record.disparity_magnitude,
                record.category,
            ));
        }
    }

    output
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
