//! Equity scores and the portfolio-level equity assessment

use std::collections::BTreeMap;

use log::{debug, info};

use crate::algorithm::equity::interventions::identify_priority_interventions;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::equity::{DisparityCategory, DisparityRecord, EquityResult, PenaltyTier};
use crate::models::measure::{MeasureCode, MeasureRegistry};

/// Equity score of one comparison: 100 minus two points per percentage point of disparity
#[must_use]
pub fn equity_score(disparity: &DisparityRecord) -> f64 {
    (100.0 - 2.0 * disparity.disparity_magnitude).clamp(0.0, 100.0)
}

/// Aggregate disparity records into a portfolio equity assessment
///
/// Comparisons without two valid groups are counted but do not score. A
/// measure's score is the mean over its scoring comparisons, and the overall
/// score weights each scored measure by its star weight. A portfolio with no
/// scoring comparison has nothing to penalize and scores 100.
///
/// # Arguments
/// * `disparities` - One record per measure × variable comparison
/// * `registry` - Measure registry (weights)
/// * `config` - Engine configuration (penalty tiers, intervention count)
///
/// # Errors
/// Returns `InvalidInput` if a record refers to an unregistered measure
pub fn portfolio_equity(
    disparities: &[DisparityRecord],
    registry: &MeasureRegistry,
    config: &EngineConfig,
) -> Result<EquityResult> {
    let mut by_measure: BTreeMap<MeasureCode, Vec<f64>> = BTreeMap::new();
    for record in disparities.iter().filter(|r| r.has_valid_comparison()) {
        by_measure
            .entry(record.measure_code)
            .or_default()
            .push(equity_score(record));
    }

    let measure_scores: BTreeMap<MeasureCode, f64> = by_measure
        .into_iter()
        .map(|(code, scores)| (code, scores.iter().sum::<f64>() / scores.len() as f64))
        .collect();

    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for (&code, &score) in &measure_scores {
        let weight = registry.weight(code)?;
        weighted_sum += score * weight;
        total_weight += weight;
    }

    let overall_equity_score = if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        debug!("No comparison with two valid groups; equity score defaults to 100");
        100.0
    };

    let penalty_tier = PenaltyTier::from_score(overall_equity_score, config);
    let excluded_comparisons = disparities
        .iter()
        .filter(|r| !r.has_valid_comparison())
        .count();

    let priority_interventions =
        identify_priority_interventions(disparities, registry, config.priority_top_n)?;

    let result = EquityResult {
        measures_evaluated: measure_scores.len(),
        measure_scores,
        overall_equity_score,
        penalty_tier,
        penalty_stars: penalty_tier.star_adjustment(config),
        financial_impact: penalty_tier.financial_impact(config),
        comparisons: disparities.len(),
        excluded_comparisons,
        measures_with_disparities: disparities.iter().filter(|r| r.has_disparity).count(),
        severe_disparities: disparities
            .iter()
            .filter(|r| r.category == DisparityCategory::Severe)
            .count(),
        priority_interventions,
        disparities: disparities.to_vec(),
    };

    info!(
        "Equity score {:.1} ({}) across {} measures, {} disparities flagged",
        result.overall_equity_score,
        result.penalty_tier,
        result.measures_evaluated,
        result.measures_with_disparities
    );

    Ok(result)
}
