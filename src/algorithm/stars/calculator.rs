//! Measure and portfolio Star Rating calculation

use std::collections::BTreeMap;

use log::{info, warn};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result, ensure_unit_interval};
use crate::models::measure::{CutPoints, MeasureRegistry, MeasureSpec};
use crate::models::performance::{
    MeasureInput, MeasurePerformance, PortfolioPerformance, RevenueImpact, StarTier,
};

/// Star of a measure rate against a benchmark table
///
/// Without a national percentile, the rate itself is used as the percentile
/// estimate.
///
/// # Errors
/// Returns `InvalidInput` if the rate or the percentile is outside [0, 1]
pub fn measure_star(rate: f64, percentile: Option<f64>, cut_points: &CutPoints) -> Result<f64> {
    ensure_unit_interval("rate", rate)?;
    let percentile = percentile.unwrap_or(rate);
    ensure_unit_interval("percentile", percentile)?;
    Ok(cut_points.star_for(percentile))
}

/// Dollar value of a measure's stars: every 0.1 star of every weight unit is worth
/// `config.value_per_tenth_star`
#[must_use]
pub fn estimate_measure_value(star_rating: f64, weight: f64, config: &EngineConfig) -> f64 {
    star_rating / 0.1 * weight * config.value_per_tenth_star
}

/// Score one measure
///
/// # Arguments
/// * `spec` - Measure specification (weight, cut-points)
/// * `numerator` - Compliant members
/// * `denominator` - Eligible members
/// * `percentile` - National percentile of the rate, if known
/// * `config` - Engine configuration
///
/// # Errors
/// * `InsufficientData` if the denominator is zero
/// * `InvalidInput` if the numerator exceeds the denominator or the percentile is out of range
pub fn calculate_measure_performance(
    spec: &MeasureSpec,
    numerator: u64,
    denominator: u64,
    percentile: Option<f64>,
    config: &EngineConfig,
) -> Result<MeasurePerformance> {
    if denominator == 0 {
        return Err(EngineError::insufficient(
            spec.code.as_str(),
            "denominator is zero",
        ));
    }
    if numerator > denominator {
        return Err(EngineError::invalid(format!(
            "{}: numerator {numerator} exceeds denominator {denominator}",
            spec.code
        )));
    }

    let rate = numerator as f64 / denominator as f64;
    let star_rating = measure_star(rate, percentile, &spec.cut_points)?;

    Ok(MeasurePerformance {
        measure_code: spec.code,
        measure_name: spec.name.clone(),
        tier: spec.tier,
        weight: spec.weight,
        numerator,
        denominator,
        rate,
        percentile: percentile.unwrap_or(rate),
        star_rating,
        points: star_rating * spec.weight,
        revenue_estimate: estimate_measure_value(star_rating, spec.weight, config),
    })
}

fn ensure_hei_factor(hei_factor: f64, config: &EngineConfig) -> Result<()> {
    if !hei_factor.is_finite() || hei_factor.abs() > config.hei_factor_bound {
        return Err(EngineError::invalid(format!(
            "hei_factor {hei_factor} is outside ±{}",
            config.hei_factor_bound
        )));
    }
    Ok(())
}

/// Aggregate scored measures into a portfolio rating and revenue
///
/// # Errors
/// * `InsufficientData` if no measure was scored
/// * `InvalidInput` if `hei_factor` is outside `±config.hei_factor_bound`
pub fn calculate_portfolio_performance(
    performances: Vec<MeasurePerformance>,
    hei_factor: f64,
    config: &EngineConfig,
) -> Result<PortfolioPerformance> {
    if performances.is_empty() {
        return Err(EngineError::insufficient("portfolio", "no scored measures"));
    }
    ensure_hei_factor(hei_factor, config)?;

    let total_points: f64 = performances.iter().map(|m| m.points).sum();
    let total_weight: f64 = performances.iter().map(|m| m.weight).sum();
    let weighted_average_stars = total_points / total_weight;

    // tier -> (points, weight)
    let mut tiers: BTreeMap<u8, (f64, f64)> = BTreeMap::new();
    for measure in &performances {
        let entry = tiers.entry(measure.tier).or_insert((0.0, 0.0));
        entry.0 += measure.points;
        entry.1 += measure.weight;
    }
    let tier_stars = tiers
        .into_iter()
        .map(|(tier, (points, weight))| (tier, points / weight))
        .collect();

    let base_revenue =
        weighted_average_stars * config.value_per_tenth_star * total_weight / 0.1;
    let total_revenue = base_revenue * (1.0 + hei_factor);

    Ok(PortfolioPerformance {
        measures: performances,
        total_points,
        total_weight,
        weighted_average_stars,
        tier_stars,
        star_tier: StarTier::from_stars(weighted_average_stars),
        hei_factor,
        base_revenue,
        total_revenue,
        excluded_measures: 0,
    })
}

/// Score a portfolio from raw measure counts
///
/// Measures without eligible members are skipped and counted in
/// `excluded_measures`; any other error aborts.
///
/// # Errors
/// * `InvalidInput` for unregistered measures, bad counts or an out-of-range HEI factor
/// * `InsufficientData` if every measure was skipped
pub fn score_portfolio(
    inputs: &[MeasureInput],
    registry: &MeasureRegistry,
    hei_factor: f64,
    config: &EngineConfig,
) -> Result<PortfolioPerformance> {
    let mut performances = Vec::with_capacity(inputs.len());
    let mut excluded_measures = 0;

    for input in inputs {
        let spec = registry.require(input.code)?;
        match calculate_measure_performance(
            spec,
            input.numerator,
            input.denominator,
            input.percentile,
            config,
        ) {
            Ok(performance) => performances.push(performance),
            Err(e) if e.is_insufficient_data() => {
                warn!("Skipping measure: {e}");
                excluded_measures += 1;
            }
            Err(e) => return Err(e),
        }
    }

    let mut portfolio = calculate_portfolio_performance(performances, hei_factor, config)?;
    portfolio.excluded_measures = excluded_measures;

    info!(
        "Portfolio rated {:.2} stars ({}) over {} measures",
        portfolio.weighted_average_stars,
        portfolio.star_tier,
        portfolio.measures.len()
    );

    Ok(portfolio)
}

/// Revenue effect of moving a portfolio between two ratings and two HEI factors,
/// at the reference plan size
///
/// The star part is worth `value_per_tenth_star` per 0.1 star. The HEI part
/// spreads `hei_revenue_at_risk` across the full factor range, so moving from
/// `-hei_factor_bound` to `+hei_factor_bound` is worth the whole amount.
///
/// # Errors
/// Returns `InvalidInput` if either HEI factor lies outside ±`hei_factor_bound`
pub fn estimate_revenue_impact(
    current_stars: f64,
    projected_stars: f64,
    hei_current: f64,
    hei_projected: f64,
    config: &EngineConfig,
) -> Result<RevenueImpact> {
    ensure_hei_factor(hei_current, config)?;
    ensure_hei_factor(hei_projected, config)?;

    let star_improvement = projected_stars - current_stars;
    let base_revenue_impact = star_improvement * config.value_per_tenth_star * 10.0;
    let hei_improvement = hei_projected - hei_current;
    let hei_revenue_impact =
        hei_improvement / (2.0 * config.hei_factor_bound) * config.hei_revenue_at_risk;

    Ok(RevenueImpact {
        star_improvement,
        base_revenue_impact,
        hei_improvement,
        hei_revenue_impact,
        total_revenue_impact: base_revenue_impact + hei_revenue_impact,
    })
}
