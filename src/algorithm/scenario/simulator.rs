//! What-if gap-closure simulation
//!
//! Each closure rate is projected independently onto the targeted measures,
//! re-rated through the star calculator, and priced against the intervention
//! cost. Scenarios are evaluated in parallel and reported in closure-rate
//! order.

use std::time::Instant;

use itertools::Itertools;
use log::{debug, info, warn};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::algorithm::scenario::break_even::break_even_closures;
use crate::algorithm::stars::{estimate_revenue_impact, measure_star};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result, ensure_unit_interval};
use crate::models::measure::{MeasureCode, MeasureRegistry, MeasureSpec};
use crate::models::scenario::{
    Scenario, SimulationRequest, SimulationResponse, Strategy, StrategyComparison,
};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// One baseline measure prepared for projection
#[derive(Debug, Clone)]
pub(crate) struct ProjectedMeasure<'a> {
    pub spec: &'a MeasureSpec,
    pub rate: f64,
    pub open_gaps: f64,
    pub targeted: bool,
}

/// Validated simulation inputs shared by every scenario
#[derive(Debug, Clone)]
pub(crate) struct Projection<'a> {
    pub measures: Vec<ProjectedMeasure<'a>>,
    pub strategy: Strategy,
    pub baseline_stars: f64,
    /// Open gaps summed over the targeted measures
    pub open_gaps: f64,
    pub intervention_cost: f64,
    pub plan_size_scale: f64,
    pub config: &'a EngineConfig,
}

impl<'a> Projection<'a> {
    fn new(
        request: &SimulationRequest,
        strategy: Strategy,
        registry: &'a MeasureRegistry,
        config: &'a EngineConfig,
    ) -> Result<Self> {
        validate_request(request)?;

        let specs = request
            .baseline
            .iter()
            .map(|b| registry.require(b.code))
            .collect::<Result<Vec<_>>>()?;
        let targeted = targeted_measures(&specs, strategy);

        let measures: Vec<ProjectedMeasure<'a>> = request
            .baseline
            .iter()
            .zip(specs)
            .map(|(baseline, spec)| {
                let is_targeted = targeted.contains(&spec.code);
                let denominator = baseline.denominator.unwrap_or(request.plan_size) as f64;
                ProjectedMeasure {
                    spec,
                    rate: baseline.rate,
                    open_gaps: if is_targeted {
                        denominator * (1.0 - baseline.rate)
                    } else {
                        0.0
                    },
                    targeted: is_targeted,
                }
            })
            .collect();

        if targeted.is_empty() {
            warn!("Strategy {strategy} targets none of the baseline measures");
        }

        let mut projection = Self {
            open_gaps: measures.iter().map(|m| m.open_gaps).sum(),
            measures,
            strategy,
            baseline_stars: 0.0,
            intervention_cost: request.intervention_cost,
            plan_size_scale: config.plan_size_scale(request.plan_size),
            config,
        };
        projection.baseline_stars = projection.stars_at(0.0)?;
        Ok(projection)
    }

    /// Open gaps across the targeted measures, whole gaps only
    pub fn total_gaps(&self) -> u64 {
        self.open_gaps.floor() as u64
    }

    /// Portfolio weighted average stars after closing `closure_rate` of the targeted gaps
    pub fn stars_at(&self, closure_rate: f64) -> Result<f64> {
        let mut points = 0.0;
        let mut weight = 0.0;
        for measure in &self.measures {
            let rate = if measure.targeted {
                project_rate(measure.rate, closure_rate)
            } else {
                measure.rate
            };
            let star = measure_star(rate, None, &measure.spec.cut_points)?;
            points += star * measure.spec.weight;
            weight += measure.spec.weight;
        }
        Ok(points / weight)
    }

    /// Price a closure rate with a given number of closed gaps
    pub fn scenario(&self, closure_rate: f64, gaps_to_close: u64) -> Result<Scenario> {
        let projected_stars = self.stars_at(closure_rate)?;
        let impact =
            estimate_revenue_impact(self.baseline_stars, projected_stars, 0.0, 0.0, self.config)?;
        let revenue_impact = impact.total_revenue_impact * self.plan_size_scale;
        let investment_required = gaps_to_close as f64 * self.intervention_cost;
        let net_value = revenue_impact - investment_required;

        Ok(Scenario {
            closure_rate,
            strategy: self.strategy,
            projected_stars,
            star_improvement: impact.star_improvement,
            revenue_impact,
            investment_required,
            net_value,
            roi: (investment_required > 0.0).then(|| net_value / investment_required * 100.0),
            gaps_to_close,
            payback_period_months: (revenue_impact > 0.0)
                .then(|| investment_required / (revenue_impact / 12.0)),
        })
    }

    /// Scenario of one closure rate, closing `floor(rate × open gaps)` gaps
    pub fn evaluate(&self, closure_rate: f64) -> Result<Scenario> {
        let gaps_to_close = (closure_rate * self.open_gaps).floor() as u64;
        self.scenario(closure_rate, gaps_to_close)
    }
}

/// Rate after closing a share of the open gaps, capped at 1
#[must_use]
pub fn project_rate(baseline_rate: f64, closure_rate: f64) -> f64 {
    (baseline_rate + closure_rate * (1.0 - baseline_rate)).min(1.0)
}

/// Measures a strategy applies closure to
///
/// Multi-measure targets every measure whose tier holds at least two of the
/// given measures, where members tend to carry comorbid gaps.
#[must_use]
pub fn targeted_measures(specs: &[&MeasureSpec], strategy: Strategy) -> FxHashSet<MeasureCode> {
    match strategy {
        Strategy::TripleWeighted => specs
            .iter()
            .filter(|spec| spec.is_triple_weighted())
            .map(|spec| spec.code)
            .collect(),
        Strategy::New2025 => specs
            .iter()
            .filter(|spec| spec.new_2025)
            .map(|spec| spec.code)
            .collect(),
        Strategy::MultiMeasure => {
            let mut per_tier: FxHashMap<u8, usize> = FxHashMap::default();
            for spec in specs {
                *per_tier.entry(spec.tier).or_default() += 1;
            }
            specs
                .iter()
                .filter(|spec| per_tier.get(&spec.tier).copied().unwrap_or(0) >= 2)
                .map(|spec| spec.code)
                .collect()
        }
        Strategy::Balanced => specs.iter().map(|spec| spec.code).collect(),
    }
}

fn validate_request(request: &SimulationRequest) -> Result<()> {
    if request.baseline.is_empty() {
        return Err(EngineError::insufficient("simulation", "no baseline measures"));
    }
    if request.closure_scenarios.is_empty() {
        return Err(EngineError::invalid("no closure scenarios to simulate"));
    }
    if request.plan_size == 0 {
        return Err(EngineError::invalid("plan_size must be positive"));
    }
    if !request.intervention_cost.is_finite() || request.intervention_cost < 0.0 {
        return Err(EngineError::invalid(format!(
            "intervention_cost must be a non-negative amount, got {}",
            request.intervention_cost
        )));
    }

    let mut seen = FxHashSet::default();
    for baseline in &request.baseline {
        ensure_unit_interval(&format!("{} baseline rate", baseline.code), baseline.rate)?;
        if !seen.insert(baseline.code) {
            return Err(EngineError::invalid(format!(
                "measure {} appears twice in the baseline",
                baseline.code
            )));
        }
    }
    for &rate in &request.closure_scenarios {
        ensure_unit_interval("closure rate", rate)?;
    }
    Ok(())
}

/// Closure rates sorted ascending with duplicates removed
fn closure_rates(request: &SimulationRequest) -> Vec<f64> {
    request
        .closure_scenarios
        .iter()
        .copied()
        .sorted_by(f64::total_cmp)
        .dedup()
        .collect()
}

/// Best-ROI scenario; equal ROI keeps the lower closure rate
fn max_roi(scenarios: &[Scenario]) -> Option<&Scenario> {
    scenarios
        .iter()
        .filter(|s| s.roi.is_some())
        .fold(None, |best: Option<&Scenario>, s| match best {
            Some(b) if b.roi >= s.roi => Some(b),
            _ => Some(s),
        })
}

fn simulate_with(
    request: &SimulationRequest,
    strategy: Strategy,
    registry: &MeasureRegistry,
    config: &EngineConfig,
) -> Result<SimulationResponse> {
    let projection = Projection::new(request, strategy, registry, config)?;

    let scenarios = closure_rates(request)
        .par_iter()
        .map(|&rate| projection.evaluate(rate))
        .collect::<Result<Vec<_>>>()?;

    let max_roi_scenario = max_roi(&scenarios).cloned();
    let break_even = break_even_closures(&projection)?;

    debug!(
        "{strategy}: baseline {:.3} stars, {} open gaps, break-even {:?}",
        projection.baseline_stars,
        projection.total_gaps(),
        break_even
    );

    Ok(SimulationResponse {
        baseline_stars: projection.baseline_stars,
        optimal_closure_rate: max_roi_scenario.as_ref().map(|s| s.closure_rate),
        total_gaps: projection.total_gaps(),
        break_even_closures: break_even,
        recommended_strategy: strategy,
        scenarios,
        max_roi_scenario,
    })
}

/// Simulate every closure rate of a request under its strategy
///
/// # Errors
/// * `InsufficientData` if the baseline is empty
/// * `InvalidInput` for out-of-range rates, unregistered or duplicate measures,
///   a zero plan size or a negative cost
pub fn simulate(
    request: &SimulationRequest,
    registry: &MeasureRegistry,
    config: &EngineConfig,
) -> Result<SimulationResponse> {
    let start = Instant::now();
    log_operation_start(
        "Simulating",
        &format!(
            "{} closure scenarios with strategy {}",
            request.closure_scenarios.len(),
            request.strategy
        ),
    );

    let response = simulate_with(request, request.strategy, registry, config)?;

    log_operation_complete("simulated scenarios", response.scenarios.len(), Some(start.elapsed()));
    Ok(response)
}

/// Run the request under every strategy and recommend the one with the best ROI
///
/// The request's own strategy is ignored. Strategies without a scenario of
/// defined ROI are never recommended; equal best ROI keeps the earlier
/// strategy in `Strategy::ALL` order.
///
/// # Errors
/// Same as [`simulate`]
pub fn compare_strategies(
    request: &SimulationRequest,
    registry: &MeasureRegistry,
    config: &EngineConfig,
) -> Result<StrategyComparison> {
    let simulations = Strategy::ALL
        .into_iter()
        .map(|strategy| simulate_with(request, strategy, registry, config))
        .collect::<Result<Vec<_>>>()?;

    let recommended_strategy = simulations
        .iter()
        .filter_map(|sim| {
            sim.max_roi_scenario
                .as_ref()
                .and_then(|s| s.roi)
                .map(|roi| (sim.recommended_strategy, roi))
        })
        .fold(None, |best: Option<(Strategy, f64)>, (strategy, roi)| match best {
            Some((_, best_roi)) if best_roi >= roi => best,
            _ => Some((strategy, roi)),
        })
        .map(|(strategy, _)| strategy);

    if let Some(strategy) = recommended_strategy {
        info!("Recommended strategy: {strategy}");
    }

    Ok(StrategyComparison {
        simulations,
        recommended_strategy,
    })
}
