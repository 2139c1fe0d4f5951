//! End-to-end evaluation of one plan snapshot
//!
//! The engine threads a single validated configuration through every
//! calculator: adherence feeds the PDC measures, claims counts supply the rest,
//! equity runs over every measure and demographic variable, and an optional
//! simulation request is evaluated last against the scored portfolio.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use chrono::NaiveDate;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::algorithm::adherence::compute_population_pdc;
use crate::algorithm::equity::{analyze_disparities, format_equity_report, portfolio_equity};
use crate::algorithm::scenario::{
    bonus_break_even, compare_strategies, format_simulation_report, simulate,
};
use crate::algorithm::stars::{
    calculate_hei_factor, calculate_measure_performance, format_portfolio_report, score_portfolio,
};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::equity::{ComplianceRecord, EquityResult, MemberDemographics};
use crate::models::measure::MeasureRegistry;
use crate::models::performance::{MeasureInput, MeasurePerformance, PortfolioPerformance};
use crate::models::pharmacy::{AdherenceSummary, MedicationClass, MedicationFill};
use crate::models::scenario::{
    BaselineMeasure, BonusBreakEven, SimulationRequest, SimulationResponse, StrategyComparison,
};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Everything known about a plan for one measurement year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSnapshot {
    /// Display name of the plan
    #[serde(default)]
    pub plan_name: String,
    /// Last day of the measurement year
    pub measurement_year_end: NaiveDate,
    /// Pharmacy fills per medication class
    #[serde(default)]
    pub pharmacy_fills: BTreeMap<MedicationClass, Vec<MedicationFill>>,
    /// Claims-based numerator/denominator counts
    #[serde(default)]
    pub measures: Vec<MeasureInput>,
    /// Per-member compliance flags for equity stratification
    #[serde(default)]
    pub compliance_records: Vec<ComplianceRecord>,
    /// Member demographics
    #[serde(default)]
    pub demographics: Vec<MemberDemographics>,
    /// HEI revenue factor; derived from `underserved_measures` when absent
    #[serde(default)]
    pub hei_factor: Option<f64>,
    /// Measure counts restricted to underserved members
    #[serde(default)]
    pub underserved_measures: Vec<MeasureInput>,
    /// What-if request; an empty baseline is filled from the scored portfolio
    #[serde(default)]
    pub simulation: Option<SimulationRequest>,
}

impl PlanSnapshot {
    /// Load a snapshot from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let snapshot = serde_json::from_str(&contents)?;
        info!("Loaded plan snapshot from {}", path.display());
        Ok(snapshot)
    }
}

/// Result of evaluating a plan snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioReport {
    /// Plan the report belongs to
    pub plan_name: String,
    /// Adherence per medication class
    pub adherence: Vec<AdherenceSummary>,
    /// Scored portfolio
    pub portfolio: PortfolioPerformance,
    /// Equity assessment
    pub equity: EquityResult,
    /// Weighted average stars with the equity penalty applied, floored at 1.0
    pub penalty_adjusted_stars: f64,
    /// Simulation of the snapshot's request
    pub simulation: Option<SimulationResponse>,
    /// Every strategy run on the same request
    pub strategy_comparison: Option<StrategyComparison>,
    /// Quality-bonus economics of the best-ROI scenario
    pub bonus: Option<BonusBreakEven>,
}

impl PortfolioReport {
    /// Render the portfolio, equity and scenario reports as one text
    #[must_use]
    pub fn to_text(&self, detailed: bool) -> String {
        let mut output = String::new();
        if !self.plan_name.is_empty() {
            output.push_str(&format!("Plan: {}\n\n", self.plan_name));
        }

        for summary in &self.adherence {
            output.push_str(&format!(
                "Adherence {}: {} of {} members adherent ({}), {} excluded\n",
                summary.medication_class,
                summary.numerator(),
                summary.denominator(),
                summary
                    .adherence_rate()
                    .map_or_else(|| "n/a".to_string(), |rate| format!("{:.1}%", rate * 100.0)),
                summary.excluded_members,
            ));
        }
        if !self.adherence.is_empty() {
            output.push('\n');
        }

        output.push_str(&format_portfolio_report(&self.portfolio));
        output.push_str(&format!(
            "Equity-adjusted rating: {:.2} stars\n\n",
            self.penalty_adjusted_stars
        ));
        output.push_str(&format_equity_report(&self.equity, detailed));

        if let Some(simulation) = &self.simulation {
            output.push('\n');
            output.push_str(&format_simulation_report(simulation));
        }
        if let Some(strategy) = self
            .strategy_comparison
            .as_ref()
            .and_then(|c| c.recommended_strategy)
        {
            output.push_str(&format!("\nRecommended strategy: {strategy}\n"));
        }
        if let Some(bonus) = &self.bonus {
            output.push_str(&format!(
                "Quality bonus: {:+.0} for {:.0} invested (net {:+.0})\n",
                bonus.bonus_improvement, bonus.intervention_cost, bonus.net_benefit
            ));
        }

        output
    }
}

/// Runs every calculator over a plan snapshot with one configuration
#[derive(Debug, Clone)]
pub struct PortfolioEngine {
    config: EngineConfig,
    registry: MeasureRegistry,
}

impl PortfolioEngine {
    /// Create an engine, validating the configuration once
    pub fn new(config: EngineConfig, registry: MeasureRegistry) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, registry })
    }

    /// The engine's configuration
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The engine's measure registry
    #[must_use]
    pub const fn registry(&self) -> &MeasureRegistry {
        &self.registry
    }

    /// Evaluate a snapshot
    ///
    /// # Errors
    /// Propagates `InvalidInput` from any calculator, and `InsufficientData`
    /// when no measure can be scored
    pub fn run(&self, snapshot: &PlanSnapshot) -> Result<PortfolioReport> {
        let start = Instant::now();
        log_operation_start("Evaluating plan", &snapshot.plan_name);

        let adherence = snapshot
            .pharmacy_fills
            .iter()
            .map(|(&class, fills)| {
                compute_population_pdc(fills, class, snapshot.measurement_year_end, &self.config)
            })
            .collect::<Result<Vec<_>>>()?;

        let inputs = merge_measure_inputs(&snapshot.measures, &adherence);
        let hei_factor = match snapshot.hei_factor {
            Some(factor) => factor,
            None => self.derive_hei_factor(&inputs, &snapshot.underserved_measures)?,
        };
        let portfolio = score_portfolio(&inputs, &self.registry, hei_factor, &self.config)?;

        let compliance = merge_compliance_records(&snapshot.compliance_records, &adherence);
        let disparities = analyze_disparities(&compliance, &snapshot.demographics, &self.config);
        let equity = portfolio_equity(&disparities, &self.registry, &self.config)?;
        let penalty_adjusted_stars =
            (portfolio.weighted_average_stars + equity.penalty_stars).max(1.0);

        let (simulation, strategy_comparison, bonus) = match &snapshot.simulation {
            Some(request) => {
                let request = with_portfolio_baseline(request, &portfolio);
                let response = simulate(&request, &self.registry, &self.config)?;
                let comparison = compare_strategies(&request, &self.registry, &self.config)?;
                let bonus = match &response.max_roi_scenario {
                    Some(best) => Some(bonus_break_even(
                        best.investment_required,
                        response.baseline_stars,
                        best.projected_stars,
                        &self.config,
                    )?),
                    None => None,
                };
                (Some(response), Some(comparison), bonus)
            }
            None => (None, None, None),
        };

        log_operation_complete("evaluated measures for", portfolio.measures.len(), Some(start.elapsed()));

        Ok(PortfolioReport {
            plan_name: snapshot.plan_name.clone(),
            adherence,
            portfolio,
            equity,
            penalty_adjusted_stars,
            simulation,
            strategy_comparison,
            bonus,
        })
    }

    fn derive_hei_factor(
        &self,
        overall: &[MeasureInput],
        underserved: &[MeasureInput],
    ) -> Result<f64> {
        if underserved.is_empty() {
            return Ok(0.0);
        }
        let overall = self.score_measures(overall)?;
        let underserved = self.score_measures(underserved)?;
        let factor = calculate_hei_factor(&overall, &underserved, &self.config);
        info!("Derived HEI factor {factor:+.3}");
        Ok(factor)
    }

    /// Score each input on its own, skipping measures without eligible members
    fn score_measures(&self, inputs: &[MeasureInput]) -> Result<Vec<MeasurePerformance>> {
        let mut performances = Vec::with_capacity(inputs.len());
        for input in inputs {
            let spec = self.registry.require(input.code)?;
            match calculate_measure_performance(
                spec,
                input.numerator,
                input.denominator,
                input.percentile,
                &self.config,
            ) {
                Ok(performance) => performances.push(performance),
                Err(e) if e.is_insufficient_data() => {}
                Err(e) => return Err(e),
            }
        }
        Ok(performances)
    }
}

/// Claims counts with the PDC measures replaced by computed adherence
fn merge_measure_inputs(claims: &[MeasureInput], adherence: &[AdherenceSummary]) -> Vec<MeasureInput> {
    let mut inputs: Vec<MeasureInput> = claims.to_vec();
    for summary in adherence {
        let code = summary.medication_class.measure();
        if let Some(existing) = inputs.iter_mut().find(|input| input.code == code) {
            warn!("{code}: claims counts replaced by computed adherence");
            *existing = MeasureInput::new(code, summary.numerator(), summary.denominator());
        } else {
            inputs.push(MeasureInput::new(code, summary.numerator(), summary.denominator()));
        }
    }
    inputs
}

/// Compliance records with adherence records added for PDC measures not already present
fn merge_compliance_records(
    records: &[ComplianceRecord],
    adherence: &[AdherenceSummary],
) -> Vec<ComplianceRecord> {
    let mut merged = records.to_vec();
    for summary in adherence {
        let code = summary.medication_class.measure();
        if !records.iter().any(|r| r.measure == code) {
            merged.extend(summary.compliance_records());
        }
    }
    merged
}

fn with_portfolio_baseline(
    request: &SimulationRequest,
    portfolio: &PortfolioPerformance,
) -> SimulationRequest {
    let mut request = request.clone();
    if request.baseline.is_empty() {
        request.baseline = portfolio
            .measures
            .iter()
            .map(|m| BaselineMeasure::new(m.measure_code, m.rate, m.denominator))
            .collect();
    }
    request
}
