//! What-if gap-closure scenario records

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::measure::MeasureCode;

/// Intervention strategy deciding which measures a closure rate applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Triple-weighted measures only
    TripleWeighted,
    /// Measures introduced for MY2025 only
    #[serde(rename = "new_2025")]
    New2025,
    /// Measures sharing a clinical tier with another measure, where members carry several gaps
    MultiMeasure,
    /// Every measure
    Balanced,
}

impl Strategy {
    /// All strategies
    pub const ALL: [Self; 4] = [
        Self::TripleWeighted,
        Self::New2025,
        Self::MultiMeasure,
        Self::Balanced,
    ];

    /// Wire name of the strategy
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TripleWeighted => "triple_weighted",
            Self::New2025 => "new_2025",
            Self::MultiMeasure => "multi_measure",
            Self::Balanced => "balanced",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s.trim())
            .ok_or_else(|| {
                EngineError::invalid(format!(
                    "strategy must be one of triple_weighted, new_2025, multi_measure, balanced; got {s}"
                ))
            })
    }
}

/// Current performance of one measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineMeasure {
    /// Measure code
    pub code: MeasureCode,
    /// Current compliance rate in [0, 1]
    pub rate: f64,
    /// Eligible members; the plan size is assumed when unknown
    #[serde(default)]
    pub denominator: Option<u64>,
}

impl BaselineMeasure {
    /// Baseline with a known denominator
    #[must_use]
    pub const fn new(code: MeasureCode, rate: f64, denominator: u64) -> Self {
        Self {
            code,
            rate,
            denominator: Some(denominator),
        }
    }
}

/// Input of a what-if simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Current measure performance
    pub baseline: Vec<BaselineMeasure>,
    /// Closure rates to evaluate, each in [0, 1]
    pub closure_scenarios: Vec<f64>,
    /// Strategy selecting the targeted measures
    pub strategy: Strategy,
    /// Members in the plan
    pub plan_size: u64,
    /// Cost of closing one gap, dollars
    pub intervention_cost: f64,
}

/// Projection of one closure rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Share of open gaps closed in the targeted measures
    pub closure_rate: f64,
    /// Strategy used
    pub strategy: Strategy,
    /// Portfolio weighted average stars after closure
    pub projected_stars: f64,
    /// projected_stars − baseline_stars
    pub star_improvement: f64,
    /// Revenue effect of the star improvement
    pub revenue_impact: f64,
    /// Cost of closing the gaps
    pub investment_required: f64,
    /// revenue_impact − investment_required
    pub net_value: f64,
    /// Net value per invested dollar in percent, `None` without investment
    pub roi: Option<f64>,
    /// Gaps closed
    pub gaps_to_close: u64,
    /// Months of revenue needed to recover the investment, `None` without revenue
    pub payback_period_months: Option<f64>,
}

/// Result of a what-if simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    /// Portfolio weighted average stars before any closure
    pub baseline_stars: f64,
    /// Scenarios, ordered by closure rate
    pub scenarios: Vec<Scenario>,
    /// Strategy the scenarios were simulated with
    pub recommended_strategy: Strategy,
    /// Closure rate of the best-ROI scenario
    pub optimal_closure_rate: Option<f64>,
    /// Open gaps across the targeted measures
    pub total_gaps: u64,
    /// Smallest number of closed gaps whose net value is not negative
    pub break_even_closures: Option<u64>,
    /// Best-ROI scenario
    pub max_roi_scenario: Option<Scenario>,
}

/// Outcome of running every strategy on the same baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyComparison {
    /// One simulation per strategy, in `Strategy::ALL` order
    pub simulations: Vec<SimulationResponse>,
    /// Strategy whose best scenario has the highest ROI
    pub recommended_strategy: Option<Strategy>,
}

/// Quality-bonus economics of moving between two star levels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BonusBreakEven {
    /// Cost of the interventions
    pub intervention_cost: f64,
    /// Bonus payment at the current stars
    pub current_bonus: f64,
    /// Bonus payment at the target stars
    pub target_bonus: f64,
    /// target_bonus − current_bonus
    pub bonus_improvement: f64,
    /// bonus_improvement − intervention_cost
    pub net_benefit: f64,
    /// bonus_improvement / intervention_cost, `None` without cost
    pub roi_multiple: Option<f64>,
    /// Net benefit is positive
    pub breaks_even: bool,
}
