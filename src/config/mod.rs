//! Configuration for the Star Rating engine.
//!
//! Every threshold and dollar value the engine uses lives in [`EngineConfig`],
//! which is passed explicitly into each computation.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Boundaries and star adjustments of the health-equity penalty tiers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyTierBoundaries {
    /// Overall equity score at or above which no penalty applies
    pub no_penalty_min: f64,
    /// Overall equity score at or above which the penalty is moderate
    pub moderate_min: f64,
    /// Star adjustment for the moderate tier
    pub moderate_adjustment: f64,
    /// Star adjustment for the severe tier
    pub severe_adjustment: f64,
    /// Annual revenue effect of the moderate tier
    pub moderate_financial_impact: f64,
    /// Annual revenue effect of the severe tier
    pub severe_financial_impact: f64,
}

impl Default for PenaltyTierBoundaries {
    fn default() -> Self {
        Self {
            no_penalty_min: 70.0,
            moderate_min: 50.0,
            moderate_adjustment: -0.25,
            severe_adjustment: -0.5,
            moderate_financial_impact: -6_000_000.0,
            severe_financial_impact: -12_000_000.0,
        }
    }
}

/// Configuration for the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum members in a demographic group for it to be compared
    pub min_group_size: usize,
    /// Gap (percentage points) above which a disparity is flagged
    pub disparity_threshold_pp: f64,
    /// PDC at or above which a member counts as adherent
    pub adherence_threshold: f64,
    /// Minimum pharmacy fills needed to establish a treatment period
    pub min_fills: usize,
    /// Dollar value of one 0.1-star increment per weighted measure
    pub value_per_tenth_star: f64,
    /// Equity penalty tier boundaries
    pub penalty_tiers: PenaltyTierBoundaries,
    /// Absolute bound of the HEI revenue factor (0.05 = ±5%)
    pub hei_factor_bound: f64,
    /// Revenue swing between the lowest and the highest HEI factor
    pub hei_revenue_at_risk: f64,
    /// Plan size the dollar values are calibrated against
    pub reference_plan_size: u64,
    /// Number of priority interventions to emit
    pub priority_top_n: usize,
    /// Total Medicare Advantage revenue used for quality-bonus estimates
    pub total_plan_revenue: f64,
    /// Show progress bars for population-sized batches
    pub show_progress: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_group_size: 30,
            disparity_threshold_pp: 10.0,
            adherence_threshold: 0.80,
            min_fills: 2,
            value_per_tenth_star: 50_000.0,
            penalty_tiers: PenaltyTierBoundaries::default(),
            hei_factor_bound: 0.05,
            hei_revenue_at_risk: 40_000_000.0,
            reference_plan_size: 100_000,
            priority_top_n: 10,
            total_plan_revenue: 100_000_000.0,
            show_progress: false,
        }
    }
}

impl EngineConfig {
    /// Load a configuration from a JSON file; missing keys take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        log::info!("Loaded engine configuration from {}", path.display());
        Ok(config)
    }

    /// Check that every option lies in its accepted range
    pub fn validate(&self) -> Result<()> {
        if self.min_group_size == 0 {
            return Err(EngineError::invalid("min_group_size must be at least 1"));
        }
        if self.min_fills == 0 {
            return Err(EngineError::invalid("min_fills must be at least 1"));
        }
        if !(self.disparity_threshold_pp.is_finite()
            && (0.0..=100.0).contains(&self.disparity_threshold_pp))
        {
            return Err(EngineError::invalid(format!(
                "disparity_threshold_pp must be between 0 and 100, got {}",
                self.disparity_threshold_pp
            )));
        }
        crate::error::ensure_unit_interval("adherence_threshold", self.adherence_threshold)?;

        if !(self.value_per_tenth_star.is_finite() && self.value_per_tenth_star > 0.0) {
            return Err(EngineError::invalid(
                "value_per_tenth_star must be a positive amount",
            ));
        }
        if self.reference_plan_size == 0 {
            return Err(EngineError::invalid("reference_plan_size must be positive"));
        }
        if !(self.hei_factor_bound > 0.0 && self.hei_factor_bound < 1.0) {
            return Err(EngineError::invalid(format!(
                "hei_factor_bound must lie in (0, 1), got {}",
                self.hei_factor_bound
            )));
        }
        if !(self.hei_revenue_at_risk.is_finite() && self.hei_revenue_at_risk >= 0.0) {
            return Err(EngineError::invalid(
                "hei_revenue_at_risk must be a non-negative amount",
            ));
        }
        if !(self.total_plan_revenue.is_finite() && self.total_plan_revenue >= 0.0) {
            return Err(EngineError::invalid(
                "total_plan_revenue must be a non-negative amount",
            ));
        }

        let tiers = &self.penalty_tiers;
        if !(0.0..=100.0).contains(&tiers.moderate_min)
            || !(0.0..=100.0).contains(&tiers.no_penalty_min)
            || tiers.moderate_min > tiers.no_penalty_min
        {
            return Err(EngineError::invalid(format!(
                "penalty tier boundaries must satisfy 0 <= moderate ({}) <= no penalty ({}) <= 100",
                tiers.moderate_min, tiers.no_penalty_min
            )));
        }
        if tiers.moderate_adjustment > 0.0 || tiers.severe_adjustment > 0.0 {
            return Err(EngineError::invalid(
                "penalty tier adjustments must not be positive",
            ));
        }
        if !(tiers.moderate_financial_impact <= 0.0 && tiers.severe_financial_impact <= 0.0) {
            return Err(EngineError::invalid(
                "penalty tier financial impacts must not be positive",
            ));
        }

        Ok(())
    }

    /// Scale factor of a plan relative to the reference plan size
    #[must_use]
    pub fn plan_size_scale(&self, plan_size: u64) -> f64 {
        plan_size as f64 / self.reference_plan_size as f64
    }
}

impl fmt::Display for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Engine Configuration:")?;
        writeln!(f, "  Minimum Group Size: {}", self.min_group_size)?;
        writeln!(f, "  Disparity Threshold: {:.1} pp", self.disparity_threshold_pp)?;
        writeln!(f, "  Adherence Threshold: {:.2}", self.adherence_threshold)?;
        writeln!(f, "  Minimum Fills: {}", self.min_fills)?;
        writeln!(f, "  Value per 0.1 Star: ${:.0}", self.value_per_tenth_star)?;
        writeln!(
            f,
            "  Penalty Tiers: none >= {}, moderate >= {} ({:+}), severe ({:+})",
            self.penalty_tiers.no_penalty_min,
            self.penalty_tiers.moderate_min,
            self.penalty_tiers.moderate_adjustment,
            self.penalty_tiers.severe_adjustment
        )?;
        writeln!(f, "  HEI Factor Bound: ±{:.1}%", self.hei_factor_bound * 100.0)?;
        writeln!(f, "  HEI Revenue at Risk: ${:.0}", self.hei_revenue_at_risk)?;
        writeln!(f, "  Reference Plan Size: {}", self.reference_plan_size)?;
        Ok(())
    }
}
