//! Quality-bonus economics of a star improvement

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::models::scenario::BonusBreakEven;

/// CMS quality bonus payment rate of a portfolio rating
///
/// The rating is rounded down to the nearest half star and clamped to
/// [1.0, 5.0] before the lookup.
#[must_use]
pub fn quality_bonus_rate(stars: f64) -> f64 {
    let half_stars = (stars.clamp(1.0, 5.0) * 2.0).floor() as u8;
    match half_stars {
        10 => 0.05,
        9 => 0.045,
        8 => 0.035,
        7 => 0.025,
        6 => 0.0,
        5 => -0.01,
        4 => -0.02,
        3 => -0.03,
        _ => -0.05,
    }
}

/// Whether an intervention budget pays for itself through the quality bonus
///
/// Bonus payments are `quality_bonus_rate × config.total_plan_revenue`.
///
/// # Errors
/// Returns `InvalidInput` for a negative cost or a rating outside [1, 5]
pub fn bonus_break_even(
    intervention_cost: f64,
    current_stars: f64,
    target_stars: f64,
    config: &EngineConfig,
) -> Result<BonusBreakEven> {
    if !intervention_cost.is_finite() || intervention_cost < 0.0 {
        return Err(EngineError::invalid(format!(
            "intervention_cost must be a non-negative amount, got {intervention_cost}"
        )));
    }
    for (name, stars) in [("current", current_stars), ("target", target_stars)] {
        if !(1.0..=5.0).contains(&stars) {
            return Err(EngineError::invalid(format!(
                "{name} stars must be between 1.0 and 5.0, got {stars}"
            )));
        }
    }

    let current_bonus = quality_bonus_rate(current_stars) * config.total_plan_revenue;
    let target_bonus = quality_bonus_rate(target_stars) * config.total_plan_revenue;
    let bonus_improvement = target_bonus - current_bonus;
    let net_benefit = bonus_improvement - intervention_cost;

    Ok(BonusBreakEven {
        intervention_cost,
        current_bonus,
        target_bonus,
        bonus_improvement,
        net_benefit,
        roi_multiple: (intervention_cost > 0.0).then(|| bonus_improvement / intervention_cost),
        breaks_even: net_benefit > 0.0,
    })
}
