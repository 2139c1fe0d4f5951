//! Health Equity Index revenue factor

use log::debug;
use rustc_hash::FxHashMap;

use crate::config::EngineConfig;
use crate::models::measure::MeasureCode;
use crate::models::performance::MeasurePerformance;

/// Mean rate gap below which the full HEI reward applies
pub const HEI_REWARD_GAP: f64 = 0.03;

/// Mean rate gap at or above which the HEI reduction applies
pub const HEI_REDUCTION_GAP: f64 = 0.05;

/// Derive the HEI revenue factor from overall and underserved performance
///
/// Measures are paired by code. The mean of `overall.rate − underserved.rate`
/// over the pairs decides the factor: below 3 points the plan earns
/// `+config.hei_factor_bound`, below 5 points it is neutral, otherwise it loses
/// `config.hei_factor_bound`. Without a single pair the factor is 0.
#[must_use]
pub fn calculate_hei_factor(
    overall: &[MeasurePerformance],
    underserved: &[MeasurePerformance],
    config: &EngineConfig,
) -> f64 {
    let underserved_rates: FxHashMap<MeasureCode, f64> = underserved
        .iter()
        .map(|m| (m.measure_code, m.rate))
        .collect();

    let gaps: Vec<f64> = overall
        .iter()
        .filter_map(|m| {
            underserved_rates
                .get(&m.measure_code)
                .map(|underserved_rate| m.rate - underserved_rate)
        })
        .collect();

    if gaps.is_empty() {
        return 0.0;
    }

    let mean_gap = gaps.iter().sum::<f64>() / gaps.len() as f64;
    debug!("HEI mean rate gap {mean_gap:.4} over {} measures", gaps.len());

    if mean_gap < HEI_REWARD_GAP {
        config.hei_factor_bound
    } else if mean_gap < HEI_REDUCTION_GAP {
        0.0
    } else {
        -config.hei_factor_bound
    }
}
