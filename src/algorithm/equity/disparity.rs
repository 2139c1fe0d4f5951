//! Disparity detection between the valid groups of one stratification

use crate::config::EngineConfig;
use crate::models::equity::{
    DisparityCategory, DisparityRecord, StratificationVariable, StratifiedGroup,
};
use crate::models::measure::MeasureCode;

/// Compare the best and worst valid groups of a stratification
///
/// Groups below the minimum size are ignored. With fewer than two valid
/// groups there is nothing to compare: the magnitude is zero and no disparity
/// is flagged. Equal rates resolve to the lexicographically first label, so the
/// result does not depend on the order of `groups`.
///
/// # Arguments
/// * `measure_code` - Measure the groups belong to
/// * `stratification_variable` - Variable the groups belong to
/// * `groups` - Stratified groups
/// * `config` - Engine configuration (disparity threshold)
#[must_use]
pub fn detect_disparity(
    measure_code: MeasureCode,
    stratification_variable: StratificationVariable,
    groups: &[StratifiedGroup],
    config: &EngineConfig,
) -> DisparityRecord {
    let valid: Vec<&StratifiedGroup> = groups.iter().filter(|g| g.is_valid).collect();

    if valid.len() < 2 {
        return no_comparison(measure_code, stratification_variable, valid.len());
    }

    // Equal rates resolve to the first label on both ends
    let highest = valid.iter().copied().max_by(|a, b| {
        a.compliance_rate
            .total_cmp(&b.compliance_rate)
            .then_with(|| b.group_label.cmp(&a.group_label))
    });
    let lowest = valid.iter().copied().min_by(|a, b| {
        a.compliance_rate
            .total_cmp(&b.compliance_rate)
            .then_with(|| a.group_label.cmp(&b.group_label))
    });

    let (Some(highest), Some(lowest)) = (highest, lowest) else {
        return no_comparison(measure_code, stratification_variable, valid.len());
    };

    let disparity_magnitude = (highest.compliance_rate - lowest.compliance_rate).max(0.0);

    DisparityRecord {
        measure_code,
        stratification_variable,
        highest_group: Some(highest.group_label.clone()),
        highest_rate: Some(highest.compliance_rate),
        lowest_group: Some(lowest.group_label.clone()),
        lowest_rate: Some(lowest.compliance_rate),
        disparity_magnitude,
        has_disparity: disparity_magnitude > config.disparity_threshold_pp,
        category: DisparityCategory::from_magnitude(disparity_magnitude),
        groups_compared: valid.len(),
    }
}

fn no_comparison(
    measure_code: MeasureCode,
    stratification_variable: StratificationVariable,
    groups_compared: usize,
) -> DisparityRecord {
    DisparityRecord {
        measure_code,
        stratification_variable,
        highest_group: None,
        highest_rate: None,
        lowest_group: None,
        lowest_rate: None,
        disparity_magnitude: 0.0,
        has_disparity: false,
        category: DisparityCategory::Minimal,
        groups_compared,
    }
}
