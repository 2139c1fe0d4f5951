//! Stratification of measure compliance by demographic group

use std::collections::BTreeMap;

use log::debug;
use rustc_hash::FxHashMap;

use crate::config::EngineConfig;
use crate::models::equity::{
    ComplianceRecord, MemberDemographics, StratificationVariable, StratifiedGroup,
};
use crate::models::measure::MeasureCode;

/// Compute compliance per demographic group for one measure and variable
///
/// Compliance records are joined to demographics by member id. Only members in
/// the measure's denominator are counted, so a group's size is its number of
/// eligible members. Groups below `config.min_group_size` are returned with
/// `is_valid = false`; they are reported but never compared.
///
/// # Arguments
/// * `compliance_records` - Per-member numerator/denominator flags (any measures)
/// * `demographics` - Member demographic profiles
/// * `measure_code` - Measure to stratify
/// * `stratify_by` - Demographic variable to group by
/// * `config` - Engine configuration
///
/// # Returns
/// Groups ordered by label
#[must_use]
pub fn stratify(
    compliance_records: &[ComplianceRecord],
    demographics: &[MemberDemographics],
    measure_code: MeasureCode,
    stratify_by: StratificationVariable,
    config: &EngineConfig,
) -> Vec<StratifiedGroup> {
    let labels: FxHashMap<&str, String> = demographics
        .iter()
        .filter_map(|member| {
            member
                .value_for(stratify_by)
                .map(|label| (member.member_id.as_str(), label))
        })
        .collect();

    // label -> (denominator, numerator)
    let mut counts: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    let mut unmatched = 0usize;

    for record in compliance_records
        .iter()
        .filter(|r| r.measure == measure_code && r.in_denominator)
    {
        let Some(label) = labels.get(record.member_id.as_str()) else {
            unmatched += 1;
            continue;
        };
        let entry = counts.entry(label.as_str()).or_insert((0, 0));
        entry.0 += 1;
        if record.in_numerator {
            entry.1 += 1;
        }
    }

    if unmatched > 0 {
        debug!(
            "{measure_code} by {stratify_by}: {unmatched} eligible members without a group label"
        );
    }

    counts
        .into_iter()
        .map(|(label, (denominator, numerator))| {
            let compliance_rate = if denominator > 0 {
                numerator as f64 / denominator as f64 * 100.0
            } else {
                0.0
            };

            StratifiedGroup {
                measure_code,
                stratification_variable: stratify_by,
                group_label: label.to_string(),
                denominator,
                numerator,
                compliance_rate,
                group_size: denominator,
                is_valid: denominator >= config.min_group_size as u64,
            }
        })
        .collect()
}
