//! Health equity and disparity analysis
//!
//! Measure compliance is stratified by demographic variables, the best and
//! worst valid groups are compared, and the comparisons roll up into a
//! weighted equity score with a penalty tier and ranked interventions.

pub mod disparity;
pub mod interventions;
pub mod report;
pub mod scoring;
pub mod stratify;

use crate::config::EngineConfig;
use crate::models::equity::{
    ComplianceRecord, DisparityRecord, MemberDemographics, StratificationVariable,
};
use crate::models::measure::MeasureCode;

pub use disparity::detect_disparity;
pub use interventions::{identify_priority_interventions, recommend_actions};
pub use report::format_equity_report;
pub use scoring::{equity_score, portfolio_equity};
pub use stratify::stratify;

/// Stratify and compare every measure × variable pair
///
/// Only measures that appear in `compliance_records` are analyzed. Records are
/// returned in measure order, then variable order.
#[must_use]
pub fn analyze_disparities(
    compliance_records: &[ComplianceRecord],
    demographics: &[MemberDemographics],
    config: &EngineConfig,
) -> Vec<DisparityRecord> {
    let mut measures: Vec<MeasureCode> = compliance_records.iter().map(|r| r.measure).collect();
    measures.sort_unstable();
    measures.dedup();

    measures
        .into_iter()
        .flat_map(|measure| {
            StratificationVariable::ALL.into_iter().map(move |variable| {
                let groups = stratify(compliance_records, demographics, measure, variable, config);
                detect_disparity(measure, variable, &groups, config)
            })
        })
        .collect()
}
