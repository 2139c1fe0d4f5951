//! Ranking of disparities into targeted interventions

use crate::error::Result;
use crate::models::equity::{DisparityRecord, PriorityIntervention, StratificationVariable};
use crate::models::measure::{MeasureCode, MeasureRegistry};

/// Rank flagged disparities and attach recommended actions
///
/// Only records with `has_disparity` qualify. They are ordered by
/// `magnitude × measure weight`, largest first; equal keys fall back to
/// measure code and then stratification variable. The lowest-performing group
/// is the target and the highest-performing group's rate is the goal.
///
/// # Errors
/// Returns `InvalidInput` if a flagged record refers to an unregistered measure
pub fn identify_priority_interventions(
    disparities: &[DisparityRecord],
    registry: &MeasureRegistry,
    top_n: usize,
) -> Result<Vec<PriorityIntervention>> {
    let mut flagged = Vec::new();
    for record in disparities.iter().filter(|r| r.has_disparity) {
        let weight = registry.weight(record.measure_code)?;
        flagged.push((record, weight));
    }

    flagged.sort_by(|(a, wa), (b, wb)| {
        (b.disparity_magnitude * wb)
            .total_cmp(&(a.disparity_magnitude * wa))
            .then_with(|| a.measure_code.cmp(&b.measure_code))
            .then_with(|| a.stratification_variable.cmp(&b.stratification_variable))
    });

    let interventions = flagged
        .into_iter()
        .filter_map(|(record, weight)| {
            let target_group = record.lowest_group.clone()?;
            let current_rate = record.lowest_rate?;
            let goal_rate = record.highest_rate?;
            Some((record, weight, target_group, current_rate, goal_rate))
        })
        .take(top_n)
        .enumerate()
        .map(
            |(index, (record, weight, target_group, current_rate, goal_rate))| {
                let recommended_actions = recommend_actions(
                    record.measure_code,
                    record.stratification_variable,
                    &target_group,
                );
                PriorityIntervention {
                    rank: index + 1,
                    measure_code: record.measure_code,
                    stratification_variable: record.stratification_variable,
                    target_group,
                    current_rate,
                    goal_rate,
                    gap_to_close: record.disparity_magnitude,
                    category: record.category,
                    measure_weight: weight,
                    recommended_actions,
                }
            },
        )
        .collect();

    Ok(interventions)
}

/// Playbook actions for a target group, followed by the two general actions
#[must_use]
pub fn recommend_actions(
    measure: MeasureCode,
    variable: StratificationVariable,
    target_group: &str,
) -> Vec<String> {
    let mut actions = match variable {
        StratificationVariable::Language if target_group != "ENGLISH" => vec![
            format!("Develop {target_group} language materials for {measure}"),
            format!("Hire {target_group}-speaking care managers"),
            "Provide interpreter services for appointments".to_string(),
        ],
        StratificationVariable::LimitedEnglishProficiency if target_group == "LEP" => vec![
            format!("Develop plain-language and translated materials for {measure}"),
            "Assign bilingual care managers to LEP members".to_string(),
            "Provide interpreter services for appointments".to_string(),
        ],
        StratificationVariable::RaceEthnicity => vec![
            format!("Conduct cultural competency training for {target_group} population"),
            format!("Partner with {target_group} community organizations"),
            "Analyze provider network adequacy for this population".to_string(),
            "Review barriers to care specific to this group".to_string(),
        ],
        StratificationVariable::DualEligible | StratificationVariable::LowIncomeSubsidy => vec![
            "Provide transportation assistance".to_string(),
            "Offer telehealth options".to_string(),
            "Connect members to social services".to_string(),
            "Waive cost-sharing for preventive services".to_string(),
        ],
        _ => Vec::new(),
    };

    actions.push(format!("Target outreach to {target_group} members with gaps"));
    actions.push(format!("Monitor progress monthly for {measure}"));
    actions
}
