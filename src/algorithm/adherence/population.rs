//! Population-level adherence for one medication class
//!
//! Fills are grouped by member and each member's PDC is computed in
//! parallel. Members whose treatment period cannot be established are
//! excluded and counted rather than failing the batch.

use std::time::Instant;

use chrono::NaiveDate;
use itertools::Itertools;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::algorithm::adherence::pdc::compute_pdc;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::pharmacy::{AdherenceSummary, MedicationClass, MedicationFill};
use crate::utils::logging::{
    create_main_progress_bar, finish_progress_bar, log_exclusions, log_operation_complete,
    log_operation_start,
};

/// Group fills by member id, members ordered by id
#[must_use]
pub fn group_fills_by_member(fills: &[MedicationFill]) -> Vec<(&str, Vec<MedicationFill>)> {
    let mut by_member: FxHashMap<&str, Vec<MedicationFill>> = FxHashMap::default();
    for fill in fills {
        by_member
            .entry(fill.member_id.as_str())
            .or_default()
            .push(fill.clone());
    }

    by_member
        .into_iter()
        .sorted_unstable_by(|a, b| a.0.cmp(b.0))
        .collect()
}

/// Compute PDC for every member with fills of one medication class
///
/// # Arguments
/// * `fills` - Fills of all members, pre-filtered to the class's drug codes
/// * `medication_class` - Class the fills belong to
/// * `measurement_year_end` - Last day of the measurement year
/// * `config` - Engine configuration
///
/// # Returns
/// Evaluated members ordered by member id, plus the count of excluded members
pub fn compute_population_pdc(
    fills: &[MedicationFill],
    medication_class: MedicationClass,
    measurement_year_end: NaiveDate,
    config: &EngineConfig,
) -> Result<AdherenceSummary> {
    let start = Instant::now();
    log_operation_start(
        "Computing PDC from",
        &format!("{} {medication_class} fills", fills.len()),
    );

    let members = group_fills_by_member(fills);
    let pb = create_main_progress_bar(
        members.len() as u64,
        Some(&format!("PDC {medication_class}")),
        config.show_progress,
    );

    let outcomes = members
        .par_iter()
        .map(|(_, member_fills)| {
            let outcome = compute_pdc(member_fills, medication_class, measurement_year_end, config);
            pb.inc(1);
            outcome
        })
        .collect::<Result<Vec<_>>>()?;

    finish_progress_bar(&pb, Some("PDC complete"));

    let member_count = outcomes.len();
    let records: Vec<_> = outcomes.into_iter().flatten().collect();
    let excluded_members = member_count - records.len();

    log_exclusions(
        "members",
        excluded_members,
        &format!("fewer than {} {medication_class} fills", config.min_fills),
    );
    log_operation_complete("evaluated adherence for", records.len(), Some(start.elapsed()));

    Ok(AdherenceSummary {
        medication_class,
        records,
        excluded_members,
    })
}
