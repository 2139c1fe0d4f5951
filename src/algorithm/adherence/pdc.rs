//! Proportion of Days Covered for a single member
//!
//! Coverage is computed by merging the fills' supply intervals instead of
//! enumerating calendar days, so the cost grows with the number of fills
//! rather than with the days of supply dispensed.

use chrono::NaiveDate;
use log::debug;
use smallvec::SmallVec;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::models::pharmacy::{AdherenceRecord, MedicationClass, MedicationFill};

/// Half-open day range `[start, end)` measured in days from the first fill
pub type DayInterval = (i64, i64);

/// Compute the PDC of one member for one medication class
///
/// Returns `Ok(None)` when the member has fewer than `config.min_fills` fills
/// on or before `measurement_year_end`, since the treatment period cannot be
/// established.
///
/// # Arguments
/// * `fills` - The member's fills for the class, in any order
/// * `medication_class` - Class the fills belong to
/// * `measurement_year_end` - Last day of the measurement year
/// * `config` - Engine configuration (minimum fills, adherence threshold)
pub fn compute_pdc(
    fills: &[MedicationFill],
    medication_class: MedicationClass,
    measurement_year_end: NaiveDate,
    config: &EngineConfig,
) -> Result<Option<AdherenceRecord>> {
    let Some(first) = fills.first() else {
        return Ok(None);
    };
    let member_id = first.member_id.as_str();

    for fill in fills {
        if fill.member_id != member_id {
            return Err(EngineError::invalid(format!(
                "fills for members {member_id} and {} passed to a single PDC calculation",
                fill.member_id
            )));
        }
        if fill.days_supply == 0 {
            return Err(EngineError::invalid(format!(
                "fill {} for member {member_id} on {} has zero days supply",
                fill.ndc_code, fill.fill_date
            )));
        }
    }

    let mut in_year: Vec<&MedicationFill> = fills
        .iter()
        .filter(|fill| fill.fill_date <= measurement_year_end)
        .collect();

    if in_year.len() < config.min_fills {
        debug!(
            "Member {member_id}: {} fill(s) for {medication_class}, need {}",
            in_year.len(),
            config.min_fills
        );
        return Ok(None);
    }

    in_year.sort_by_key(|fill| fill.fill_date);
    let Some(first_fill_date) = in_year.first().map(|fill| fill.fill_date) else {
        return Ok(None);
    };

    let treatment_days = (measurement_year_end - first_fill_date).num_days() + 1;
    if treatment_days <= 0 {
        return Ok(None);
    }

    let intervals: SmallVec<[DayInterval; 16]> = in_year
        .iter()
        .map(|fill| {
            let start = (fill.fill_date - first_fill_date).num_days();
            (start, start + i64::from(fill.days_supply))
        })
        .collect();

    let days_covered = covered_days(&intervals, treatment_days);
    let pdc = round_to(days_covered as f64 / treatment_days as f64, 4);

    Ok(Some(AdherenceRecord {
        member_id: member_id.to_string(),
        medication_class,
        fill_count: in_year.len(),
        first_fill_date,
        treatment_days,
        days_covered,
        pdc,
        adherent: pdc >= config.adherence_threshold,
    }))
}

/// Count the distinct days in `[0, window_days)` covered by the intervals
///
/// Intervals may come in any order. Overlapping and adjacent intervals are
/// merged before their lengths are summed, so early refills never count a
/// day twice.
#[must_use]
pub fn covered_days(intervals: &[DayInterval], window_days: i64) -> i64 {
    let mut sorted: SmallVec<[DayInterval; 16]> = SmallVec::from_slice(intervals);
    sorted.sort_unstable();

    let mut merged: SmallVec<[DayInterval; 16]> = SmallVec::new();
    for &(start, end) in &sorted {
        let start = start.max(0);
        let end = end.min(window_days);
        if start >= end {
            continue;
        }

        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }

    merged.iter().map(|(start, end)| end - start).sum()
}

/// Round to a fixed number of decimals
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}
