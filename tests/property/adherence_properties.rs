//! Property checks for PDC coverage and adherence

use hedis_stars::EngineConfig;
use hedis_stars::algorithm::adherence::{compute_pdc, covered_days};
use hedis_stars::models::{MedicationClass, MedicationFill};
use proptest::prelude::*;

use crate::utils::{day, year_end};

/// Fills laid end to end with a gap before each one, starting on January 1st
fn back_to_back(schedule: &[(u32, i64)]) -> Vec<MedicationFill> {
    let mut offset = 0;
    schedule
        .iter()
        .map(|&(supply, gap)| {
            offset += gap;
            let fill = MedicationFill::new("M1", "00093-7214", day(offset), supply);
            offset += i64::from(supply);
            fill
        })
        .collect()
}

proptest! {
    #[test]
    fn coverage_without_overlap_is_the_supply_sum(
        schedule in prop::collection::vec((1u32..=30, 0i64..=10), 2..=8)
    ) {
        let mut schedule = schedule;
        // The first fill opens the treatment period
        schedule[0].1 = 0;
        let fills = back_to_back(&schedule);
        let supplied: i64 = schedule.iter().map(|&(supply, _)| i64::from(supply)).sum();

        let record = compute_pdc(&fills, MedicationClass::Statins, year_end(), &EngineConfig::default())
            .unwrap()
            .unwrap();
        prop_assert_eq!(record.treatment_days, 365);
        prop_assert_eq!(record.days_covered, supplied);
    }

    #[test]
    fn coverage_ignores_interval_order(
        intervals in prop::collection::vec((0i64..200, 1i64..60), 0..12),
        window in 1i64..250,
    ) {
        let intervals: Vec<(i64, i64)> =
            intervals.iter().map(|&(start, length)| (start, start + length)).collect();
        let mut reversed = intervals.clone();
        reversed.reverse();

        let covered = covered_days(&intervals, window);
        prop_assert_eq!(covered, covered_days(&reversed, window));
        prop_assert!(covered >= 0 && covered <= window);
        let supplied: i64 = intervals.iter().map(|&(start, end)| end - start).sum();
        prop_assert!(covered <= supplied);
    }

    #[test]
    fn pdc_is_bounded_and_decides_adherence(
        schedule in prop::collection::vec((0i64..400, 1u32..=120), 1..10),
        threshold in 0.0f64..=1.0,
    ) {
        let config = EngineConfig {
            adherence_threshold: threshold,
            ..EngineConfig::default()
        };
        let fills: Vec<MedicationFill> = schedule
            .iter()
            .map(|&(offset, supply)| MedicationFill::new("M1", "00093-7214", day(offset), supply))
            .collect();

        if let Some(record) = compute_pdc(&fills, MedicationClass::Diabetes, year_end(), &config).unwrap() {
            prop_assert!((0.0..=1.0).contains(&record.pdc));
            prop_assert!(record.days_covered <= record.treatment_days);
            prop_assert!(record.fill_count >= config.min_fills);
            prop_assert_eq!(record.adherent, record.pdc >= threshold);
        }
    }
}
