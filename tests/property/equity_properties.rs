//! Property checks for disparity detection and equity scoring

use hedis_stars::EngineConfig;
use hedis_stars::algorithm::equity::{detect_disparity, equity_score, portfolio_equity};
use hedis_stars::models::{
    DisparityRecord, MeasureCode, MeasureRegistry, StratificationVariable, StratifiedGroup,
};
use proptest::prelude::*;

use crate::utils::group;

fn groups_from(specs: &[(f64, u64)]) -> Vec<StratifiedGroup> {
    specs
        .iter()
        .enumerate()
        .map(|(i, &(rate, size))| group(&format!("G{i:02}"), rate, size))
        .collect()
}

fn disparity_of(groups: &[StratifiedGroup]) -> DisparityRecord {
    detect_disparity(
        MeasureCode::Cbp,
        StratificationVariable::Language,
        groups,
        &EngineConfig::default(),
    )
}

proptest! {
    #[test]
    fn disparity_does_not_depend_on_group_order(
        specs in prop::collection::vec((0.0f64..=100.0, 1u64..200), 0..8),
        rotation in 0usize..8,
    ) {
        let groups = groups_from(&specs);
        let mut reversed = groups.clone();
        reversed.reverse();
        let mut rotated = groups.clone();
        if !rotated.is_empty() {
            let len = rotated.len();
            rotated.rotate_left(rotation % len);
        }

        let record = disparity_of(&groups);
        prop_assert_eq!(&record, &disparity_of(&reversed));
        prop_assert_eq!(&record, &disparity_of(&rotated));
        prop_assert!(record.disparity_magnitude >= 0.0);
    }

    #[test]
    fn equal_rates_have_no_disparity(
        rate in 0.0f64..=100.0,
        sizes in prop::collection::vec(30u64..500, 2..8),
    ) {
        let specs: Vec<(f64, u64)> = sizes.iter().map(|&size| (rate, size)).collect();
        let record = disparity_of(&groups_from(&specs));

        prop_assert_eq!(record.groups_compared, sizes.len());
        prop_assert_eq!(record.disparity_magnitude, 0.0);
        prop_assert!(!record.has_disparity);
        prop_assert_eq!(equity_score(&record), 100.0);
    }

    #[test]
    fn equity_score_is_clamped_and_monotonic(a in 0.0f64..=100.0, b in 0.0f64..=100.0) {
        let (small, large) = if a <= b { (a, b) } else { (b, a) };
        let score_of = |gap: f64| {
            equity_score(&disparity_of(&[group("A", 100.0, 50), group("B", 100.0 - gap, 50)]))
        };

        let high = score_of(small);
        let low = score_of(large);
        prop_assert!((0.0..=100.0).contains(&high));
        prop_assert!((0.0..=100.0).contains(&low));
        prop_assert!(low <= high);
    }

    #[test]
    fn penalty_never_rewards(gaps in prop::collection::vec(0.0f64..=60.0, 1..6)) {
        let config = EngineConfig::default();
        let records: Vec<_> = gaps
            .iter()
            .map(|&gap| disparity_of(&[group("A", 90.0, 50), group("B", 90.0 - gap, 50)]))
            .collect();
        let result = portfolio_equity(&records, &MeasureRegistry::standard(), &config).unwrap();

        prop_assert!((0.0..=100.0).contains(&result.overall_equity_score));
        prop_assert!(result.penalty_stars <= 0.0);
        prop_assert!(result.financial_impact <= 0.0);
        prop_assert_eq!(result.penalty_stars == 0.0, result.financial_impact == 0.0);
    }
}
