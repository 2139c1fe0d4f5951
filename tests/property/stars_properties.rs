//! Property checks for star assignment and portfolio aggregation

use hedis_stars::EngineConfig;
use hedis_stars::algorithm::stars::{
    calculate_measure_performance, calculate_portfolio_performance, measure_star,
};
use hedis_stars::models::{CutPoints, MeasureCode, MeasureRegistry};
use proptest::prelude::*;

proptest! {
    #[test]
    fn star_is_monotonic_in_percentile(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let table = CutPoints::cms_2025();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let low_star = measure_star(0.5, Some(low), &table).unwrap();
        let high_star = measure_star(0.5, Some(high), &table).unwrap();

        prop_assert!(low_star <= high_star);
        prop_assert!((1.0..=5.0).contains(&low_star));
        prop_assert!((1.0..=5.0).contains(&high_star));
    }

    #[test]
    fn weighted_average_is_points_over_weight(
        measures in prop::collection::vec((1u64..=5_000, 0.0f64..=1.0), 1..=MeasureCode::ALL.len()),
        hei_factor in -0.05f64..=0.05,
    ) {
        let config = EngineConfig::default();
        let registry = MeasureRegistry::standard();
        let performances: Vec<_> = MeasureCode::ALL
            .iter()
            .zip(&measures)
            .map(|(&code, &(denominator, rate))| {
                let numerator = (rate * denominator as f64).floor() as u64;
                let spec = registry.require(code).unwrap();
                calculate_measure_performance(spec, numerator, denominator, None, &config).unwrap()
            })
            .collect();

        let points: f64 = performances.iter().map(|m| m.star_rating * m.weight).sum();
        let weight: f64 = performances.iter().map(|m| m.weight).sum();
        let min = performances.iter().map(|m| m.star_rating).fold(f64::INFINITY, f64::min);
        let max = performances.iter().map(|m| m.star_rating).fold(0.0, f64::max);

        let portfolio = calculate_portfolio_performance(performances, hei_factor, &config).unwrap();
        prop_assert!((portfolio.weighted_average_stars - points / weight).abs() < 1e-9);
        prop_assert!(portfolio.weighted_average_stars >= min - 1e-9);
        prop_assert!(portfolio.weighted_average_stars <= max + 1e-9);
        let expected = portfolio.base_revenue * (1.0 + hei_factor);
        prop_assert!((portfolio.total_revenue - expected).abs() <= 1e-6 * expected.abs().max(1.0));
    }
}
