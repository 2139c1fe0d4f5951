//! Tests for measure stars, portfolio aggregation and the HEI factor

use hedis_stars::algorithm::stars::{
    calculate_hei_factor, calculate_measure_performance, calculate_portfolio_performance,
    estimate_measure_value, measure_star, score_portfolio,
};
use hedis_stars::models::{
    CutPoint, CutPoints, MeasureCode, MeasureInput, MeasureRegistry, MeasureSpec, StarTier,
};
use hedis_stars::utils::{SyntheticPlanConfig, generate_plan_snapshot};
use hedis_stars::{EngineConfig, EngineError};

#[test]
fn test_star_is_monotonic_in_percentile() {
    let table = CutPoints::cms_2025();
    let mut previous = 0.0;
    for step in 0..=100 {
        let percentile = f64::from(step) / 100.0;
        let star = measure_star(0.5, Some(percentile), &table).unwrap();
        assert!(star >= previous);
        assert!((1.0..=5.0).contains(&star));
        assert_eq!((star * 2.0).fract(), 0.0);
        previous = star;
    }
    assert_eq!(previous, 5.0);
}

#[test]
fn test_custom_cut_points() {
    let table = CutPoints::new(vec![
        CutPoint::new(0.2, 2.0),
        CutPoint::new(0.5, 3.0),
        CutPoint::new(0.8, 5.0),
    ])
    .unwrap();
    let spec = MeasureSpec::new(MeasureCode::Col, "Colorectal Cancer Screening", 3, 1.0)
        .with_cut_points(table);
    let registry = MeasureRegistry::new([spec]).unwrap();

    let config = EngineConfig::default();
    let spec = registry.require(MeasureCode::Col).unwrap();
    assert_eq!(calculate_measure_performance(spec, 1, 10, None, &config).unwrap().star_rating, 1.0);
    assert_eq!(calculate_measure_performance(spec, 6, 10, None, &config).unwrap().star_rating, 3.0);
    assert_eq!(calculate_measure_performance(spec, 9, 10, None, &config).unwrap().star_rating, 5.0);
}

#[test]
fn test_invalid_cut_points_are_rejected() {
    let descending = CutPoints::new(vec![CutPoint::new(0.5, 3.0), CutPoint::new(0.4, 4.0)]);
    assert!(matches!(descending, Err(EngineError::InvalidInput(_))));

    let bad_star = CutPoints::new(vec![CutPoint::new(0.0, 1.0), CutPoint::new(0.5, 3.3)]);
    assert!(bad_star.is_err());

    let json = r#"[{"percentile": 0.9, "stars": 5.0}, {"percentile": 0.1, "stars": 2.0}]"#;
    assert!(serde_json::from_str::<CutPoints>(json).is_err());
}

#[test]
fn test_weighted_average_within_star_range() {
    let snapshot = generate_plan_snapshot(&SyntheticPlanConfig {
        members: 1_500,
        ..SyntheticPlanConfig::default()
    });
    let config = EngineConfig::default();
    let portfolio =
        score_portfolio(&snapshot.measures, &MeasureRegistry::standard(), 0.0, &config).unwrap();

    let min = portfolio.measures.iter().map(|m| m.star_rating).fold(f64::INFINITY, f64::min);
    let max = portfolio.measures.iter().map(|m| m.star_rating).fold(0.0, f64::max);
    assert!(portfolio.weighted_average_stars >= min - 1e-9);
    assert!(portfolio.weighted_average_stars <= max + 1e-9);
    assert_eq!(portfolio.star_tier, StarTier::from_stars(portfolio.weighted_average_stars));

    let values: f64 = portfolio
        .measures
        .iter()
        .map(|m| estimate_measure_value(m.star_rating, m.weight, &config))
        .sum();
    assert!((portfolio.base_revenue - values).abs() < 1e-3);
    assert_eq!(portfolio.total_revenue, portfolio.base_revenue);
}

#[test]
fn test_hei_factor_moves_total_revenue() {
    let config = EngineConfig::default();
    let registry = MeasureRegistry::standard();
    let inputs = vec![
        MeasureInput::new(MeasureCode::Gsd, 800, 1000),
        MeasureInput::new(MeasureCode::Cbp, 700, 1000),
    ];

    let neutral = score_portfolio(&inputs, &registry, 0.0, &config).unwrap();
    let bonus = score_portfolio(&inputs, &registry, 0.05, &config).unwrap();
    let penalty = score_portfolio(&inputs, &registry, -0.05, &config).unwrap();

    assert_eq!(neutral.weighted_average_stars, bonus.weighted_average_stars);
    let close = |a: f64, b: f64| (a - b).abs() <= 1e-9 * b.abs();
    assert!(close(bonus.total_revenue, neutral.total_revenue * 1.05));
    assert!(close(penalty.total_revenue, neutral.total_revenue * 0.95));
    assert!(score_portfolio(&inputs, &registry, 0.051, &config).is_err());
}

#[test]
fn test_hei_factor_from_underserved_performance() {
    let config = EngineConfig::default();
    let registry = MeasureRegistry::standard();
    let score = |code, numerator| {
        calculate_measure_performance(registry.require(code).unwrap(), numerator, 1000, None, &config)
            .unwrap()
    };

    let overall = vec![score(MeasureCode::Gsd, 800), score(MeasureCode::Bcs, 700)];
    let underserved = vec![score(MeasureCode::Bcs, 640), score(MeasureCode::Gsd, 720)];
    assert_eq!(calculate_hei_factor(&overall, &underserved, &config), -0.05);

    let narrow = EngineConfig {
        hei_factor_bound: 0.02,
        ..EngineConfig::default()
    };
    assert_eq!(calculate_hei_factor(&overall, &overall, &narrow), 0.02);
}

#[test]
fn test_portfolio_of_single_measure() {
    let config = EngineConfig::default();
    let spec = MeasureRegistry::standard().require(MeasureCode::Supd).unwrap().clone();
    let perf = calculate_measure_performance(&spec, 95, 100, None, &config).unwrap();
    let portfolio = calculate_portfolio_performance(vec![perf], 0.0, &config).unwrap();

    assert_eq!(portfolio.weighted_average_stars, 5.0);
    assert_eq!(portfolio.star_tier, StarTier::FiveStar);
    assert_eq!(portfolio.tier_stars.len(), 1);
}
