//! Tests for stratification, disparity detection and equity scoring

use hedis_stars::algorithm::equity::{
    analyze_disparities, detect_disparity, equity_score, portfolio_equity, stratify,
};
use hedis_stars::models::{
    DisparityCategory, MeasureCode, MeasureRegistry, PenaltyTier, StratificationVariable,
};
use hedis_stars::utils::{SyntheticPlanConfig, generate_plan_snapshot};
use hedis_stars::EngineConfig;

use crate::utils::{add_language_group, group};

#[test]
fn test_language_disparity_end_to_end() {
    let config = EngineConfig::default();
    let mut records = Vec::new();
    let mut demographics = Vec::new();
    add_language_group(&mut records, &mut demographics, MeasureCode::Cbp, "ENGLISH", 100, 80);
    add_language_group(&mut records, &mut demographics, MeasureCode::Cbp, "SPANISH", 50, 30);
    add_language_group(&mut records, &mut demographics, MeasureCode::Cbp, "CHINESE", 40, 28);
    add_language_group(&mut records, &mut demographics, MeasureCode::Cbp, "VIETNAMESE", 35, 28);
    // Too small to compare
    add_language_group(&mut records, &mut demographics, MeasureCode::Cbp, "KOREAN", 10, 1);

    let groups = stratify(
        &records,
        &demographics,
        MeasureCode::Cbp,
        StratificationVariable::Language,
        &config,
    );
    assert_eq!(groups.len(), 5);
    assert!(groups.iter().all(|g| g.denominator == g.group_size));

    let disparity = detect_disparity(
        MeasureCode::Cbp,
        StratificationVariable::Language,
        &groups,
        &config,
    );
    assert!((disparity.disparity_magnitude - 20.0).abs() < 1e-9);
    assert!(disparity.has_disparity);
    assert_eq!(disparity.lowest_group.as_deref(), Some("SPANISH"));
    assert_eq!(disparity.groups_compared, 4);
    assert!((equity_score(&disparity) - 60.0).abs() < 1e-9);

    let result = portfolio_equity(&[disparity], &MeasureRegistry::standard(), &config).unwrap();
    assert_eq!(result.penalty_tier, PenaltyTier::Moderate);
    assert_eq!(result.priority_interventions[0].target_group, "SPANISH");
}

#[test]
fn test_equity_score_decreases_with_magnitude() {
    let config = EngineConfig::default();
    let mut previous = f64::INFINITY;
    for gap in 0..=60 {
        let groups = vec![group("A", 90.0, 50), group("B", 90.0 - f64::from(gap), 50)];
        let record = detect_disparity(
            MeasureCode::Cbp,
            StratificationVariable::Language,
            &groups,
            &config,
        );
        let score = equity_score(&record);
        assert!((0.0..=100.0).contains(&score));
        assert!(score <= previous);
        previous = score;
    }
    assert_eq!(previous, 0.0);
}

#[test]
fn test_disparity_is_symmetric_in_group_order() {
    let config = EngineConfig::default();
    let groups = vec![
        group("DUAL", 58.0, 120),
        group("NON_DUAL", 74.0, 900),
        group("UNKNOWN", 40.0, 12),
    ];
    let mut reversed = groups.clone();
    reversed.reverse();

    let a = detect_disparity(MeasureCode::Cbp, StratificationVariable::Language, &groups, &config);
    let b = detect_disparity(MeasureCode::Cbp, StratificationVariable::Language, &reversed, &config);
    assert_eq!(a, b);
    assert_eq!(a.category, DisparityCategory::Moderate);
}

#[test]
fn test_min_group_size_is_configurable() {
    let config = EngineConfig {
        min_group_size: 5,
        ..EngineConfig::default()
    };
    let groups = vec![group("A", 90.0, 6), group("B", 60.0, 6)];
    let record = detect_disparity(MeasureCode::Cbp, StratificationVariable::Language, &groups, &config);
    // `group` marks validity against the default of 30
    assert_eq!(record.groups_compared, 0);

    let mut records = Vec::new();
    let mut demographics = Vec::new();
    add_language_group(&mut records, &mut demographics, MeasureCode::Bcs, "ENGLISH", 6, 6);
    add_language_group(&mut records, &mut demographics, MeasureCode::Bcs, "SPANISH", 6, 3);
    let groups = stratify(&records, &demographics, MeasureCode::Bcs, StratificationVariable::Language, &config);
    assert!(groups.iter().all(|g| g.is_valid));
    let record = detect_disparity(MeasureCode::Bcs, StratificationVariable::Language, &groups, &config);
    assert!((record.disparity_magnitude - 50.0).abs() < 1e-9);
}

#[test]
fn test_synthetic_plan_equity() {
    let snapshot = generate_plan_snapshot(&SyntheticPlanConfig {
        members: 3_000,
        ..SyntheticPlanConfig::default()
    });
    let config = EngineConfig::default();
    let disparities =
        analyze_disparities(&snapshot.compliance_records, &snapshot.demographics, &config);

    // Eight claims measures × five variables
    assert_eq!(disparities.len(), 8 * StratificationVariable::ALL.len());
    for record in &disparities {
        assert!(record.disparity_magnitude >= 0.0);
        assert_eq!(
            record.has_disparity,
            record.disparity_magnitude > config.disparity_threshold_pp
        );
        if let (Some(high), Some(low)) = (record.highest_rate, record.lowest_rate) {
            assert!(high >= low);
        }
    }

    let result = portfolio_equity(&disparities, &MeasureRegistry::standard(), &config).unwrap();
    assert!((0.0..=100.0).contains(&result.overall_equity_score));
    assert!(result.priority_interventions.len() <= config.priority_top_n);
    for pair in result.priority_interventions.windows(2) {
        assert!(
            pair[0].gap_to_close * pair[0].measure_weight
                >= pair[1].gap_to_close * pair[1].measure_weight
        );
        assert_eq!(pair[1].rank, pair[0].rank + 1);
    }
}

#[test]
fn test_penalty_tier_financial_impact() {
    let config = EngineConfig::default();
    let registry = MeasureRegistry::standard();
    let result_for_gap = |gap: f64, config: &EngineConfig| {
        let groups = vec![group("A", 90.0, 50), group("B", 90.0 - gap, 50)];
        let record =
            detect_disparity(MeasureCode::Cbp, StratificationVariable::Language, &groups, config);
        portfolio_equity(&[record], &registry, config).unwrap()
    };

    let none = result_for_gap(10.0, &config);
    assert_eq!(none.penalty_tier, PenaltyTier::None);
    assert_eq!(none.financial_impact, 0.0);

    let moderate = result_for_gap(20.0, &config);
    assert_eq!(moderate.penalty_tier, PenaltyTier::Moderate);
    assert_eq!(moderate.financial_impact, -6_000_000.0);

    let severe = result_for_gap(30.0, &config);
    assert_eq!(severe.penalty_tier, PenaltyTier::Severe);
    assert_eq!(severe.financial_impact, -12_000_000.0);

    let mut scaled = EngineConfig::default();
    scaled.penalty_tiers.severe_financial_impact = -3_000_000.0;
    assert_eq!(result_for_gap(30.0, &scaled).financial_impact, -3_000_000.0);
}
