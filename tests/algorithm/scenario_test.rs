//! Tests for gap-closure simulation

use hedis_stars::algorithm::scenario::{
    bonus_break_even, compare_strategies, quality_bonus_rate, simulate,
};
use hedis_stars::models::{BaselineMeasure, MeasureCode, MeasureRegistry, SimulationRequest};
use hedis_stars::{EngineConfig, Strategy};

fn baseline() -> Vec<BaselineMeasure> {
    vec![
        BaselineMeasure::new(MeasureCode::Gsd, 0.62, 4_000),
        BaselineMeasure::new(MeasureCode::Ked, 0.41, 3_500),
        BaselineMeasure::new(MeasureCode::Bpd, 0.55, 3_500),
        BaselineMeasure::new(MeasureCode::Cbp, 0.66, 6_000),
        BaselineMeasure::new(MeasureCode::PdcSta, 0.78, 5_000),
        BaselineMeasure::new(MeasureCode::Col, 0.58, 7_000),
    ]
}

fn request(strategy: Strategy, cost: f64) -> SimulationRequest {
    SimulationRequest {
        baseline: baseline(),
        closure_scenarios: (0..=10).map(|step| f64::from(step) / 10.0).collect(),
        strategy,
        plan_size: 50_000,
        intervention_cost: cost,
    }
}

#[test]
fn test_gaps_and_investment_grow_with_closure() {
    let config = EngineConfig::default();
    let registry = MeasureRegistry::standard();

    for strategy in Strategy::ALL {
        let response = simulate(&request(strategy, 120.0), &registry, &config).unwrap();
        assert_eq!(response.scenarios.len(), 11);
        assert_eq!(response.recommended_strategy, strategy);

        for pair in response.scenarios.windows(2) {
            assert!(pair[0].closure_rate < pair[1].closure_rate);
            assert!(pair[0].gaps_to_close <= pair[1].gaps_to_close);
            assert!(pair[0].investment_required <= pair[1].investment_required);
            assert!(pair[0].projected_stars <= pair[1].projected_stars);
        }

        let full = response.scenarios.last().unwrap();
        assert_eq!(full.gaps_to_close, response.total_gaps);
        assert_eq!(response.scenarios[0].gaps_to_close, 0);
        assert_eq!(response.scenarios[0].roi, None);
    }
}

#[test]
fn test_roi_and_payback_definitions() {
    let config = EngineConfig::default();
    let response =
        simulate(&request(Strategy::Balanced, 40.0), &MeasureRegistry::standard(), &config)
            .unwrap();

    for scenario in &response.scenarios {
        assert!((scenario.net_value - (scenario.revenue_impact - scenario.investment_required)).abs() < 1e-6);
        match scenario.roi {
            Some(roi) => {
                assert!(scenario.investment_required > 0.0);
                let expected = scenario.net_value / scenario.investment_required * 100.0;
                assert!((roi - expected).abs() < 1e-9);
            }
            None => assert_eq!(scenario.investment_required, 0.0),
        }
        match scenario.payback_period_months {
            Some(months) => {
                assert!(scenario.revenue_impact > 0.0);
                assert!(months >= 0.0);
            }
            None => assert!(scenario.revenue_impact <= 0.0),
        }
    }

    // The optimum is a scenario with the highest defined ROI
    let best = response.max_roi_scenario.as_ref().unwrap();
    assert_eq!(response.optimal_closure_rate, Some(best.closure_rate));
    assert!(response
        .scenarios
        .iter()
        .filter_map(|s| s.roi)
        .all(|roi| roi <= best.roi.unwrap()));
}

#[test]
fn test_break_even_scenario_is_not_negative() {
    let config = EngineConfig::default();
    let response =
        simulate(&request(Strategy::TripleWeighted, 40.0), &MeasureRegistry::standard(), &config)
            .unwrap();

    let gaps = response.break_even_closures.unwrap();
    assert!(gaps >= 1 && gaps <= response.total_gaps);
    // No listed scenario breaks even with fewer closed gaps
    for scenario in &response.scenarios {
        if scenario.gaps_to_close > 0 && scenario.net_value >= 0.0 {
            assert!(scenario.gaps_to_close + 1 >= gaps);
        }
    }
}

#[test]
fn test_plan_size_scales_revenue() {
    let config = EngineConfig::default();
    let registry = MeasureRegistry::standard();
    let small = simulate(&request(Strategy::Balanced, 0.0), &registry, &config).unwrap();
    let mut large_request = request(Strategy::Balanced, 0.0);
    large_request.plan_size = 200_000;
    let large = simulate(&large_request, &registry, &config).unwrap();

    for (a, b) in small.scenarios.iter().zip(&large.scenarios) {
        assert!((b.revenue_impact - 4.0 * a.revenue_impact).abs() < 1e-6);
    }
}

#[test]
fn test_strategy_without_targets() {
    let config = EngineConfig::default();
    let mut only_screening = request(Strategy::New2025, 50.0);
    only_screening.baseline = vec![
        BaselineMeasure::new(MeasureCode::Bcs, 0.7, 1000),
        BaselineMeasure::new(MeasureCode::Col, 0.6, 1000),
    ];
    let response = simulate(&only_screening, &MeasureRegistry::standard(), &config).unwrap();

    assert_eq!(response.total_gaps, 0);
    assert!(response.scenarios.iter().all(|s| s.star_improvement == 0.0 && s.roi.is_none()));
    assert_eq!(response.break_even_closures, None);
}

#[test]
fn test_missing_denominator_defaults_to_plan_size() {
    let config = EngineConfig::default();
    let request = SimulationRequest {
        baseline: vec![BaselineMeasure {
            code: MeasureCode::Cbp,
            rate: 0.5,
            denominator: None,
        }],
        closure_scenarios: vec![1.0],
        strategy: Strategy::Balanced,
        plan_size: 2_000,
        intervention_cost: 10.0,
    };
    let response = simulate(&request, &MeasureRegistry::standard(), &config).unwrap();
    assert_eq!(response.total_gaps, 1_000);
}

#[test]
fn test_compare_strategies_recommends_best_roi() {
    let config = EngineConfig::default();
    let comparison =
        compare_strategies(&request(Strategy::Balanced, 60.0), &MeasureRegistry::standard(), &config)
            .unwrap();

    let recommended = comparison.recommended_strategy.unwrap();
    let roi_of = |strategy: Strategy| {
        comparison
            .simulations
            .iter()
            .find(|s| s.recommended_strategy == strategy)
            .and_then(|s| s.max_roi_scenario.as_ref())
            .and_then(|s| s.roi)
    };
    let best = roi_of(recommended).unwrap();
    for strategy in Strategy::ALL {
        if let Some(roi) = roi_of(strategy) {
            assert!(roi <= best);
        }
    }
}

#[test]
fn test_quality_bonus() {
    assert!(quality_bonus_rate(4.5) > quality_bonus_rate(4.0));
    assert!(quality_bonus_rate(2.0) < 0.0);

    let config = EngineConfig {
        total_plan_revenue: 10_000_000.0,
        ..EngineConfig::default()
    };
    let result = bonus_break_even(200_000.0, 3.0, 3.5, &config).unwrap();
    assert!((result.bonus_improvement - 250_000.0).abs() < 1e-6);
    assert!(result.breaks_even);

    let too_costly = bonus_break_even(300_000.0, 3.0, 3.5, &config).unwrap();
    assert!(!too_costly.breaks_even);
}
