//! Property checks for gap-closure simulation

use hedis_stars::algorithm::scenario::simulate;
use hedis_stars::models::{BaselineMeasure, MeasureCode, MeasureRegistry, SimulationRequest};
use hedis_stars::EngineConfig;
use hedis_stars::Strategy as ClosureStrategy;
use proptest::prelude::*;

proptest! {
    #[test]
    fn gaps_and_investment_grow_with_closure_rate(
        baseline in prop::collection::vec((0.0f64..=1.0, 1u64..=8_000), MeasureCode::ALL.len()),
        closure_scenarios in prop::collection::vec(0.0f64..=1.0, 1..8),
        strategy in prop::sample::select(ClosureStrategy::ALL.to_vec()),
        intervention_cost in 0.0f64..500.0,
    ) {
        let request = SimulationRequest {
            baseline: MeasureCode::ALL
                .iter()
                .zip(&baseline)
                .map(|(&code, &(rate, denominator))| BaselineMeasure::new(code, rate, denominator))
                .collect(),
            closure_scenarios,
            strategy,
            plan_size: 25_000,
            intervention_cost,
        };
        let response = simulate(&request, &MeasureRegistry::standard(), &EngineConfig::default()).unwrap();

        for pair in response.scenarios.windows(2) {
            prop_assert!(pair[0].closure_rate < pair[1].closure_rate);
            prop_assert!(pair[0].gaps_to_close <= pair[1].gaps_to_close);
            prop_assert!(pair[0].investment_required <= pair[1].investment_required);
            prop_assert!(pair[0].projected_stars <= pair[1].projected_stars);
        }
        for scenario in &response.scenarios {
            prop_assert!(scenario.gaps_to_close <= response.total_gaps);
            prop_assert!(scenario.projected_stars >= response.baseline_stars - 1e-9);
        }
    }
}
