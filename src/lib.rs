//! Medicare Advantage Star Rating and portfolio optimization engine
//!
//! Computes medication adherence from pharmacy fills, measures health-equity
//! disparities across demographic groups, rates a HEDIS measure portfolio
//! against percentile cut-points, and projects the return of gap-closure
//! interventions.

pub mod algorithm;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod utils;

// Re-export the most common types for easier use
pub use config::{EngineConfig, PenaltyTierBoundaries};
pub use engine::{PlanSnapshot, PortfolioEngine, PortfolioReport};
pub use error::{EngineError, Result};
pub use models::{MeasureCode, MeasureRegistry, Strategy};

// Calculators
pub use algorithm::adherence::{compute_pdc, compute_population_pdc};
pub use algorithm::equity::{
    detect_disparity, equity_score, identify_priority_interventions, portfolio_equity, stratify,
};
pub use algorithm::scenario::{bonus_break_even, compare_strategies, simulate};
pub use algorithm::stars::{
    calculate_hei_factor, calculate_measure_performance, calculate_portfolio_performance,
    estimate_measure_value, measure_star, score_portfolio,
};
