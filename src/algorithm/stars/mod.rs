//! Star Rating calculation
//!
//! Measure rates are mapped to stars through percentile cut-points, weighted
//! into a portfolio rating, and converted into revenue with the HEI modifier.

pub mod calculator;
pub mod hei;
pub mod report;

pub use calculator::{
    calculate_measure_performance, calculate_portfolio_performance, estimate_measure_value,
    estimate_revenue_impact, measure_star, score_portfolio,
};
pub use hei::calculate_hei_factor;
pub use report::format_portfolio_report;
