//! Shared utilities: logging helpers and synthetic plan data

pub mod logging;
pub mod synthetic;

pub use synthetic::{SyntheticPlanConfig, generate_plan_snapshot};
