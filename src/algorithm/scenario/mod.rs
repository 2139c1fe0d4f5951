//! Gap-closure scenarios and their return on investment
//!
//! This module covers:
//!
//! 1. Per-strategy simulation of closure rates with ROI and payback
//! 2. Break-even gap counts at star-band boundaries
//! 3. Strategy comparison
//! 4. Quality-bonus break-even between two ratings

pub mod bonus;
pub mod break_even;
pub mod report;
pub mod simulator;

pub use bonus::{bonus_break_even, quality_bonus_rate};
pub use report::format_simulation_report;
pub use simulator::{compare_strategies, project_rate, simulate, targeted_measures};
