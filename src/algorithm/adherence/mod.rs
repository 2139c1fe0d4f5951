//! Medication adherence (Proportion of Days Covered)
//!
//! This module computes PDC from pharmacy fills:
//!
//! 1. Per-member PDC with interval-merged coverage
//! 2. Population batches per medication class, feeding the PDC measures'
//!    numerators and denominators

pub mod pdc;
pub mod population;

// Re-export key functions
pub use pdc::{compute_pdc, covered_days};
pub use population::{compute_population_pdc, group_fills_by_member};
