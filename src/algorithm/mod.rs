//! Calculators of the Star Rating engine
//!
//! Each submodule is a set of pure functions over in-memory records:
//! adherence (PDC), equity (stratified disparities), stars (measure and
//! portfolio ratings) and scenario (gap-closure ROI).

pub mod adherence;
pub mod equity;
pub mod scenario;
pub mod stars;
