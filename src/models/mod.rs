//! Domain models for the Star Rating engine
//!
//! These are plain input and result records. Every computation takes them
//! by reference and returns new records; nothing is mutated in place.

pub mod equity;
pub mod measure;
pub mod performance;
pub mod pharmacy;
pub mod scenario;

// Re-export commonly used types
pub use equity::{
    ComplianceRecord, DisparityCategory, DisparityRecord, EquityResult, MemberDemographics,
    PenaltyTier, PriorityIntervention, StratificationVariable, StratifiedGroup,
};
pub use measure::{CutPoint, CutPoints, MeasureCode, MeasureRegistry, MeasureSpec};
pub use performance::{
    MeasureInput, MeasurePerformance, PortfolioPerformance, RevenueImpact, StarTier,
};
pub use pharmacy::{AdherenceRecord, AdherenceSummary, MedicationClass, MedicationFill};
pub use scenario::{
    BaselineMeasure, BonusBreakEven, Scenario, SimulationRequest, SimulationResponse, Strategy,
    StrategyComparison,
};
