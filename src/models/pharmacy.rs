//! Pharmacy fill and medication adherence records

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::equity::ComplianceRecord;
use crate::models::measure::MeasureCode;

/// Medication classes tracked by the adherence (PDC) measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicationClass {
    /// Oral diabetes medications
    Diabetes,
    /// ACE inhibitors, ARBs and direct renin inhibitors
    RasAntagonists,
    /// Statins
    Statins,
}

impl MedicationClass {
    /// All tracked classes
    pub const ALL: [Self; 3] = [Self::Diabetes, Self::RasAntagonists, Self::Statins];

    /// The adherence measure scored from this class
    #[must_use]
    pub const fn measure(self) -> MeasureCode {
        match self {
            Self::Diabetes => MeasureCode::PdcDr,
            Self::RasAntagonists => MeasureCode::PdcRasa,
            Self::Statins => MeasureCode::PdcSta,
        }
    }

    /// The class scored by an adherence measure, if it is one
    #[must_use]
    pub const fn for_measure(code: MeasureCode) -> Option<Self> {
        match code {
            MeasureCode::PdcDr => Some(Self::Diabetes),
            MeasureCode::PdcRasa => Some(Self::RasAntagonists),
            MeasureCode::PdcSta => Some(Self::Statins),
            _ => None,
        }
    }
}

impl fmt::Display for MedicationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Diabetes => "Diabetes",
            Self::RasAntagonists => "RAS Antagonists",
            Self::Statins => "Statins",
        };
        f.write_str(label)
    }
}

/// A single pharmacy claim, already filtered to one medication class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationFill {
    /// Member identifier
    pub member_id: String,
    /// National Drug Code of the dispensed product
    pub ndc_code: String,
    /// Dispensing date
    pub fill_date: NaiveDate,
    /// Days of supply dispensed
    pub days_supply: u32,
}

impl MedicationFill {
    /// Create a new fill
    #[must_use]
    pub fn new(member_id: &str, ndc_code: &str, fill_date: NaiveDate, days_supply: u32) -> Self {
        Self {
            member_id: member_id.to_string(),
            ndc_code: ndc_code.to_string(),
            fill_date,
            days_supply,
        }
    }
}

/// Adherence result for one member and medication class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdherenceRecord {
    /// Member identifier
    pub member_id: String,
    /// Medication class evaluated
    pub medication_class: MedicationClass,
    /// Number of fills inside the measurement year
    pub fill_count: usize,
    /// First fill date, start of the treatment period
    pub first_fill_date: NaiveDate,
    /// Days from first fill through the end of the measurement year, inclusive
    pub treatment_days: i64,
    /// Distinct days in the treatment period covered by at least one fill
    pub days_covered: i64,
    /// Proportion of days covered, rounded to 4 decimals
    pub pdc: f64,
    /// `pdc` at or above the adherence threshold
    pub adherent: bool,
}

/// Adherence results for a population and one medication class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdherenceSummary {
    /// Medication class evaluated
    pub medication_class: MedicationClass,
    /// Evaluated members, ordered by member id
    pub records: Vec<AdherenceRecord>,
    /// Members skipped because their treatment period could not be established
    pub excluded_members: usize,
}

impl AdherenceSummary {
    /// Members in the measure denominator
    #[must_use]
    pub fn denominator(&self) -> u64 {
        self.records.len() as u64
    }

    /// Members meeting the adherence threshold
    #[must_use]
    pub fn numerator(&self) -> u64 {
        self.records.iter().filter(|r| r.adherent).count() as u64
    }

    /// Share of evaluated members that are adherent, `None` with no evaluated members
    #[must_use]
    pub fn adherence_rate(&self) -> Option<f64> {
        let denominator = self.denominator();
        (denominator > 0).then(|| self.numerator() as f64 / denominator as f64)
    }

    /// Mean PDC over evaluated members
    #[must_use]
    pub fn mean_pdc(&self) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        Some(self.records.iter().map(|r| r.pdc).sum::<f64>() / self.records.len() as f64)
    }

    /// Adherence-gated compliance flags for the class's measure
    #[must_use]
    pub fn compliance_records(&self) -> Vec<ComplianceRecord> {
        let measure = self.medication_class.measure();
        self.records
            .iter()
            .map(|record| ComplianceRecord {
                member_id: record.member_id.clone(),
                measure,
                in_denominator: true,
                in_numerator: record.adherent,
            })
            .collect()
    }
}
