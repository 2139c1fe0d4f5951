//! HEDIS measure specifications and the typed measure registry
//!
//! The registry is validated once at construction; lookups afterwards are
//! typed by [`MeasureCode`] and never fall back to silent defaults.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// HEDIS measure codes scored by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MeasureCode {
    /// Glycemic Status Assessment for Patients with Diabetes
    #[serde(rename = "GSD")]
    Gsd,
    /// Kidney Health Evaluation for Patients with Diabetes
    #[serde(rename = "KED")]
    Ked,
    /// Eye Exam for Patients with Diabetes
    #[serde(rename = "EED")]
    Eed,
    /// Medication Adherence for Diabetes Medications
    #[serde(rename = "PDC-DR")]
    PdcDr,
    /// Blood Pressure Control for Patients with Diabetes
    #[serde(rename = "BPD")]
    Bpd,
    /// Controlling High Blood Pressure
    #[serde(rename = "CBP")]
    Cbp,
    /// Statin Therapy for Patients with Diabetes
    #[serde(rename = "SUPD")]
    Supd,
    /// Medication Adherence for Hypertension (RAS antagonists)
    #[serde(rename = "PDC-RASA")]
    PdcRasa,
    /// Medication Adherence for Cholesterol (Statins)
    #[serde(rename = "PDC-STA")]
    PdcSta,
    /// Breast Cancer Screening
    #[serde(rename = "BCS")]
    Bcs,
    /// Colorectal Cancer Screening
    #[serde(rename = "COL")]
    Col,
}

impl MeasureCode {
    /// All codes, in registry order
    pub const ALL: [Self; 11] = [
        Self::Gsd,
        Self::Ked,
        Self::Eed,
        Self::PdcDr,
        Self::Bpd,
        Self::Cbp,
        Self::Supd,
        Self::PdcRasa,
        Self::PdcSta,
        Self::Bcs,
        Self::Col,
    ];

    /// The HEDIS string form of the code
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gsd => "GSD",
            Self::Ked => "KED",
            Self::Eed => "EED",
            Self::PdcDr => "PDC-DR",
            Self::Bpd => "BPD",
            Self::Cbp => "CBP",
            Self::Supd => "SUPD",
            Self::PdcRasa => "PDC-RASA",
            Self::PdcSta => "PDC-STA",
            Self::Bcs => "BCS",
            Self::Col => "COL",
        }
    }
}

impl fmt::Display for MeasureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeasureCode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_uppercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == normalized)
            .ok_or_else(|| EngineError::invalid(format!("Unknown measure code: {s}")))
    }
}

/// One row of a benchmark table: at or above `percentile`, the measure earns `stars`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutPoint {
    /// Percentile threshold in [0, 1]
    pub percentile: f64,
    /// Star value awarded from this threshold upwards
    pub stars: f64,
}

impl CutPoint {
    /// Create a new cut-point
    #[must_use]
    pub const fn new(percentile: f64, stars: f64) -> Self {
        Self { percentile, stars }
    }
}

/// Validated percentile→star benchmark table, ascending in both columns
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CutPoints(Vec<CutPoint>);

impl CutPoints {
    /// Validate and wrap a benchmark table
    ///
    /// Thresholds must lie in [0, 1] and be strictly ascending. Star values
    /// must be half-star steps between 1.0 and 5.0, also strictly ascending.
    pub fn new(points: Vec<CutPoint>) -> Result<Self> {
        if points.is_empty() {
            return Err(EngineError::invalid("cut-point table is empty"));
        }

        for point in &points {
            crate::error::ensure_unit_interval("cut-point percentile", point.percentile)?;
            if !is_half_star(point.stars) {
                return Err(EngineError::invalid(format!(
                    "cut-point star value {} is not a half-star step between 1.0 and 5.0",
                    point.stars
                )));
            }
        }

        for pair in points.windows(2) {
            if pair[1].percentile <= pair[0].percentile {
                return Err(EngineError::invalid(format!(
                    "cut-points must be strictly ascending, {} follows {}",
                    pair[1].percentile, pair[0].percentile
                )));
            }
            if pair[1].stars <= pair[0].stars {
                return Err(EngineError::invalid(format!(
                    "cut-point star values must ascend, {} follows {}",
                    pair[1].stars, pair[0].stars
                )));
            }
        }

        Ok(Self(points))
    }

    /// CMS 2025 percentile table shared by all standard measures
    #[must_use]
    pub fn cms_2025() -> Self {
        Self(vec![
            CutPoint::new(0.00, 1.0),
            CutPoint::new(0.15, 1.5),
            CutPoint::new(0.25, 2.0),
            CutPoint::new(0.40, 2.5),
            CutPoint::new(0.50, 3.0),
            CutPoint::new(0.65, 3.5),
            CutPoint::new(0.75, 4.0),
            CutPoint::new(0.85, 4.5),
            CutPoint::new(0.90, 5.0),
        ])
    }

    /// The rows, lowest threshold first
    #[must_use]
    pub fn points(&self) -> &[CutPoint] {
        &self.0
    }

    /// Highest star whose threshold is at or below `percentile`, 1.0 below the table
    #[must_use]
    pub fn star_for(&self, percentile: f64) -> f64 {
        self.0
            .iter()
            .rev()
            .find(|point| point.percentile <= percentile)
            .map_or(1.0, |point| point.stars)
    }
}

impl<'de> Deserialize<'de> for CutPoints {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let points = Vec::<CutPoint>::deserialize(deserializer)?;
        Self::new(points).map_err(serde::de::Error::custom)
    }
}

fn is_half_star(value: f64) -> bool {
    (1.0..=5.0).contains(&value) && (value * 2.0).fract() == 0.0
}

/// Specification of one HEDIS measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureSpec {
    /// Measure code
    pub code: MeasureCode,
    /// Display name
    pub name: String,
    /// Portfolio tier (1 diabetes, 2 cardiovascular, 3 cancer screening, 4 equity)
    pub tier: u8,
    /// Star weight, 1.0 standard or 3.0 triple-weighted
    pub weight: f64,
    /// Measure introduced for MY2025
    pub new_2025: bool,
    /// Percentile→star benchmark table
    pub cut_points: CutPoints,
}

impl MeasureSpec {
    /// Create a measure on the CMS 2025 benchmark table
    #[must_use]
    pub fn new(code: MeasureCode, name: &str, tier: u8, weight: f64) -> Self {
        Self {
            code,
            name: name.to_string(),
            tier,
            weight,
            new_2025: false,
            cut_points: CutPoints::cms_2025(),
        }
    }

    /// Flag the measure as new for MY2025
    #[must_use]
    pub fn as_new_2025(mut self) -> Self {
        self.new_2025 = true;
        self
    }

    /// Replace the benchmark table
    #[must_use]
    pub fn with_cut_points(mut self, cut_points: CutPoints) -> Self {
        self.cut_points = cut_points;
        self
    }

    /// Whether the measure counts three times in the portfolio
    #[must_use]
    pub fn is_triple_weighted(&self) -> bool {
        self.weight == 3.0
    }

    fn validate(&self) -> Result<()> {
        if self.weight != 1.0 && self.weight != 3.0 {
            return Err(EngineError::invalid(format!(
                "measure {} has weight {}, expected 1.0 or 3.0",
                self.code, self.weight
            )));
        }
        if !(1..=4).contains(&self.tier) {
            return Err(EngineError::invalid(format!(
                "measure {} has tier {}, expected 1-4",
                self.code, self.tier
            )));
        }
        Ok(())
    }
}

/// Typed lookup table from measure code to specification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasureRegistry {
    specs: BTreeMap<MeasureCode, MeasureSpec>,
}

impl MeasureRegistry {
    /// Build a registry, validating every specification once
    pub fn new(specs: impl IntoIterator<Item = MeasureSpec>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for spec in specs {
            spec.validate()?;
            let code = spec.code;
            if map.insert(code, spec).is_some() {
                return Err(EngineError::invalid(format!(
                    "measure {code} is registered twice"
                )));
            }
        }
        Ok(Self { specs: map })
    }

    /// The MY2025 HEDIS portfolio
    #[must_use]
    pub fn standard() -> Self {
        let specs = [
            MeasureSpec::new(
                MeasureCode::Gsd,
                "Glycemic Status Assessment for Patients with Diabetes",
                1,
                3.0,
            ),
            MeasureSpec::new(
                MeasureCode::Ked,
                "Kidney Health Evaluation for Patients with Diabetes",
                1,
                3.0,
            )
            .as_new_2025(),
            MeasureSpec::new(MeasureCode::Eed, "Eye Exam for Patients with Diabetes", 1, 1.0),
            MeasureSpec::new(
                MeasureCode::PdcDr,
                "Medication Adherence for Diabetes Medications",
                1,
                1.0,
            ),
            MeasureSpec::new(
                MeasureCode::Bpd,
                "Blood Pressure Control for Patients with Diabetes",
                1,
                1.0,
            )
            .as_new_2025(),
            MeasureSpec::new(MeasureCode::Cbp, "Controlling High Blood Pressure", 2, 3.0),
            MeasureSpec::new(
                MeasureCode::Supd,
                "Statin Therapy for Patients with Diabetes",
                2,
                1.0,
            ),
            MeasureSpec::new(
                MeasureCode::PdcRasa,
                "Medication Adherence for Hypertension (RAS antagonists)",
                2,
                1.0,
            ),
            MeasureSpec::new(
                MeasureCode::PdcSta,
                "Medication Adherence for Cholesterol (Statins)",
                2,
                1.0,
            ),
            MeasureSpec::new(MeasureCode::Bcs, "Breast Cancer Screening", 3, 1.0),
            MeasureSpec::new(MeasureCode::Col, "Colorectal Cancer Screening", 3, 1.0),
        ];

        let specs = specs.into_iter().map(|spec| (spec.code, spec)).collect();
        Self { specs }
    }

    /// Look up a measure
    #[must_use]
    pub fn get(&self, code: MeasureCode) -> Option<&MeasureSpec> {
        self.specs.get(&code)
    }

    /// Look up a measure that the caller requires to be registered
    pub fn require(&self, code: MeasureCode) -> Result<&MeasureSpec> {
        self.get(code)
            .ok_or_else(|| EngineError::invalid(format!("measure {code} is not registered")))
    }

    /// Weight of a registered measure
    pub fn weight(&self, code: MeasureCode) -> Result<f64> {
        self.require(code).map(|spec| spec.weight)
    }

    /// All specifications in code order
    pub fn iter(&self) -> impl Iterator<Item = &MeasureSpec> {
        self.specs.values()
    }

    /// Measures of one tier
    pub fn by_tier(&self, tier: u8) -> impl Iterator<Item = &MeasureSpec> {
        self.iter().filter(move |spec| spec.tier == tier)
    }

    /// Triple-weighted measures
    pub fn triple_weighted(&self) -> impl Iterator<Item = &MeasureSpec> {
        self.iter().filter(|spec| spec.is_triple_weighted())
    }

    /// Measures introduced for MY2025
    pub fn new_2025(&self) -> impl Iterator<Item = &MeasureSpec> {
        self.iter().filter(|spec| spec.new_2025)
    }

    /// Number of registered measures
    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for MeasureRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
