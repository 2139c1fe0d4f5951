//! Health equity records: demographics, stratified groups and disparities

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::models::measure::MeasureCode;

/// Numerator/denominator flags of one member for one measure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceRecord {
    /// Member identifier
    pub member_id: String,
    /// Measure the flags belong to
    pub measure: MeasureCode,
    /// Member is eligible for the measure
    pub in_denominator: bool,
    /// Member met the measure's numerator criterion
    pub in_numerator: bool,
}

impl ComplianceRecord {
    /// Create a record for an eligible member
    #[must_use]
    pub fn eligible(member_id: &str, measure: MeasureCode, compliant: bool) -> Self {
        Self {
            member_id: member_id.to_string(),
            measure,
            in_denominator: true,
            in_numerator: compliant,
        }
    }

    /// Eligible member who has not met the numerator criterion
    #[must_use]
    pub const fn is_gap(&self) -> bool {
        self.in_denominator && !self.in_numerator
    }
}

/// Demographic attributes performance is stratified by
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StratificationVariable {
    /// Standardized race/ethnicity
    RaceEthnicity,
    /// Preferred language
    Language,
    /// Limited English proficiency
    LimitedEnglishProficiency,
    /// Dual Medicare/Medicaid eligibility
    DualEligible,
    /// Low-income subsidy status
    LowIncomeSubsidy,
}

impl StratificationVariable {
    /// All variables
    pub const ALL: [Self; 5] = [
        Self::RaceEthnicity,
        Self::Language,
        Self::LimitedEnglishProficiency,
        Self::DualEligible,
        Self::LowIncomeSubsidy,
    ];

    /// Whether the variable describes social determinants of health
    #[must_use]
    pub const fn is_sdoh(self) -> bool {
        matches!(self, Self::DualEligible | Self::LowIncomeSubsidy)
    }
}

impl fmt::Display for StratificationVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::RaceEthnicity => "race_ethnicity",
            Self::Language => "language",
            Self::LimitedEnglishProficiency => "limited_english_proficiency",
            Self::DualEligible => "dual_eligible",
            Self::LowIncomeSubsidy => "low_income_subsidy",
        };
        f.write_str(label)
    }
}

/// Demographic attributes of one member
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDemographics {
    /// Member identifier
    pub member_id: String,
    /// Standardized race/ethnicity label
    pub race_ethnicity: Option<String>,
    /// Preferred language label
    pub language: Option<String>,
    /// Limited English proficiency flag
    pub limited_english_proficiency: Option<bool>,
    /// Dual-eligible flag
    pub dual_eligible: Option<bool>,
    /// Low-income subsidy flag
    pub low_income_subsidy: Option<bool>,
}

impl MemberDemographics {
    /// Create an empty profile for a member
    #[must_use]
    pub fn new(member_id: &str) -> Self {
        Self {
            member_id: member_id.to_string(),
            ..Self::default()
        }
    }

    /// Set the race/ethnicity label
    #[must_use]
    pub fn with_race_ethnicity(mut self, value: &str) -> Self {
        self.race_ethnicity = Some(value.to_string());
        self
    }

    /// Set the language label
    #[must_use]
    pub fn with_language(mut self, value: &str) -> Self {
        self.language = Some(value.to_string());
        self
    }

    /// Set the dual-eligible flag
    #[must_use]
    pub const fn with_dual_eligible(mut self, value: bool) -> Self {
        self.dual_eligible = Some(value);
        self
    }

    /// Set the low-income subsidy flag
    #[must_use]
    pub const fn with_low_income_subsidy(mut self, value: bool) -> Self {
        self.low_income_subsidy = Some(value);
        self
    }

    /// Set the limited English proficiency flag
    #[must_use]
    pub const fn with_limited_english_proficiency(mut self, value: bool) -> Self {
        self.limited_english_proficiency = Some(value);
        self
    }

    /// Group label of the member for a stratification variable
    #[must_use]
    pub fn value_for(&self, variable: StratificationVariable) -> Option<String> {
        let flag = |value: Option<bool>, yes: &str, no: &str| {
            value.map(|v| if v { yes.to_string() } else { no.to_string() })
        };

        match variable {
            StratificationVariable::RaceEthnicity => self.race_ethnicity.clone(),
            StratificationVariable::Language => self.language.clone(),
            StratificationVariable::LimitedEnglishProficiency => {
                flag(self.limited_english_proficiency, "LEP", "NON_LEP")
            }
            StratificationVariable::DualEligible => flag(self.dual_eligible, "DUAL", "NON_DUAL"),
            StratificationVariable::LowIncomeSubsidy => {
                flag(self.low_income_subsidy, "LIS", "NON_LIS")
            }
        }
    }
}

/// Measure performance within one demographic group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StratifiedGroup {
    /// Measure evaluated
    pub measure_code: MeasureCode,
    /// Variable the group belongs to
    pub stratification_variable: StratificationVariable,
    /// Group label (e.g. "HISPANIC", "SPANISH", "DUAL")
    pub group_label: String,
    /// Eligible members in the group
    pub denominator: u64,
    /// Compliant members in the group
    pub numerator: u64,
    /// Compliance rate in percent
    pub compliance_rate: f64,
    /// Members the group comparison is based on
    pub group_size: u64,
    /// Group is large enough to be compared
    pub is_valid: bool,
}

/// Severity bands of a disparity magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisparityCategory {
    /// Below 5 percentage points
    Minimal,
    /// 5 to 10 percentage points
    Small,
    /// 10 to 20 percentage points
    Moderate,
    /// 20 to 30 percentage points
    Large,
    /// 30 percentage points or more
    Severe,
}

impl DisparityCategory {
    /// Band of a magnitude in percentage points
    #[must_use]
    pub fn from_magnitude(magnitude: f64) -> Self {
        if magnitude < 5.0 {
            Self::Minimal
        } else if magnitude < 10.0 {
            Self::Small
        } else if magnitude < 20.0 {
            Self::Moderate
        } else if magnitude < 30.0 {
            Self::Large
        } else {
            Self::Severe
        }
    }
}

impl fmt::Display for DisparityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Minimal => "MINIMAL",
            Self::Small => "SMALL",
            Self::Moderate => "MODERATE",
            Self::Large => "LARGE",
            Self::Severe => "SEVERE",
        };
        f.write_str(label)
    }
}

/// Best-versus-worst comparison of the valid groups of one measure and variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisparityRecord {
    /// Measure evaluated
    pub measure_code: MeasureCode,
    /// Variable the groups belong to
    pub stratification_variable: StratificationVariable,
    /// Best-performing valid group
    pub highest_group: Option<String>,
    /// Compliance rate of the best group, percent
    pub highest_rate: Option<f64>,
    /// Worst-performing valid group
    pub lowest_group: Option<String>,
    /// Compliance rate of the worst group, percent
    pub lowest_rate: Option<f64>,
    /// Highest minus lowest valid rate, percentage points
    pub disparity_magnitude: f64,
    /// Magnitude exceeds the disparity threshold
    pub has_disparity: bool,
    /// Severity band of the magnitude
    pub category: DisparityCategory,
    /// Number of valid groups compared
    pub groups_compared: usize,
}

impl DisparityRecord {
    /// At least two valid groups were compared
    #[must_use]
    pub const fn has_valid_comparison(&self) -> bool {
        self.groups_compared >= 2
    }
}

/// Star-rating penalty tier derived from the overall equity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PenaltyTier {
    /// No adjustment
    None,
    /// Moderate adjustment
    Moderate,
    /// Severe adjustment
    Severe,
}

impl PenaltyTier {
    /// Tier of an overall equity score
    #[must_use]
    pub fn from_score(score: f64, config: &EngineConfig) -> Self {
        let tiers = &config.penalty_tiers;
        if score >= tiers.no_penalty_min {
            Self::None
        } else if score >= tiers.moderate_min {
            Self::Moderate
        } else {
            Self::Severe
        }
    }

    /// Star adjustment of the tier (zero or negative)
    #[must_use]
    pub fn star_adjustment(self, config: &EngineConfig) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Moderate => config.penalty_tiers.moderate_adjustment,
            Self::Severe => config.penalty_tiers.severe_adjustment,
        }
    }

    /// Annual revenue effect of the tier (zero or negative)
    #[must_use]
    pub fn financial_impact(self, config: &EngineConfig) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Moderate => config.penalty_tiers.moderate_financial_impact,
            Self::Severe => config.penalty_tiers.severe_financial_impact,
        }
    }
}

impl fmt::Display for PenaltyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::None => "NO_PENALTY",
            Self::Moderate => "MODERATE_PENALTY",
            Self::Severe => "SEVERE_PENALTY",
        };
        f.write_str(label)
    }
}

/// Ranked intervention targeting the worst-performing group of a disparity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityIntervention {
    /// 1-based priority rank
    pub rank: usize,
    /// Measure to improve
    pub measure_code: MeasureCode,
    /// Variable the target group belongs to
    pub stratification_variable: StratificationVariable,
    /// Group to target (the lowest-performing group)
    pub target_group: String,
    /// Current compliance rate of the target group, percent
    pub current_rate: f64,
    /// Rate of the best-performing group, percent
    pub goal_rate: f64,
    /// Percentage points to close
    pub gap_to_close: f64,
    /// Severity band of the disparity
    pub category: DisparityCategory,
    /// Star weight of the measure
    pub measure_weight: f64,
    /// Recommended actions
    pub recommended_actions: Vec<String>,
}

/// Portfolio-level health equity assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityResult {
    /// Per-measure equity score (0-100), measures with a valid comparison only
    pub measure_scores: BTreeMap<MeasureCode, f64>,
    /// Weight-weighted mean of the per-measure scores
    pub overall_equity_score: f64,
    /// Penalty tier of the overall score
    pub penalty_tier: PenaltyTier,
    /// Star adjustment of the penalty tier
    pub penalty_stars: f64,
    /// Annual revenue effect of the penalty tier
    pub financial_impact: f64,
    /// Measures with at least one valid comparison
    pub measures_evaluated: usize,
    /// Measure × variable comparisons received
    pub comparisons: usize,
    /// Comparisons skipped for lack of two valid groups
    pub excluded_comparisons: usize,
    /// Comparisons flagged as disparities
    pub measures_with_disparities: usize,
    /// Comparisons in the severe band
    pub severe_disparities: usize,
    /// Ranked interventions
    pub priority_interventions: Vec<PriorityIntervention>,
    /// All disparity records the result was computed from
    pub disparities: Vec<DisparityRecord>,
}
