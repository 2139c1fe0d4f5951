//! Measure and portfolio Star Rating performance records

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::measure::MeasureCode;

/// Raw performance counts of one measure, as supplied by the claims provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureInput {
    /// Measure code
    pub code: MeasureCode,
    /// Compliant members
    pub numerator: u64,
    /// Eligible members
    pub denominator: u64,
    /// National percentile of the plan's rate in [0, 1], if known
    #[serde(default)]
    pub percentile: Option<f64>,
}

impl MeasureInput {
    /// Create a new input without a known percentile
    #[must_use]
    pub const fn new(code: MeasureCode, numerator: u64, denominator: u64) -> Self {
        Self {
            code,
            numerator,
            denominator,
            percentile: None,
        }
    }

    /// Attach the national percentile
    #[must_use]
    pub const fn with_percentile(mut self, percentile: f64) -> Self {
        self.percentile = Some(percentile);
        self
    }
}

/// Scored performance of one measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurePerformance {
    /// Measure code
    pub measure_code: MeasureCode,
    /// Measure name
    pub measure_name: String,
    /// Portfolio tier
    pub tier: u8,
    /// Star weight
    pub weight: f64,
    /// Compliant members
    pub numerator: u64,
    /// Eligible members
    pub denominator: u64,
    /// numerator / denominator
    pub rate: f64,
    /// Percentile the star was looked up with
    pub percentile: f64,
    /// Assigned star (1.0-5.0 in half steps)
    pub star_rating: f64,
    /// star_rating × weight
    pub points: f64,
    /// Dollar value of the measure's stars
    pub revenue_estimate: f64,
}

/// Star band label of a portfolio rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StarTier {
    /// Below 2.5 stars
    #[serde(rename = "2-star")]
    TwoStar,
    /// 2.5 to 3.5 stars
    #[serde(rename = "3-star")]
    ThreeStar,
    /// 3.5 to 4.5 stars
    #[serde(rename = "4-star")]
    FourStar,
    /// 4.5 stars and above
    #[serde(rename = "5-star")]
    FiveStar,
}

impl StarTier {
    /// Band of a weighted average star rating
    #[must_use]
    pub fn from_stars(stars: f64) -> Self {
        if stars >= 4.5 {
            Self::FiveStar
        } else if stars >= 3.5 {
            Self::FourStar
        } else if stars >= 2.5 {
            Self::ThreeStar
        } else {
            Self::TwoStar
        }
    }
}

impl fmt::Display for StarTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::TwoStar => "2-star",
            Self::ThreeStar => "3-star",
            Self::FourStar => "4-star",
            Self::FiveStar => "5-star",
        };
        f.write_str(label)
    }
}

/// Scored performance of a measure portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioPerformance {
    /// Scored measures
    pub measures: Vec<MeasurePerformance>,
    /// Sum of measure points
    pub total_points: f64,
    /// Sum of measure weights
    pub total_weight: f64,
    /// total_points / total_weight
    pub weighted_average_stars: f64,
    /// Weighted average stars per tier
    pub tier_stars: BTreeMap<u8, f64>,
    /// Star band of the weighted average
    pub star_tier: StarTier,
    /// HEI revenue modifier applied to the base revenue
    pub hei_factor: f64,
    /// Revenue before the HEI modifier
    pub base_revenue: f64,
    /// Revenue after the HEI modifier
    pub total_revenue: f64,
    /// Measures skipped for lack of data
    pub excluded_measures: usize,
}

/// Revenue effect of moving from one portfolio rating to another
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevenueImpact {
    /// Projected minus current stars
    pub star_improvement: f64,
    /// Revenue effect of the star change
    pub base_revenue_impact: f64,
    /// Projected minus current HEI factor
    pub hei_improvement: f64,
    /// Revenue effect of the HEI change
    pub hei_revenue_impact: f64,
    /// Star and HEI effects combined
    pub total_revenue_impact: f64,
}
