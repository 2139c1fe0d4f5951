//! Break-even gap count of a simulation
//!
//! Stars move in half-star bands, so revenue is a step function of the number
//! of closed gaps while investment grows linearly. Net value can therefore only
//! turn non-negative right where a targeted measure crosses a cut-point, and
//! only those gap counts need to be evaluated.

use std::collections::BTreeSet;

use crate::algorithm::scenario::simulator::Projection;
use crate::error::Result;

/// Smallest number of closed gaps with a non-negative net value
///
/// Returns `None` when there are no open gaps or no gap count breaks even.
pub(crate) fn break_even_closures(projection: &Projection<'_>) -> Result<Option<u64>> {
    let total_gaps = projection.total_gaps();
    if total_gaps == 0 {
        return Ok(None);
    }

    let mut candidates = BTreeSet::from([1, total_gaps]);
    for measure in projection.measures.iter().filter(|m| m.targeted && m.rate < 1.0) {
        for point in measure.spec.cut_points.points() {
            if point.percentile <= measure.rate {
                continue;
            }
            let closure = (point.percentile - measure.rate) / (1.0 - measure.rate);
            let crossing = (closure * projection.open_gaps).ceil() as u64;
            for gaps in crossing.saturating_sub(1)..=crossing.saturating_add(1) {
                if (1..=total_gaps).contains(&gaps) {
                    candidates.insert(gaps);
                }
            }
        }
    }

    for gaps in candidates {
        let closure = (gaps as f64 / projection.open_gaps).min(1.0);
        let scenario = projection.scenario(closure, gaps)?;
        if scenario.net_value >= 0.0 {
            return Ok(Some(gaps));
        }
    }

    Ok(None)
}
