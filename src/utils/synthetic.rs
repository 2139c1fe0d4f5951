//! Seeded synthetic plan data
//!
//! Generates a plausible plan snapshot with demographic disparities built in,
//! for demos and property tests. The same seed always yields the same plan.

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rustc_hash::FxHashMap;

use crate::engine::PlanSnapshot;
use crate::models::equity::{ComplianceRecord, MemberDemographics};
use crate::models::measure::MeasureCode;
use crate::models::performance::MeasureInput;
use crate::models::pharmacy::{MedicationClass, MedicationFill};
use crate::models::scenario::{SimulationRequest, Strategy};

const RACE_ETHNICITY: [(&str, f64); 5] = [
    ("WHITE", 0.55),
    ("BLACK", 0.18),
    ("HISPANIC", 0.17),
    ("ASIAN", 0.07),
    ("OTHER", 0.03),
];

const LANGUAGE: [(&str, f64); 4] = [
    ("ENGLISH", 0.78),
    ("SPANISH", 0.14),
    ("CHINESE", 0.05),
    ("VIETNAMESE", 0.03),
];

/// Claims measures with (eligibility probability, baseline compliance)
const CLAIMS_MEASURES: [(MeasureCode, f64, f64); 8] = [
    (MeasureCode::Gsd, 0.30, 0.72),
    (MeasureCode::Ked, 0.30, 0.48),
    (MeasureCode::Eed, 0.30, 0.66),
    (MeasureCode::Bpd, 0.30, 0.64),
    (MeasureCode::Cbp, 0.45, 0.68),
    (MeasureCode::Supd, 0.25, 0.83),
    (MeasureCode::Bcs, 0.35, 0.74),
    (MeasureCode::Col, 0.50, 0.70),
];

/// Options of the synthetic generator
#[derive(Debug, Clone)]
pub struct SyntheticPlanConfig {
    /// Members in the plan
    pub members: usize,
    /// Random seed
    pub seed: u64,
    /// Last day of the measurement year
    pub measurement_year_end: NaiveDate,
    /// Compliance penalty applied to members facing access barriers
    pub barrier_penalty: f64,
}

impl Default for SyntheticPlanConfig {
    fn default() -> Self {
        Self {
            members: 5_000,
            seed: 42,
            measurement_year_end: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap_or_default(),
            barrier_penalty: 0.15,
        }
    }
}

fn pick<'a>(rng: &mut StdRng, table: &[(&'a str, f64)]) -> &'a str {
    let mut draw = rng.random::<f64>();
    for &(label, share) in table {
        if draw < share {
            return label;
        }
        draw -= share;
    }
    table[table.len() - 1].0
}

/// Generate member demographics
#[must_use]
pub fn generate_demographics(rng: &mut StdRng, members: usize) -> Vec<MemberDemographics> {
    (0..members)
        .map(|i| {
            let language = pick(rng, &LANGUAGE);
            let lep = language != "ENGLISH" && rng.random_bool(0.7);
            MemberDemographics::new(&format!("M{i:06}"))
                .with_race_ethnicity(pick(rng, &RACE_ETHNICITY))
                .with_language(language)
                .with_limited_english_proficiency(lep)
                .with_dual_eligible(rng.random_bool(0.2))
                .with_low_income_subsidy(rng.random_bool(0.25))
        })
        .collect()
}

/// Share of the barrier penalty a member carries, 0 to 1
fn barrier_exposure(member: &MemberDemographics) -> f64 {
    let mut exposure: f64 = 0.0;
    if member.limited_english_proficiency == Some(true) {
        exposure += 0.6;
    }
    if member.dual_eligible == Some(true) {
        exposure += 0.5;
    }
    if matches!(member.race_ethnicity.as_deref(), Some("BLACK" | "HISPANIC")) {
        exposure += 0.3;
    }
    exposure.min(1.0)
}

/// Generate claims-based compliance records
#[must_use]
pub fn generate_compliance(
    rng: &mut StdRng,
    demographics: &[MemberDemographics],
    barrier_penalty: f64,
) -> Vec<ComplianceRecord> {
    let mut records = Vec::new();
    for member in demographics {
        let exposure = barrier_exposure(member);
        for &(measure, eligibility, compliance) in &CLAIMS_MEASURES {
            if !rng.random_bool(eligibility) {
                continue;
            }
            let p = (compliance - barrier_penalty * exposure).clamp(0.0, 1.0);
            records.push(ComplianceRecord::eligible(
                &member.member_id,
                measure,
                rng.random_bool(p),
            ));
        }
    }
    records
}

/// Generate pharmacy fills for every medication class
///
/// Members on a class refill on a 30- or 90-day cycle; each refill is late by
/// a random number of days that grows with the member's barrier exposure.
#[must_use]
pub fn generate_fills(
    rng: &mut StdRng,
    demographics: &[MemberDemographics],
    measurement_year_end: NaiveDate,
) -> Vec<(MedicationClass, Vec<MedicationFill>)> {
    let year_start = measurement_year_end - Duration::days(364);

    MedicationClass::ALL
        .into_iter()
        .map(|class| {
            let ndc = match class {
                MedicationClass::Diabetes => "00002-8215",
                MedicationClass::RasAntagonists => "00093-7367",
                MedicationClass::Statins => "00093-7214",
            };
            let mut fills = Vec::new();
            for member in demographics {
                if !rng.random_bool(0.3) {
                    continue;
                }
                let supply: u32 = if rng.random_bool(0.6) { 30 } else { 90 };
                let max_delay = 5 + (40.0 * barrier_exposure(member)) as i64;
                let mut date = year_start + Duration::days(rng.random_range(0..120));
                while date <= measurement_year_end {
                    fills.push(MedicationFill::new(&member.member_id, ndc, date, supply));
                    date += Duration::days(i64::from(supply) + rng.random_range(-3..=max_delay));
                }
            }
            (class, fills)
        })
        .collect()
}

/// Aggregate compliance records into measure counts, optionally for a subset of members
#[must_use]
pub fn measure_counts(
    records: &[ComplianceRecord],
    include: impl Fn(&str) -> bool,
) -> Vec<MeasureInput> {
    let mut counts: FxHashMap<MeasureCode, (u64, u64)> = FxHashMap::default();
    for record in records
        .iter()
        .filter(|r| r.in_denominator && include(&r.member_id))
    {
        let entry = counts.entry(record.measure).or_default();
        entry.1 += 1;
        if record.in_numerator {
            entry.0 += 1;
        }
    }

    let mut inputs: Vec<MeasureInput> = counts
        .into_iter()
        .map(|(code, (numerator, denominator))| MeasureInput::new(code, numerator, denominator))
        .collect();
    inputs.sort_by_key(|input| input.code);
    inputs
}

/// Generate a complete plan snapshot
#[must_use]
pub fn generate_plan_snapshot(config: &SyntheticPlanConfig) -> PlanSnapshot {
    let mut rng = StdRng::seed_from_u64(config.seed);

    let demographics = generate_demographics(&mut rng, config.members);
    let compliance_records = generate_compliance(&mut rng, &demographics, config.barrier_penalty);
    let pharmacy_fills = generate_fills(&mut rng, &demographics, config.measurement_year_end)
        .into_iter()
        .collect();

    let dual: FxHashMap<&str, bool> = demographics
        .iter()
        .map(|m| (m.member_id.as_str(), m.dual_eligible == Some(true)))
        .collect();

    let measures = measure_counts(&compliance_records, |_| true);
    let underserved_measures =
        measure_counts(&compliance_records, |id| dual.get(id).copied().unwrap_or(false));

    PlanSnapshot {
        plan_name: format!("Synthetic plan (seed {})", config.seed),
        measurement_year_end: config.measurement_year_end,
        pharmacy_fills,
        measures,
        compliance_records,
        demographics,
        hei_factor: None,
        underserved_measures,
        simulation: Some(SimulationRequest {
            baseline: Vec::new(),
            closure_scenarios: vec![0.05, 0.10, 0.15, 0.20, 0.30, 0.50],
            strategy: Strategy::TripleWeighted,
            plan_size: config.members as u64,
            intervention_cost: 150.0,
        }),
    }
}
