// Ratio & cohort comparator
//
// Joins the housing price table against the university-town set across the
// detected recession window and t-tests the two cohorts' price-change
// ratios. ratio = price(quarter before recession) / price(recession bottom);
// a ratio below 1 means prices fell less into the bottom.
//
// Membership and exclusion both join on the full (state, region) key, so
// every location with a defined ratio lands in exactly one cohort. (Joining
// on region name alone would silently drop same-named towns in other states
// from the non-university cohort.)

use crate::housing::PriceTable;
use crate::quarters::QuarterlySeries;
use crate::recession::{detect_recession, AnalysisError, RecessionWindow};
use crate::states::LocationKey;
use crate::stats::{mean, two_sample_ttest};
use crate::towns::CohortSet;
use log::info;
use serde::Serialize;

/// Reject the null hypothesis below this two-sided p-value.
pub const SIGNIFICANCE_LEVEL: f64 = 0.01;

// ============================================================================
// VERDICT TYPES
// ============================================================================

/// Which cohort a verdict points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cohort {
    #[serde(rename = "university town")]
    UniversityTown,
    #[serde(rename = "non-university town")]
    Other,
}

impl Cohort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cohort::UniversityTown => "university town",
            Cohort::Other => "non-university town",
        }
    }
}

/// One location's price-change ratio across the recession window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioRecord {
    pub key: LocationKey,
    pub ratio: f64,
}

/// Outcome of the cohort comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpactVerdict {
    /// True when the cohorts' ratio distributions differ at p < 0.01.
    pub significant: bool,
    pub p_value: f64,
    pub statistic: f64,
    /// The cohort with the lower mean ratio, i.e. the smaller price decline.
    pub lower_mean_cohort: Cohort,
}

/// Full pipeline output: the detected window plus the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpactReport {
    pub window: RecessionWindow,
    pub verdict: ImpactVerdict,
}

// ============================================================================
// RATIOS AND PARTITION
// ============================================================================

/// Per-location ratio across the window. Locations missing either price, or
/// whose division is not finite, are skipped.
pub fn compute_ratios(
    prices: &PriceTable,
    window: &RecessionWindow,
) -> Result<Vec<RatioRecord>, AnalysisError> {
    for quarter in [window.before_start, window.bottom] {
        if !prices.has_quarter(quarter) {
            return Err(AnalysisError::MissingQuarterColumn { quarter });
        }
    }

    let mut records = Vec::new();
    for (key, _) in prices.iter() {
        let Some(before) = prices.price(key, window.before_start) else {
            continue;
        };
        let Some(bottom) = prices.price(key, window.bottom) else {
            continue;
        };
        let ratio = before / bottom;
        if ratio.is_finite() {
            records.push(RatioRecord {
                key: key.clone(),
                ratio,
            });
        }
    }
    Ok(records)
}

/// Split ratio records into (university towns, everything else) by full
/// location key. Exhaustive and non-overlapping by construction.
pub fn partition_cohorts(
    records: Vec<RatioRecord>,
    cohort: &CohortSet,
) -> (Vec<RatioRecord>, Vec<RatioRecord>) {
    records
        .into_iter()
        .partition(|record| cohort.contains(&record.key))
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Compare the two cohorts' ratio distributions across an already-detected
/// window.
pub fn compare_cohorts(
    prices: &PriceTable,
    cohort: &CohortSet,
    window: &RecessionWindow,
) -> Result<ImpactVerdict, AnalysisError> {
    let records = compute_ratios(prices, window)?;
    let (university, other) = partition_cohorts(records, cohort);

    if university.is_empty() {
        return Err(AnalysisError::EmptyCohort {
            cohort: Cohort::UniversityTown.as_str(),
        });
    }
    if other.is_empty() {
        return Err(AnalysisError::EmptyCohort {
            cohort: Cohort::Other.as_str(),
        });
    }
    info!(
        "Comparing {} university-town ratios against {} others",
        university.len(),
        other.len()
    );

    let ratios_a: Vec<f64> = university.iter().map(|r| r.ratio).collect();
    let ratios_b: Vec<f64> = other.iter().map(|r| r.ratio).collect();
    let outcome = two_sample_ttest(&ratios_a, &ratios_b);

    Ok(ImpactVerdict {
        // NaN p-value (degenerate test input) compares false here.
        significant: outcome.p_value < SIGNIFICANCE_LEVEL,
        p_value: outcome.p_value,
        statistic: outcome.statistic,
        lower_mean_cohort: if mean(&ratios_a) < mean(&ratios_b) {
            Cohort::UniversityTown
        } else {
            Cohort::Other
        },
    })
}

/// End-to-end analysis: detect the recession window in the GDP series, then
/// compare the cohorts across it. Pure function of its three inputs.
pub fn evaluate_recession_impact(
    series: &QuarterlySeries,
    prices: &PriceTable,
    cohort: &CohortSet,
) -> Result<ImpactReport, AnalysisError> {
    let window = detect_recession(series)?;
    info!(
        "Recession window: before-start {}, bottom {}, end {}",
        window.before_start, window.bottom, window.end
    );
    let verdict = compare_cohorts(prices, cohort, &window)?;
    Ok(ImpactReport { window, verdict })
}

// ============================================================================
// TESTS
// ============================================================================
