// Recession turning-point detector
//
// Pure scans over the epoch-filtered GDP series. Definitions follow the
// classic two-quarter rule:
//
// - before_start: the quarter immediately preceding two consecutive declines
// - end:          two consecutive declines followed by two consecutive
//                 quarters of growth, reported as the quarter after growth
//                 resumes
// - bottom:       the minimum-value quarter strictly inside (before_start, end]
//
// Every comparison goes through a materialized sliding window with bounds
// checked up front, so the scans never read past the last observation.

use crate::quarters::{Quarter, QuarterlySeries};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

// ============================================================================
// ERROR TAXONOMY
// ============================================================================

/// Why the recession-end scan came up empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndScanFailure {
    /// No decline-into-minimum-then-growth pattern anywhere after the start.
    PatternAbsent,
    /// The pattern was found, but the quarter that would confirm continued
    /// growth falls past the last observation.
    ConfirmationBeyondSeries,
}

impl fmt::Display for EndScanFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndScanFailure::PatternAbsent => write!(f, "recovery pattern never appears"),
            EndScanFailure::ConfirmationBeyondSeries => {
                write!(f, "recovery starts but the series ends before it is confirmed")
            }
        }
    }
}

/// Terminal failures of a single analysis run. Inputs are static snapshots,
/// so none of these are retried — they mean the input does not exhibit the
/// expected recession shape or is malformed.
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("series has {0} quarters after filtering; need at least 3")]
    InsufficientData(usize),

    #[error("no two consecutive GDP declines found in the series")]
    NoRecessionFound,

    #[error("no recession end found: {0}")]
    NoRecessionEndFound(EndScanFailure),

    #[error("non-finite GDP value at {quarter}")]
    InvalidSeriesValue { quarter: Quarter },

    #[error("price table has no '{quarter}' column")]
    MissingQuarterColumn { quarter: Quarter },

    #[error("the {cohort} cohort has no locations with a defined ratio")]
    EmptyCohort { cohort: &'static str },
}

// ============================================================================
// RECESSION WINDOW
// ============================================================================

/// The three turning points located in the GDP series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecessionWindow {
    /// Quarter immediately preceding the first two consecutive declines.
    pub before_start: Quarter,
    /// Quarter after growth resumed for two consecutive quarters.
    pub end: Quarter,
    /// Minimum-value quarter within (before_start, end].
    pub bottom: Quarter,
}

/// Locate the recession window in an epoch-filtered, sorted series.
pub fn detect_recession(series: &QuarterlySeries) -> Result<RecessionWindow, AnalysisError> {
    let before_start = find_before_start(series)?;
    let end = find_end(series, before_start)?;
    let bottom = find_bottom(series, before_start, end)?;
    Ok(RecessionWindow {
        before_start,
        end,
        bottom,
    })
}

// ============================================================================
// SCANS
// ============================================================================

fn check_finite(quarter: Quarter, value: f64) -> Result<f64, AnalysisError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AnalysisError::InvalidSeriesValue { quarter })
    }
}

/// First quarter `i` whose two successors both decline:
/// `v[i+1] < v[i]` and `v[i+2] < v[i+1]`.
pub fn find_before_start(series: &QuarterlySeries) -> Result<Quarter, AnalysisError> {
    let obs = series.observations();
    if obs.len() < 3 {
        return Err(AnalysisError::InsufficientData(obs.len()));
    }
    for window in obs.windows(3) {
        let v0 = check_finite(window[0].0, window[0].1)?;
        let v1 = check_finite(window[1].0, window[1].1)?;
        let v2 = check_finite(window[2].0, window[2].1)?;
        if v1 < v0 && v2 < v1 {
            return Ok(window[0].0);
        }
    }
    Err(AnalysisError::NoRecessionFound)
}

/// Recession end: over the sub-series strictly after `before_start`, the
/// smallest `x >= 2` with a local minimum at `x-1` (decline into it, growth
/// out of it) confirmed by one more quarter of growth at `x+1`. Returns the
/// label at `x+1`.
pub fn find_end(
    series: &QuarterlySeries,
    before_start: Quarter,
) -> Result<Quarter, AnalysisError> {
    let tail = series.after(before_start);
    let obs = tail.observations();

    for x in 2..obs.len() {
        let prev2 = check_finite(obs[x - 2].0, obs[x - 2].1)?;
        let prev1 = check_finite(obs[x - 1].0, obs[x - 1].1)?;
        let here = check_finite(obs[x].0, obs[x].1)?;
        if !(here > prev1 && prev2 > prev1) {
            continue;
        }
        // Local minimum at x-1; the confirming quarter is x+1.
        let Some(&(next_label, next_value)) = obs.get(x + 1) else {
            return Err(AnalysisError::NoRecessionEndFound(
                EndScanFailure::ConfirmationBeyondSeries,
            ));
        };
        let next = check_finite(next_label, next_value)?;
        if next > here {
            return Ok(next_label);
        }
    }
    Err(AnalysisError::NoRecessionEndFound(EndScanFailure::PatternAbsent))
}

/// Minimum-value quarter over labels in (`before_start`, `end`]; the earliest
/// label wins ties.
pub fn find_bottom(
    series: &QuarterlySeries,
    before_start: Quarter,
    end: Quarter,
) -> Result<Quarter, AnalysisError> {
    let window = series.between(before_start, end);

    let mut best: Option<(Quarter, f64)> = None;
    for &(quarter, value) in window.observations() {
        let value = check_finite(quarter, value)?;
        match best {
            Some((_, lowest)) if value >= lowest => {}
            _ => best = Some((quarter, value)),
        }
    }
    // The window always contains `end` when the detector produced it; an
    // empty window can only come from caller-supplied labels.
    best.map(|(quarter, _)| quarter)
        .ok_or(AnalysisError::InsufficientData(0))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn q(year: u16, quarter: u8) -> Quarter {
        Quarter::new(year, quarter).unwrap()
    }

    /// Series with consecutive quarterly labels starting at 2000q1.
    fn series(values: &[f64]) -> QuarterlySeries {
        let observations = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let year = 2000 + (i / 4) as u16;
                (q(year, (i % 4) as u8 + 1), v)
            })
            .collect();
        QuarterlySeries::from_observations(observations)
    }

    #[test]
    fn test_nine_quarter_scenario() {
        // q1..q9 = 2000q1..2002q1
        let s = series(&[100.0, 101.0, 99.0, 98.0, 97.0, 99.0, 100.0, 101.0, 102.0]);
        let window = detect_recession(&s).unwrap();
        assert_eq!(window.before_start, q(2000, 2)); // 101 -> 99 -> 98
        assert_eq!(window.bottom, q(2001, 1)); // value 97
        assert_eq!(window.end, q(2001, 3)); // one quarter past confirmed growth
    }

    #[test]
    fn test_synthetic_pattern_at_known_position() {
        // decline-decline then three quarters of growth, inserted after a rise
        let s = series(&[10.0, 11.0, 12.0, 11.0, 10.0, 11.0, 12.0, 13.0]);
        let window = detect_recession(&s).unwrap();
        assert_eq!(window.before_start, q(2000, 3));
        assert_eq!(window.bottom, q(2001, 1));
        assert_eq!(window.end, q(2001, 3));
    }

    #[test]
    fn test_turning_points_are_ordered() {
        let s = series(&[100.0, 101.0, 99.0, 98.0, 97.0, 99.0, 100.0, 101.0, 102.0]);
        let window = detect_recession(&s).unwrap();
        assert!(window.before_start < window.bottom);
        assert!(window.bottom <= window.end);
    }

    #[test]
    fn test_bottom_matches_brute_force_minimum() {
        let s = series(&[50.0, 49.0, 45.0, 47.0, 44.0, 46.0, 48.0, 49.0]);
        let window = detect_recession(&s).unwrap();

        let brute = s
            .observations()
            .iter()
            .filter(|(label, _)| *label > window.before_start && *label <= window.end)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
            .unwrap()
            .0;
        assert_eq!(window.bottom, brute);
    }

    #[test]
    fn test_bottom_tie_returns_earliest_label() {
        let s = series(&[5.0, 3.0, 3.0, 4.0]);
        let bottom = find_bottom(&s, q(2000, 1), q(2000, 4)).unwrap();
        assert_eq!(bottom, q(2000, 2));
    }

    #[test]
    fn test_too_few_quarters() {
        let s = series(&[100.0, 99.0]);
        assert_eq!(
            detect_recession(&s).unwrap_err(),
            AnalysisError::InsufficientData(2)
        );
    }

    #[test]
    fn test_monotonic_growth_has_no_recession() {
        let s = series(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(detect_recession(&s).unwrap_err(), AnalysisError::NoRecessionFound);
    }

    #[test]
    fn test_decline_without_recovery_has_no_end() {
        let s = series(&[10.0, 9.0, 8.0, 7.0, 6.0]);
        assert_eq!(
            detect_recession(&s).unwrap_err(),
            AnalysisError::NoRecessionEndFound(EndScanFailure::PatternAbsent)
        );
    }

    #[test]
    fn test_unconfirmed_recovery_is_distinct_from_pattern_absent() {
        // 10,9,8,7,8: growth resumes on the last quarter, nothing to confirm it
        let s = series(&[10.0, 9.0, 8.0, 7.0, 8.0]);
        assert_eq!(
            detect_recession(&s).unwrap_err(),
            AnalysisError::NoRecessionEndFound(EndScanFailure::ConfirmationBeyondSeries)
        );
    }

    #[test]
    fn test_non_finite_value_in_window_is_rejected() {
        let s = series(&[100.0, 101.0, f64::NAN, 98.0]);
        assert_eq!(
            detect_recession(&s).unwrap_err(),
            AnalysisError::InvalidSeriesValue { quarter: q(2000, 3) }
        );
    }

    #[test]
    fn test_flat_quarters_do_not_count_as_decline() {
        let s = series(&[100.0, 100.0, 100.0, 100.0]);
        assert_eq!(detect_recession(&s).unwrap_err(), AnalysisError::NoRecessionFound);
    }
}
