// Quarter labels and the quarterly observation series
//
// Shared domain types imported by the loaders and the detector.
// No I/O here — only values and their ordering.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// QUARTER LABEL
// ============================================================================

/// A calendar quarter, e.g. `2008q3`.
///
/// Totally ordered (year first, then quarter number), so labels can be used
/// both as sequence indices in the GDP series and as column keys in the
/// housing price table. Both input sources share this label space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quarter {
    pub year: u16,
    pub quarter: u8, // 1..=4
}

#[derive(Debug, Error, PartialEq)]
#[error("invalid quarter label '{0}' (expected e.g. 2005q3)")]
pub struct ParseQuarterError(pub String);

impl Quarter {
    pub fn new(year: u16, quarter: u8) -> Result<Self, ParseQuarterError> {
        if !(1..=4).contains(&quarter) {
            return Err(ParseQuarterError(format!("{}q{}", year, quarter)));
        }
        Ok(Quarter { year, quarter })
    }

    /// Quarter containing the given calendar month (1..=12).
    pub fn from_month(year: u16, month: u8) -> Result<Self, ParseQuarterError> {
        if !(1..=12).contains(&month) {
            return Err(ParseQuarterError(format!("{}-{:02}", year, month)));
        }
        Quarter::new(year, (month - 1) / 3 + 1)
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}q{}", self.year, self.quarter)
    }
}

impl FromStr for Quarter {
    type Err = ParseQuarterError;

    /// Parses the `2005q3` textual form used by both input sources.
    /// Accepts an uppercase `Q` as well.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseQuarterError(s.to_string());
        let (year, quarter) = s
            .split_once(['q', 'Q'])
            .ok_or_else(err)?;
        let year: u16 = year.trim().parse().map_err(|_| err())?;
        let quarter: u8 = quarter.trim().parse().map_err(|_| err())?;
        Quarter::new(year, quarter).map_err(|_| err())
    }
}

// Serialize as the textual label so JSON reports read "2008q3",
// not {"year":2008,"quarter":3}.
impl Serialize for Quarter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Quarter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// QUARTERLY SERIES
// ============================================================================

/// An ordered quarterly observation series (label, value).
///
/// Labels are strictly increasing with no duplicates; the loader applies the
/// epoch filter before constructing one of these. Values may be non-finite if
/// the source was malformed — the detector rejects those when it reaches them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuarterlySeries {
    observations: Vec<(Quarter, f64)>,
}

impl QuarterlySeries {
    /// Build a series from unordered observations. Sorts by label and keeps
    /// the first observation when a label repeats.
    pub fn from_observations(mut observations: Vec<(Quarter, f64)>) -> Self {
        observations.sort_by_key(|(q, _)| *q);
        observations.dedup_by_key(|(q, _)| *q);
        QuarterlySeries { observations }
    }

    pub fn observations(&self) -> &[(Quarter, f64)] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Sub-series with labels strictly after `q`.
    pub fn after(&self, q: Quarter) -> QuarterlySeries {
        QuarterlySeries {
            observations: self
                .observations
                .iter()
                .copied()
                .filter(|(label, _)| *label > q)
                .collect(),
        }
    }

    /// Sub-series with labels in the open-closed range (`from`, `to`].
    pub fn between(&self, from: Quarter, to: Quarter) -> QuarterlySeries {
        QuarterlySeries {
            observations: self
                .observations
                .iter()
                .copied()
                .filter(|(label, _)| *label > from && *label <= to)
                .collect(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
