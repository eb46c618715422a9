// State name normalization + location keys
//
// The housing table identifies states by two-letter postal code, the
// university-town list spells them out. Every join in the pipeline goes
// through (full state name, region name) keys, so both loaders normalize
// through the same registry here.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// LOCATION KEY
// ============================================================================

/// A city-level location: full state name + region (city) name.
///
/// Both components are normalized — state abbreviations expanded through
/// `StateLookup`, bracket/paren artifacts stripped by the town-list parser.
/// `Ord` so price tables and cohort sets iterate deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocationKey {
    pub state: String,
    pub region: String,
}

impl LocationKey {
    pub fn new(state: impl Into<String>, region: impl Into<String>) -> Self {
        LocationKey {
            state: state.into(),
            region: region.into(),
        }
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.region, self.state)
    }
}

// ============================================================================
// STATE LOOKUP REGISTRY
// ============================================================================

/// Postal abbreviation → full state name, including territories and the
/// "NA" national aggregate row that appears in the housing source.
const STATE_TABLE: &[(&str, &str)] = &[
    ("AK", "Alaska"),
    ("AL", "Alabama"),
    ("AR", "Arkansas"),
    ("AS", "American Samoa"),
    ("AZ", "Arizona"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DC", "District of Columbia"),
    ("DE", "Delaware"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("GU", "Guam"),
    ("HI", "Hawaii"),
    ("IA", "Iowa"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("MA", "Massachusetts"),
    ("MD", "Maryland"),
    ("ME", "Maine"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MO", "Missouri"),
    ("MP", "Northern Mariana Islands"),
    ("MS", "Mississippi"),
    ("MT", "Montana"),
    ("NA", "National"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("NE", "Nebraska"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NV", "Nevada"),
    ("NY", "New York"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("PR", "Puerto Rico"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VA", "Virginia"),
    ("VI", "Virgin Islands"),
    ("VT", "Vermont"),
    ("WA", "Washington"),
    ("WI", "Wisconsin"),
    ("WV", "West Virginia"),
    ("WY", "Wyoming"),
];

/// Immutable abbreviation registry, built once and passed to the loaders
/// that need it. Not a mutable global — callers share it by reference.
#[derive(Debug, Clone)]
pub struct StateLookup {
    by_abbrev: HashMap<&'static str, &'static str>,
}

impl StateLookup {
    pub fn new() -> Self {
        StateLookup {
            by_abbrev: STATE_TABLE.iter().copied().collect(),
        }
    }

    /// Expand a postal abbreviation to the full state name.
    /// Returns `None` for anything not in the registry.
    pub fn expand(&self, abbrev: &str) -> Option<&'static str> {
        self.by_abbrev.get(abbrev.trim()).copied()
    }

    pub fn len(&self) -> usize {
        self.by_abbrev.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_abbrev.is_empty()
    }
}

impl Default for StateLookup {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_known_abbreviations() {
        let lookup = StateLookup::new();
        assert_eq!(lookup.expand("MI"), Some("Michigan"));
        assert_eq!(lookup.expand("DC"), Some("District of Columbia"));
        assert_eq!(lookup.expand("PR"), Some("Puerto Rico"));
    }

    #[test]
    fn test_expand_trims_whitespace() {
        let lookup = StateLookup::new();
        assert_eq!(lookup.expand(" TX "), Some("Texas"));
    }

    #[test]
    fn test_expand_unknown_returns_none() {
        let lookup = StateLookup::new();
        assert_eq!(lookup.expand("ZZ"), None);
        assert_eq!(lookup.expand(""), None);
    }

    #[test]
    fn test_registry_is_complete() {
        // 50 states + DC + 5 territories + the National aggregate row
        let lookup = StateLookup::new();
        assert_eq!(lookup.len(), 57);
    }

    #[test]
    fn test_location_key_ordering() {
        let a = LocationKey::new("Michigan", "Ann Arbor");
        let b = LocationKey::new("Michigan", "Ypsilanti");
        let c = LocationKey::new("Ohio", "Columbus");
        assert!(a < b);
        assert!(b < c);
    }
}
