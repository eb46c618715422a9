// University-town list parser
//
// The source is the Wikipedia "college towns" list pasted to a text file:
// state header lines tagged "[edit]", followed by one town per line, with
// footnote brackets and parenthesized university names as artifacts:
//
//   Alabama[edit]
//   Auburn (Auburn University)
//   Tuscaloosa (University of Alabama, Stillman College, Shelton State)[5]
//
// Parsed with an explicit line classifier instead of one large regex: each
// line is either a state header, a region entry under the current state, or
// blank.

use crate::states::LocationKey;
use anyhow::{bail, Context, Result};
use log::info;
use std::collections::BTreeSet;
use std::path::Path;

/// The "positive" cohort: locations classified as university towns.
pub type CohortSet = BTreeSet<LocationKey>;

/// One classified line of the town list.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// `Alabama[edit]` — everything from the first '[' is dropped.
    StateHeader(String),
    /// `Auburn (Auburn University)[5]` — everything from " (" (or, failing
    /// that, from the first '[') is dropped.
    RegionEntry(String),
    Blank,
}

fn classify(raw: &str) -> Line {
    let line = raw.trim_end_matches(['\n', '\r']);
    if line.trim().is_empty() {
        return Line::Blank;
    }
    if line.contains("[edit]") {
        let state = line.split('[').next().unwrap_or("").trim();
        return Line::StateHeader(state.to_string());
    }
    let region = match line.find(" (") {
        Some(at) => &line[..at],
        None => line.split('[').next().unwrap_or(line),
    };
    Line::RegionEntry(region.trim().to_string())
}

/// Parse the town list into a set of (state, region) keys. The state names in
/// the source are already spelled out, so no abbreviation expansion happens
/// here — only artifact stripping.
pub fn parse_cohort_set(text: &str) -> Result<CohortSet> {
    let mut cohort = CohortSet::new();
    let mut current_state: Option<String> = None;

    for (number, raw) in text.lines().enumerate() {
        match classify(raw) {
            Line::Blank => {}
            Line::StateHeader(state) => {
                if state.is_empty() {
                    bail!("Town list line {}: empty state header", number + 1);
                }
                current_state = Some(state);
            }
            Line::RegionEntry(region) => {
                if region.is_empty() {
                    continue;
                }
                let state = match &current_state {
                    Some(state) => state.clone(),
                    None => bail!(
                        "Town list line {}: region entry '{}' before any state header",
                        number + 1,
                        region
                    ),
                };
                cohort.insert(LocationKey::new(state, region));
            }
        }
    }

    Ok(cohort)
}

/// Load and parse the town list from disk.
pub fn load_cohort_set(path: &Path) -> Result<CohortSet> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read town list: {}", path.display()))?;
    let cohort = parse_cohort_set(&text)
        .with_context(|| format!("Failed to parse town list: {}", path.display()))?;
    info!("Parsed {} university towns from {}", cohort.len(), path.display());
    Ok(cohort)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Alabama[edit]
Auburn (Auburn University)
Florence (University of North Alabama)
Tuscaloosa (University of Alabama, Stillman College, Shelton State)[5]

Michigan[edit]
Ann Arbor (University of Michigan)
Ypsilanti (Eastern Michigan University)
";

    fn key(state: &str, region: &str) -> LocationKey {
        LocationKey::new(state, region)
    }

    #[test]
    fn test_parse_sample_list() {
        let cohort = parse_cohort_set(SAMPLE).unwrap();
        assert_eq!(cohort.len(), 5);
        assert!(cohort.contains(&key("Alabama", "Auburn")));
        assert!(cohort.contains(&key("Alabama", "Tuscaloosa")));
        assert!(cohort.contains(&key("Michigan", "Ann Arbor")));
        assert!(cohort.contains(&key("Michigan", "Ypsilanti")));
    }

    #[test]
    fn test_state_header_strips_edit_tag() {
        let cohort = parse_cohort_set("New York[edit]\nIthaca (Cornell)\n").unwrap();
        assert!(cohort.contains(&key("New York", "Ithaca")));
    }

    #[test]
    fn test_region_strips_paren_and_footnote_artifacts() {
        let cohort = parse_cohort_set(
            "Alabama[edit]\n\
             Tuscaloosa (University of Alabama)[5]\n\
             Livingston[6]\n",
        )
        .unwrap();
        assert!(cohort.contains(&key("Alabama", "Tuscaloosa")));
        assert!(cohort.contains(&key("Alabama", "Livingston")));
    }

    #[test]
    fn test_region_with_parenthesized_list_keeps_town_only() {
        let cohort =
            parse_cohort_set("Ohio[edit]\nAthens (Ohio University, Hocking College)\n").unwrap();
        assert_eq!(cohort.iter().next().unwrap().region, "Athens");
    }

    #[test]
    fn test_region_before_any_header_is_an_error() {
        let err = parse_cohort_set("Auburn (Auburn University)\n").unwrap_err();
        assert!(err.to_string().contains("before any state header"));
    }

    #[test]
    fn test_blank_lines_and_crlf_are_tolerated() {
        let cohort = parse_cohort_set("Alabama[edit]\r\n\r\nAuburn (AU)\r\n").unwrap();
        assert_eq!(cohort.len(), 1);
        assert!(cohort.contains(&key("Alabama", "Auburn")));
    }

    #[test]
    fn test_duplicate_towns_collapse_in_the_set() {
        let cohort =
            parse_cohort_set("Alabama[edit]\nAuburn (AU)\nAuburn (Auburn University)\n").unwrap();
        assert_eq!(cohort.len(), 1);
    }
}
