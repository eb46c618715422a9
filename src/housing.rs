// Housing price table builder
//
// Reads the Zillow all-homes city file: one row per city, metadata columns
// (RegionID, RegionName, State, Metro, ...) followed by one mean-price column
// per month ("1996-04" .. "2016-08"). Months before 2000 are dropped, state
// abbreviations are expanded to full names, and the monthly columns are
// aggregated to quarterly means — the mean over whichever months of the
// quarter actually have a value.

use crate::quarters::Quarter;
use crate::states::{LocationKey, StateLookup};
use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use log::{info, warn};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// First month kept from the source's full date range.
const FIRST_YEAR: u16 = 2000;

// ============================================================================
// PRICE TABLE
// ============================================================================

/// Mean house price per location per quarter. A missing (location, quarter)
/// cell is simply absent. Each location appears at most once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    rows: BTreeMap<LocationKey, BTreeMap<Quarter, f64>>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row. Returns false (and keeps the existing row) if the
    /// location is already present.
    pub fn insert(&mut self, key: LocationKey, prices: BTreeMap<Quarter, f64>) -> bool {
        match self.rows.entry(key) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(prices);
                true
            }
        }
    }

    pub fn price(&self, key: &LocationKey, quarter: Quarter) -> Option<f64> {
        self.rows.get(key).and_then(|row| row.get(&quarter)).copied()
    }

    /// Whether any location carries a value for `quarter`.
    pub fn has_quarter(&self, quarter: Quarter) -> bool {
        self.rows.values().any(|row| row.contains_key(&quarter))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LocationKey, &BTreeMap<Quarter, f64>)> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// LOADER
// ============================================================================

/// Parse a monthly column header ("2000-01") into its quarter.
/// Returns `None` for metadata columns and for months before `FIRST_YEAR`.
fn month_column(header: &str) -> Option<Quarter> {
    let date = NaiveDate::parse_from_str(&format!("{}-01", header.trim()), "%Y-%m-%d").ok()?;
    let year = u16::try_from(date.year()).ok()?;
    if year < FIRST_YEAR {
        return None;
    }
    Quarter::from_month(year, date.month() as u8).ok()
}

/// Load the city price table from `path`, keyed by (full state name, region).
pub fn load_price_table(path: &Path, states: &StateLookup) -> Result<PriceTable> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open housing data: {}", path.display()))?;
    let table = read_price_table(file, states)
        .with_context(|| format!("Failed to parse housing data: {}", path.display()))?;
    info!("Loaded prices for {} locations from {}", table.len(), path.display());
    Ok(table)
}

/// Parse the city file from any reader.
pub fn read_price_table<R: Read>(input: R, states: &StateLookup) -> Result<PriceTable> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);

    let headers = reader.headers().context("Housing data has no header row")?.clone();
    let region_col = find_column(&headers, "RegionName")?;
    let state_col = find_column(&headers, "State")?;

    // Column index -> quarter, for every monthly column we keep.
    let quarter_cols: Vec<(usize, Quarter)> = headers
        .iter()
        .enumerate()
        .filter_map(|(idx, header)| month_column(header).map(|q| (idx, q)))
        .collect();
    if quarter_cols.is_empty() {
        bail!("Housing data has no monthly price columns from {} on", FIRST_YEAR);
    }

    let mut table = PriceTable::new();
    let mut skipped_states = 0usize;

    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read housing row {}", row + 2))?;

        let abbrev = record.get(state_col).unwrap_or("").trim();
        let region = record.get(region_col).unwrap_or("").trim();
        if region.is_empty() {
            warn!("Housing row {} has no region name, skipping", row + 2);
            continue;
        }
        let state = match states.expand(abbrev) {
            Some(full) => full,
            None => {
                warn!("Housing row {} ({}): unknown state '{}', skipping", row + 2, region, abbrev);
                skipped_states += 1;
                continue;
            }
        };

        // Mean over the months of each quarter that have a value.
        let mut sums: BTreeMap<Quarter, (f64, u32)> = BTreeMap::new();
        for &(idx, quarter) in &quarter_cols {
            let cell = record.get(idx).unwrap_or("").trim();
            if cell.is_empty() {
                continue;
            }
            let value: f64 = cell.parse().with_context(|| {
                format!("Housing row {} ({}): non-numeric price '{}'", row + 2, region, cell)
            })?;
            let slot = sums.entry(quarter).or_insert((0.0, 0));
            slot.0 += value;
            slot.1 += 1;
        }
        let prices: BTreeMap<Quarter, f64> = sums
            .into_iter()
            .map(|(quarter, (sum, count))| (quarter, sum / count as f64))
            .collect();

        let key = LocationKey::new(state, region);
        if !table.insert(key.clone(), prices) {
            warn!("Housing row {}: duplicate location {}, keeping first", row + 2, key);
        }
    }

    if skipped_states > 0 {
        warn!("Skipped {} housing rows with unknown state codes", skipped_states);
    }
    Ok(table)
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header == name)
        .with_context(|| format!("Housing data is missing the '{}' column", name))
}

// ============================================================================
// TESTS
// ============================================================================
