// GDP quarterly series loader
//
// Reads the CSV export of the BEA gdplev sheet: one row per quarter with the
// quarter label ("2000q1") and chained-dollars GDP. The raw sheet carries
// header chatter and annual summary rows whose label column is a bare year;
// anything that does not parse as a quarter label is skipped before the
// epoch filter is applied.

use crate::quarters::{Quarter, QuarterlySeries};
use anyhow::{Context, Result};
use log::{info, warn};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Analysis epoch: quarters before this are dropped (the study window starts
/// at the first quarter of 2000).
pub const DEFAULT_EPOCH: Quarter = Quarter {
    year: 2000,
    quarter: 1,
};

// Column positions in the two-column export (label, chained value).
const QUARTER_COL: usize = 0;
const VALUE_COL: usize = 1;

/// Load the quarterly GDP series from `path`, keeping only quarters at or
/// after `epoch`, sorted chronologically.
pub fn load_quarterly_series(path: &Path, epoch: Quarter) -> Result<QuarterlySeries> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open GDP series: {}", path.display()))?;
    let series = read_quarterly_series(file, epoch)
        .with_context(|| format!("Failed to parse GDP series: {}", path.display()))?;
    info!(
        "Loaded {} quarters from {} (epoch {})",
        series.len(),
        path.display(),
        epoch
    );
    Ok(series)
}

/// Parse the series from any reader. Rows with a blank value cell are skipped
/// (trailing quarters the source has not published yet); a non-blank value
/// that fails numeric coercion is an error, not a skip.
pub fn read_quarterly_series<R: Read>(input: R, epoch: Quarter) -> Result<QuarterlySeries> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let mut observations = Vec::new();

    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read GDP row {}", row + 1))?;

        let label = record.get(QUARTER_COL).unwrap_or("").trim();
        let quarter = match Quarter::from_str(label) {
            // Header rows, annual summary rows, blank separators.
            Err(_) => continue,
            Ok(q) => q,
        };

        let cell = record.get(VALUE_COL).unwrap_or("").trim();
        if cell.is_empty() {
            warn!("GDP row {} ({}) has no value, skipping", row + 1, quarter);
            continue;
        }
        // Source formats thousands with commas.
        let value: f64 = cell.replace(',', "").parse().with_context(|| {
            format!("GDP row {} ({}): non-numeric value '{}'", row + 1, quarter, cell)
        })?;

        if quarter >= epoch {
            observations.push((quarter, value));
        }
    }

    Ok(QuarterlySeries::from_observations(observations))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(csv: &str) -> QuarterlySeries {
        read_quarterly_series(Cursor::new(csv), DEFAULT_EPOCH).unwrap()
    }

    #[test]
    fn test_read_filters_epoch_and_skips_header() {
        let series = read(
            "quarter,gdp\n\
             1999q3,9378.1\n\
             1999q4,9479.1\n\
             2000q1,9821.2\n\
             2000q2,9862.0\n",
        );
        assert_eq!(series.len(), 2);
        assert_eq!(series.observations()[0].0.to_string(), "2000q1");
        assert_eq!(series.observations()[0].1, 9821.2);
    }

    #[test]
    fn test_read_skips_annual_rows_and_blank_values() {
        let series = read(
            "2000,38000.0\n\
             2000q1,9821.2\n\
             2000q2,\n\
             2000q3,9899.6\n",
        );
        assert_eq!(series.len(), 2);
        assert_eq!(series.observations()[1].0.to_string(), "2000q3");
    }

    #[test]
    fn test_read_coerces_comma_formatted_values() {
        let series = read("2000q1,\"12,359.1\"\n");
        assert_eq!(series.observations()[0].1, 12359.1);
    }

    #[test]
    fn test_read_sorts_out_of_order_rows() {
        let series = read("2000q2,9862.0\n2000q1,9821.2\n");
        assert_eq!(series.observations()[0].0.to_string(), "2000q1");
    }

    #[test]
    fn test_read_rejects_non_numeric_value() {
        let err =
            read_quarterly_series(Cursor::new("2000q1,not-a-number\n"), DEFAULT_EPOCH).unwrap_err();
        assert!(err.to_string().contains("non-numeric"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let path = Path::new("/nonexistent/gdplev.csv");
        assert!(load_quarterly_series(path, DEFAULT_EPOCH).is_err());
    }
}
