// Recession Impact - Core Library
// Exposes all modules for use in the CLI and tests

pub mod compare;
pub mod gdp;
pub mod housing;
pub mod quarters;
pub mod recession;
pub mod states;
pub mod stats;
pub mod towns;

// Re-export commonly used types
pub use compare::{
    compare_cohorts, compute_ratios, evaluate_recession_impact, partition_cohorts, Cohort,
    ImpactReport, ImpactVerdict, RatioRecord, SIGNIFICANCE_LEVEL,
};
pub use gdp::{load_quarterly_series, read_quarterly_series, DEFAULT_EPOCH};
pub use housing::{load_price_table, read_price_table, PriceTable};
pub use quarters::{ParseQuarterError, Quarter, QuarterlySeries};
pub use recession::{
    detect_recession, find_before_start, find_bottom, find_end, AnalysisError, EndScanFailure,
    RecessionWindow,
};
pub use states::{LocationKey, StateLookup};
pub use stats::{two_sample_ttest, TTestOutcome};
pub use towns::{load_cohort_set, parse_cohort_set, CohortSet};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
