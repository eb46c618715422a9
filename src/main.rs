use anyhow::{bail, Result};
use std::env;
use std::path::Path;

use recession_impact::{
    evaluate_recession_impact, load_cohort_set, load_price_table, load_quarterly_series,
    StateLookup, DEFAULT_EPOCH,
};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let json = args.iter().any(|arg| arg == "--json");
    let paths: Vec<&String> = args[1..].iter().filter(|arg| *arg != "--json").collect();

    if paths.len() != 3 {
        eprintln!("Usage: recession-impact <gdplev.csv> <city_zhvi.csv> <university_towns.txt> [--json]");
        bail!("expected 3 input paths, got {}", paths.len());
    }

    run_analysis(
        Path::new(paths[0]),
        Path::new(paths[1]),
        Path::new(paths[2]),
        json,
    )
}

fn run_analysis(gdp_path: &Path, housing_path: &Path, towns_path: &Path, json: bool) -> Result<()> {
    let states = StateLookup::new();

    // 1. Load the three inputs
    let series = load_quarterly_series(gdp_path, DEFAULT_EPOCH)?;
    let prices = load_price_table(housing_path, &states)?;
    let towns = load_cohort_set(towns_path)?;

    // 2. Detect the window and run the comparison
    let report = evaluate_recession_impact(&series, &prices, &towns)?;

    // 3. Report
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("📊 Recession impact on housing prices");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("GDP quarters analyzed:   {}", series.len());
    println!("Locations priced:        {}", prices.len());
    println!("University towns:        {}", towns.len());
    println!();
    println!("Quarter before recession: {}", report.window.before_start);
    println!("Recession bottom:         {}", report.window.bottom);
    println!("Recession end:            {}", report.window.end);
    println!();
    println!(
        "t = {:.4}, p = {:.6} ({})",
        report.verdict.statistic,
        report.verdict.p_value,
        if report.verdict.significant {
            "significant at p < 0.01"
        } else {
            "not significant at p < 0.01"
        }
    );
    println!(
        "Lower mean price ratio (smaller decline): {}",
        report.verdict.lower_mean_cohort.as_str()
    );

    Ok(())
}
