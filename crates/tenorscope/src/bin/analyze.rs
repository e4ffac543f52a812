//! Term-structure analysis CLI tool.
//!
//! Loads a GSW-style curve file and prints the latest spreads, curve factors
//! and the regime mix.
//!
//! Usage: `cargo run --features cli --bin analyze -- CURVES.csv [--skip-rows 9] [--tail 5]`

use std::path::PathBuf;

use clap::Parser;
use polars::prelude::{BooleanChunked, PolarsResult};
use tenorscope::{
    analytics::{AnalyticsConfig, CurveAnalytics},
    primitives::Date,
    utils::{GswOptions, coerce_dates, parse_date, read_gsw_csv},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Spreads, level/slope/curvature factors and rate regimes for a yield curve file.
#[derive(Debug, Parser)]
#[command(name = "analyze", version, about, long_about = None)]
struct Args {
    /// Wide curve CSV: one date column plus one column per tenor.
    csv: PathBuf,

    /// TOML analytics configuration.
    #[arg(short, long, env = "TENORSCOPE_CONFIG")]
    config: Option<PathBuf>,

    /// Preamble lines before the header (9 for the raw Fed file).
    #[arg(long, default_value_t = 0)]
    skip_rows: usize,

    /// Rolling volatility window, overriding the configuration.
    #[arg(short, long)]
    window: Option<usize>,

    /// Name of the date column.
    #[arg(long, default_value = "Date")]
    date_col: String,

    /// Ignore dates before this one (YYYY-MM-DD).
    #[arg(long)]
    start: Option<String>,

    /// Number of latest dates to print.
    #[arg(short, long, default_value_t = 5)]
    tail: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AnalyticsConfig::load(path)?,
        None => AnalyticsConfig::default(),
    };
    if let Some(window) = args.window {
        config.volatility_window = window;
    }

    let start_date = match &args.start {
        Some(text) => Some(parse_date(text).ok_or_else(|| format!("invalid start date: {text}"))?),
        None => None,
    };
    let options = GswOptions {
        date_col: args.date_col.clone(),
        skip_rows: args.skip_rows,
        start_date,
        ..Default::default()
    };

    let dataset = read_gsw_csv(&args.csv, &options)?;
    info!(
        dates = dataset.available_dates.len(),
        tenors = dataset.maturity_columns.len(),
        "loaded curve file"
    );
    let analytics = CurveAnalytics::build(&dataset, &config)?;

    if let (Some(first), Some(last)) = (dataset.available_dates.first(), dataset.available_dates.last()) {
        println!(
            "\n{} dates from {first} to {last}, {} tenors\n",
            dataset.available_dates.len(),
            dataset.maturity_columns.len()
        );
    }

    print_latest_spreads(&analytics, args.tail)?;
    print_latest_factors(&analytics, args.tail)?;
    print_regime_mix(&analytics)?;

    Ok(())
}

fn print_latest_spreads(analytics: &CurveAnalytics, tail: usize) -> PolarsResult<()> {
    println!("=== Spreads (latest {tail} dates) ===\n");
    let Some(cutoff) = cutoff_date(analytics, tail)? else {
        println!("no spreads\n");
        return Ok(());
    };
    let mask: BooleanChunked = coerce_dates(analytics.spreads.column("date")?)?
        .into_iter()
        .map(|date| date.is_some_and(|date| date >= cutoff))
        .collect();
    let latest = analytics.spreads.filter(&mask)?.select(["date", "spread", "value"])?;
    println!("{latest}\n");
    Ok(())
}

fn print_latest_factors(analytics: &CurveAnalytics, tail: usize) -> PolarsResult<()> {
    println!("=== Curve factors (latest {tail} dates) ===\n");
    let latest = analytics.factors.select(["date", "level", "slope", "curvature"])?.tail(Some(tail));
    println!("{latest}\n");
    Ok(())
}

fn print_regime_mix(analytics: &CurveAnalytics) -> PolarsResult<()> {
    println!("=== Regime mix ===\n");
    match analytics.volatility_reference {
        Some(maturity) => println!("volatility reference maturity: {maturity}y"),
        None => println!("no volatility reference maturity"),
    }
    for (regime, share) in analytics.regime_shares()? {
        println!("  {:<24} {share:>6.2}%", regime.display_label());
    }
    println!();
    Ok(())
}

/// Earliest of the last `tail` factor dates.
fn cutoff_date(analytics: &CurveAnalytics, tail: usize) -> PolarsResult<Option<Date>> {
    let dates = analytics.dates()?;
    Ok(dates.len().checked_sub(tail.max(1)).map_or(dates.first(), |start| dates.get(start)).copied())
}
