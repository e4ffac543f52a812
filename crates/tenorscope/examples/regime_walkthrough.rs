//! Example: From a handful of curve observations to regime labels
//!
//! Walks through each transform on its own with a small hand-built curve:
//! nearest-maturity spreads (with and without a gap limit), level/slope/
//! curvature factors, rolling volatility and the regime labeler.

use chrono::NaiveDate;
use polars::prelude::*;
use rand_distr::{Distribution, Normal};
use tenorscope::{
    curves::{
        FactorConfig, RegimeConfig, RegimeLabeler, SpreadConfig, VolatilityConfig, calculate_spreads,
        compute_rolling_volatility, extract_level_slope_curvature, label_regimes,
    },
    primitives::Observation,
    utils::observations_frame,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // =========================================================================
    // A SPARSE CURVE
    // =========================================================================

    // No 10y point: 10y_2y resolves to the 7y unless a gap limit excludes it.
    let maturities = [0.5, 2.0, 5.0, 7.0, 30.0];
    let base = [5.30, 4.70, 4.30, 4.25, 4.45];
    let start = NaiveDate::from_ymd_opt(2026, 3, 2).ok_or("invalid date")?;

    let mut rng = rand::thread_rng();
    let move_bp = Normal::new(0.0, 0.04)?;

    let mut observations = Vec::new();
    let mut shift = 0.0;
    for day in start.iter_days().take(40) {
        shift += move_bp.sample(&mut rng);
        for (&maturity, &level) in maturities.iter().zip(&base) {
            observations.push(Observation::new(day, maturity, level + shift));
        }
    }
    let curve = observations_frame(&observations)?;
    println!("=== Observations ===\n{}\n", curve.head(Some(5)));

    // =========================================================================
    // SPREADS
    // =========================================================================

    let spreads = calculate_spreads(&curve, &SpreadConfig::default())?;
    println!("=== Spreads, no gap limit ===\n{}\n", spreads.head(Some(3)));

    let strict = SpreadConfig { max_maturity_gap: Some(1.0), ..Default::default() };
    let spreads = calculate_spreads(&curve, &strict)?;
    println!("=== Spreads, gap limit 1y ===\n{}\n", spreads.head(Some(3)));

    // =========================================================================
    // FACTORS
    // =========================================================================

    let factors = extract_level_slope_curvature(&curve, &FactorConfig::default())?;
    println!("=== Factors ===\n{}\n", factors.select(["date", "level", "slope", "curvature"])?.head(Some(5)));

    // =========================================================================
    // VOLATILITY AND REGIMES
    // =========================================================================

    let seven_year = curve.clone().lazy().filter(col("maturity_years").eq(lit(7.0))).collect()?;
    let volatility = compute_rolling_volatility(
        &seven_year,
        &VolatilityConfig { window: 10, min_periods: Some(5), ..Default::default() },
    )?;
    println!("=== Rolling volatility of the 7y level ===\n{}\n", volatility.tail(Some(5)));

    let inputs = factors
        .lazy()
        .select([col("date"), col("level"), col("slope")])
        .join(
            volatility.lazy().select([col("date"), col("rolling_volatility")]),
            [col("date")],
            [col("date")],
            JoinArgs::new(JoinType::Left),
        )
        .collect()?;

    let config = RegimeConfig::default();
    let labelled = label_regimes(&inputs, &config)?;
    println!("=== Regimes ===\n{}\n", labelled.tail(Some(5)));

    // The thresholds come from the history itself.
    let labeler = RegimeLabeler::with_config(config);
    let level: Vec<Option<f64>> = inputs.column("level")?.f64()?.into_iter().collect();
    let vol: Vec<Option<f64>> = inputs.column("rolling_volatility")?.f64()?.into_iter().collect();
    let thresholds = labeler.thresholds(&level, &vol)?;
    println!(
        "level low <= {:?}, level high >= {:?}, volatility high >= {:?}",
        thresholds.level_low, thresholds.level_high, thresholds.volatility_high
    );

    Ok(())
}
