//! Example: Full analytics on a simulated yield curve history
//!
//! Simulates two years of daily Treasury curves from a three-factor
//! Nelson-Siegel random walk, writes them in the wide GSW layout and runs the
//! complete analytics bundle: spreads, factors, daily changes, rolling
//! volatility and regimes.

use chrono::{Duration, NaiveDate};
use polars::prelude::*;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use tenorscope::{
    analytics::{AnalyticsConfig, CurveAnalytics},
    utils::{GswOptions, normalize_gsw_frame},
};

const TENORS: &[(&str, f64)] =
    &[("3m", 0.25), ("1y", 1.0), ("2y", 2.0), ("5y", 5.0), ("7y", 7.0), ("10y", 10.0), ("20y", 20.0), ("30y", 30.0)];

const DAYS: usize = 504;

/// Nelson-Siegel loading of the slope factor.
fn slope_loading(maturity: f64, tau: f64) -> f64 {
    let x = maturity / tau;
    (1.0 - (-x).exp()) / x
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Simulated Curve History ===\n");

    let mut rng = rand::thread_rng();
    let shock = Normal::new(0.0, 0.03)?;
    let noise = Normal::new(0.0, 0.01)?;
    let tau = 1.8;

    let start = NaiveDate::from_ymd_opt(2024, 1, 2).ok_or("invalid start date")?;
    let mut beta = [4.2, -0.4, 0.3];

    let mut dates: Vec<String> = Vec::with_capacity(DAYS);
    let mut yields: Vec<Vec<Option<f64>>> = vec![Vec::with_capacity(DAYS); TENORS.len()];

    for day in 0..DAYS {
        // Volatility spikes in the second year.
        let scale = if day > DAYS / 2 { 2.5 } else { 1.0 };
        for b in &mut beta {
            *b += scale * shock.sample(&mut rng);
        }
        dates.push((start + Duration::days(day as i64)).format("%Y-%m-%d").to_string());

        for (series, &(_, maturity)) in yields.iter_mut().zip(TENORS) {
            // Occasional gaps in the long end.
            if maturity >= 20.0 && rng.r#gen::<f64>() < 0.02 {
                series.push(None);
                continue;
            }
            let slope = slope_loading(maturity, tau);
            let curvature = slope - (-maturity / tau).exp();
            let value = beta[0] + beta[1] * slope + beta[2] * curvature + noise.sample(&mut rng);
            series.push(Some(value));
        }
    }

    let mut columns = vec![Column::new("Date".into(), dates)];
    for (series, &(label, _)) in yields.into_iter().zip(TENORS) {
        columns.push(Column::new(label.into(), series));
    }
    let wide = DataFrame::new(columns)?;

    let dataset = normalize_gsw_frame(&wide, &GswOptions { source: "simulated".to_string(), ..Default::default() })?;
    println!(
        "Normalized {} dates x {} tenors into {} long rows\n",
        dataset.available_dates.len(),
        dataset.maturity_columns.len(),
        dataset.long.height()
    );

    // =========================================================================
    // ANALYTICS BUNDLE
    // =========================================================================

    let config = AnalyticsConfig::from_toml_str(
        r#"
        volatility_window = 63

        [[spreads]]
        name = "10y_3m"
        maturities = [10.0, 0.25]

        [[spreads]]
        name = "30y_10y"
        maturities = [30.0, 10.0]
        "#,
    )?;
    let analytics = CurveAnalytics::build(&dataset, &config)?;

    println!("Spreads (last 6 rows):");
    println!("{}\n", analytics.spreads.select(["date", "spread", "value", "long_maturity_used"])?.tail(Some(6)));

    println!("Curve factors (last 5 rows):");
    println!("{}\n", analytics.factors.select(["date", "level", "slope", "curvature"])?.tail(Some(5)));

    println!("Rolling volatility of daily changes, bp (last 8 rows):");
    println!("{}\n", analytics.volatility.tail(Some(8)));

    println!(
        "Level heatmap: {} dates x {} maturities",
        analytics.level_heatmap.dates().len(),
        analytics.level_heatmap.buckets().len()
    );

    println!("\n=== Regime Mix ===\n");
    for (regime, share) in analytics.regime_shares()? {
        println!("  {:<12} {share:>6.2}%", regime.display_label());
    }

    Ok(())
}
