//! Benchmarks for tenorscope-curves transforms.
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use polars::prelude::*;
use rand::Rng;
use tenorscope_curves::{
    FactorConfig, RegimeConfig, SpreadConfig, VolatilityConfig, calculate_spreads,
    compute_rolling_volatility, extract_level_slope_curvature, label_regimes,
};

const MATURITIES: [f64; 8] = [1.0, 2.0, 3.0, 5.0, 7.0, 10.0, 20.0, 30.0];

/// Long-form random-walk panel with `n_dates` business days.
fn random_panel(n_dates: usize) -> DataFrame {
    let mut rng = rand::thread_rng();
    let mut dates = Vec::with_capacity(n_dates * MATURITIES.len());
    let mut maturities = Vec::with_capacity(n_dates * MATURITIES.len());
    let mut values = Vec::with_capacity(n_dates * MATURITIES.len());

    let mut curve: Vec<f64> = MATURITIES.iter().map(|m| 3.0 + 0.05 * m).collect();
    for day in 0..n_dates {
        for (level, maturity) in curve.iter_mut().zip(MATURITIES) {
            *level += rng.r#gen::<f64>() * 0.1 - 0.05;
            dates.push(day as i32);
            maturities.push(maturity);
            values.push(*level);
        }
    }

    DataFrame::new(vec![
        Column::new("date".into(), dates).cast(&DataType::Date).unwrap(),
        Column::new("maturity_years".into(), maturities),
        Column::new("value".into(), values),
    ])
    .unwrap()
}

fn bench_spreads(c: &mut Criterion) {
    let mut group = c.benchmark_group("calculate_spreads");

    for n_dates in [250, 2500, 10000] {
        group.throughput(Throughput::Elements((n_dates * MATURITIES.len()) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n_dates), &n_dates, |b, &n_dates| {
            let panel = random_panel(n_dates);
            let config = SpreadConfig::default();
            b.iter(|| calculate_spreads(black_box(&panel), &config).unwrap());
        });
    }

    group.finish();
}

fn bench_factors(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_level_slope_curvature");

    for n_dates in [250, 2500, 10000] {
        group.throughput(Throughput::Elements((n_dates * MATURITIES.len()) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n_dates), &n_dates, |b, &n_dates| {
            let panel = random_panel(n_dates);
            let config = FactorConfig::default();
            b.iter(|| extract_level_slope_curvature(black_box(&panel), &config).unwrap());
        });
    }

    group.finish();
}

fn bench_volatility(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_rolling_volatility");

    for n_dates in [250, 2500, 10000] {
        group.throughput(Throughput::Elements((n_dates * MATURITIES.len()) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n_dates), &n_dates, |b, &n_dates| {
            let panel = random_panel(n_dates);
            let config = VolatilityConfig {
                group_cols: vec!["maturity_years".to_string()],
                min_periods: Some(10),
                ..Default::default()
            };
            b.iter(|| compute_rolling_volatility(black_box(&panel), &config).unwrap());
        });
    }

    group.finish();
}

fn bench_regimes(c: &mut Criterion) {
    let mut group = c.benchmark_group("label_regimes");

    for n_dates in [250, 2500, 10000] {
        group.bench_with_input(BenchmarkId::from_parameter(n_dates), &n_dates, |b, &n_dates| {
            let mut rng = rand::thread_rng();
            let slope: Vec<f64> = (0..n_dates).map(|_| rng.r#gen::<f64>() * 2.0 - 1.0).collect();
            let level: Vec<f64> = (0..n_dates).map(|_| rng.r#gen::<f64>() * 6.0).collect();
            let vol: Vec<f64> = (0..n_dates).map(|_| rng.r#gen::<f64>()).collect();
            let frame = df! {
                "slope" => slope,
                "level" => level,
                "rolling_volatility" => vol,
            }
            .unwrap();
            let config = RegimeConfig::default();
            b.iter(|| label_regimes(black_box(&frame), &config).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_spreads, bench_factors, bench_volatility, bench_regimes);

criterion_main!(benches);
