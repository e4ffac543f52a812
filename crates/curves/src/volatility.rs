//! Grouped trailing-window volatility.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tenorscope_math::RollingWindow;
use tenorscope_traits::{CurveTransform, TransformError};
use tenorscope_utils::{DATE_COL, VALUE_COL, coerce_dates, date_column};
use tracing::debug;

/// Configuration for rolling volatility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolatilityConfig {
    /// Column holding the (usually differenced) values.
    pub value_col: String,
    /// Date column used for ordering, skipped if absent.
    pub date_col: String,
    /// Grouping columns; absent ones are ignored.
    pub group_cols: Vec<String>,
    /// Trailing window length in rows.
    pub window: usize,
    /// Present observations required per window, defaults to `window`.
    pub min_periods: Option<usize>,
    /// Scale by the square root of `periods_per_year`.
    pub annualize: bool,
    /// Periods per year used for annualization.
    pub periods_per_year: u32,
    /// Name of the appended column.
    pub output_col: String,
}

impl Default for VolatilityConfig {
    fn default() -> Self {
        Self {
            value_col: VALUE_COL.to_string(),
            date_col: DATE_COL.to_string(),
            group_cols: Vec::new(),
            window: 21, // ~1 trading month
            min_periods: None,
            annualize: false,
            periods_per_year: 252,
            output_col: "rolling_volatility".to_string(),
        }
    }
}

/// Rolling population standard deviation, per group, in date order.
///
/// The output is the input stably sorted by (group keys, date) with the
/// value column coerced to floats, the date column coerced to dates and the
/// volatility appended as `output_col`.
#[derive(Debug, Clone, Default)]
pub struct RollingVolatility {
    config: VolatilityConfig,
}

impl RollingVolatility {
    /// Create an engine with a 21-row window.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with a custom configuration.
    #[must_use]
    pub const fn with_config(config: VolatilityConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &VolatilityConfig {
        &self.config
    }

    fn rolling_window(&self) -> Result<RollingWindow, TransformError> {
        RollingWindow::new(self.config.window, self.config.min_periods)
            .map_err(|e| TransformError::Validation(e.to_string()))
    }
}

impl CurveTransform for RollingVolatility {
    fn name(&self) -> &str {
        "rolling_volatility"
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![self.config.value_col.as_str()]
    }

    fn validate(&self) -> Result<(), TransformError> {
        self.rolling_window()?;
        if self.config.periods_per_year == 0 {
            return Err(TransformError::Validation("periods_per_year must be positive".to_string()));
        }
        Ok(())
    }

    fn apply(&self, data: &DataFrame) -> Result<DataFrame, TransformError> {
        self.validate()?;
        self.check_schema(data)?;
        let window = self.rolling_window()?;
        let config = &self.config;

        let mut groups: Vec<&str> = Vec::new();
        for name in &config.group_cols {
            if data.column(name).is_ok() {
                groups.push(name);
            } else {
                debug!(column = %name, "group column absent, ignoring");
            }
        }

        let mut frame = data.clone();
        let mut sort_by: Vec<&str> = groups.clone();
        match data.column(&config.date_col) {
            Ok(column) => {
                frame.with_column(date_column(&config.date_col, &coerce_dates(column)?)?)?;
                sort_by.push(&config.date_col);
            }
            Err(_) => debug!(column = %config.date_col, "date column absent, keeping input order"),
        }

        let value = col(&config.value_col)
            .cast(DataType::Float64)
            .fill_nan(lit(NULL).cast(DataType::Float64))
            .alias(&config.value_col);

        let mut volatility = window.population_std(col(&config.value_col));
        if !groups.is_empty() {
            volatility = volatility.over(groups.iter().map(|name| col(*name)).collect::<Vec<_>>());
        }
        if config.annualize {
            volatility = volatility * lit(f64::from(config.periods_per_year).sqrt());
        }

        let mut lf = frame.lazy().with_column(value);
        if !sort_by.is_empty() {
            lf = lf.sort(
                sort_by,
                SortMultipleOptions::new().with_nulls_last(true).with_maintain_order(true),
            );
        }
        Ok(lf.with_column(volatility.alias(&config.output_col)).collect()?)
    }
}

/// Compute rolling volatility over long-form data.
///
/// # Errors
/// Returns `TransformError::Validation` for an invalid window, min-periods or
/// periods-per-year, and `TransformError::Schema` without the value column.
pub fn compute_rolling_volatility(
    data: &DataFrame,
    config: &VolatilityConfig,
) -> Result<DataFrame, TransformError> {
    RollingVolatility::with_config(config.clone()).apply(data)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::rstest;

    use super::*;

    fn floats(frame: &DataFrame, name: &str) -> Vec<Option<f64>> {
        frame.column(name).unwrap().f64().unwrap().into_iter().collect()
    }

    #[test]
    fn min_periods_gating() {
        let config = VolatilityConfig { window: 5, min_periods: Some(5), ..Default::default() };

        let short = df! {
            "date" => &["2026-01-01", "2026-01-02", "2026-01-03", "2026-01-04"],
            "value" => &[1.0, 2.0, 3.0, 4.0],
        }
        .unwrap();
        let result = compute_rolling_volatility(&short, &config).unwrap();
        assert!(floats(&result, "rolling_volatility").iter().all(Option::is_none));

        let full = df! {
            "date" => &["2026-01-01", "2026-01-02", "2026-01-03", "2026-01-04", "2026-01-05"],
            "value" => &[1.0, 2.0, 3.0, 4.0, 5.0],
        }
        .unwrap();
        let result = compute_rolling_volatility(&full, &config).unwrap();
        let vol = floats(&result, "rolling_volatility");
        assert!(vol[..4].iter().all(Option::is_none));
        assert_relative_eq!(vol[4].unwrap(), 2.0_f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn groups_sort_independently() {
        let df = df! {
            "date" => &["2026-01-02", "2026-01-01", "2026-01-02", "2026-01-01"],
            "tenor" => &["2y", "2y", "10y", "10y"],
            "value" => &[3.0, 1.0, 10.0, 10.0],
        }
        .unwrap();
        let config = VolatilityConfig {
            group_cols: vec!["tenor".to_string()],
            window: 2,
            ..Default::default()
        };

        let result = compute_rolling_volatility(&df, &config).unwrap();
        let tenors: Vec<&str> = result.column("tenor").unwrap().str().unwrap().into_no_null_iter().collect();
        assert_eq!(tenors, vec!["10y", "10y", "2y", "2y"]);
        assert_eq!(floats(&result, "value"), vec![Some(10.0), Some(10.0), Some(1.0), Some(3.0)]);

        let vol = floats(&result, "rolling_volatility");
        assert_eq!(vol[0], None);
        assert_relative_eq!(vol[1].unwrap(), 0.0, epsilon = 1e-9);
        assert_eq!(vol[2], None);
        assert_relative_eq!(vol[3].unwrap(), 1.0, epsilon = 1e-9);
        assert_eq!(result.column("date").unwrap().dtype(), &DataType::Date);
    }

    #[test]
    fn numeric_groups_and_missing_keys_last() {
        let df = df! {
            "maturity_years" => &[Some(10.0), None, Some(2.0)],
            "value" => &[1.0, 2.0, 3.0],
        }
        .unwrap();
        let config = VolatilityConfig {
            group_cols: vec!["maturity_years".to_string()],
            window: 1,
            ..Default::default()
        };

        let result = compute_rolling_volatility(&df, &config).unwrap();
        assert_eq!(floats(&result, "maturity_years"), vec![Some(2.0), Some(10.0), None]);
        assert_eq!(floats(&result, "rolling_volatility"), vec![Some(0.0); 3]);
    }

    #[test]
    fn absent_group_and_date_columns_are_ignored() {
        let df = df! { "value" => &[1.0, 3.0] }.unwrap();
        let config = VolatilityConfig {
            group_cols: vec!["maturity_years".to_string()],
            window: 2,
            ..Default::default()
        };

        let result = compute_rolling_volatility(&df, &config).unwrap();
        assert_relative_eq!(floats(&result, "rolling_volatility")[1].unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn annualization() {
        let df = df! { "value" => &[1.0, 3.0] }.unwrap();
        let config = VolatilityConfig {
            window: 2,
            annualize: true,
            output_col: "vol".to_string(),
            ..Default::default()
        };

        let result = compute_rolling_volatility(&df, &config).unwrap();
        assert_relative_eq!(floats(&result, "vol")[1].unwrap(), 252.0_f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn stable_for_equal_dates() {
        let df = df! {
            "date" => &["2026-01-01", "2026-01-01", "2026-01-01"],
            "value" => &[3.0, 1.0, 2.0],
        }
        .unwrap();
        let result =
            compute_rolling_volatility(&df, &VolatilityConfig { window: 1, ..Default::default() }).unwrap();
        assert_eq!(floats(&result, "value"), vec![Some(3.0), Some(1.0), Some(2.0)]);
    }

    #[test]
    fn missing_value_column() {
        let df = df! { "date" => &["2026-01-01"] }.unwrap();
        let err = compute_rolling_volatility(&df, &VolatilityConfig::default()).unwrap_err();
        assert!(err.is_schema());
    }

    #[rstest]
    #[case(0, None, 252)]
    #[case(5, Some(0), 252)]
    #[case(5, Some(6), 252)]
    #[case(5, None, 0)]
    fn invalid_parameters(#[case] window: usize, #[case] min_periods: Option<usize>, #[case] periods_per_year: u32) {
        let df = df! { "value" => &[1.0] }.unwrap();
        let config = VolatilityConfig { window, min_periods, periods_per_year, ..Default::default() };
        assert!(compute_rolling_volatility(&df, &config).unwrap_err().is_validation());
    }

    #[test]
    fn input_is_untouched() {
        let df = df! {
            "date" => &["2026-01-02", "2026-01-01"],
            "value" => &["2.0", "1.0"],
        }
        .unwrap();
        let snapshot = df.clone();
        let config = VolatilityConfig { window: 2, ..Default::default() };

        let first = compute_rolling_volatility(&df, &config).unwrap();
        let second = compute_rolling_volatility(&df, &config).unwrap();
        assert!(first.equals_missing(&second));
        assert!(df.equals_missing(&snapshot));
        assert_eq!(floats(&first, "value"), vec![Some(1.0), Some(2.0)]);
    }
}
