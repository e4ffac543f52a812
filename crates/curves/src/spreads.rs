//! Named long-minus-short maturity spreads.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tenorscope_primitives::{SpreadDefinition, SpreadRecord};
use tenorscope_traits::{CurveTransform, TransformError};
use tenorscope_utils::{DATE_COL, VALUE_COL, date_column};
use tracing::debug;

use crate::{CurveColumns, CurvePivot, pivot::validate_max_gap};

/// Output columns of the spread table, in order.
pub const SPREAD_COLUMNS: [&str; 7] = [
    "date",
    "spread",
    "value",
    "long_maturity_target",
    "short_maturity_target",
    "long_maturity_used",
    "short_maturity_used",
];

/// The stock spreads: 10y-2y, 30y-10y and 5y-2y.
#[must_use]
pub fn default_spread_definitions() -> Vec<SpreadDefinition> {
    vec![
        SpreadDefinition::new("10y_2y", 10.0, 2.0),
        SpreadDefinition::new("30y_10y", 30.0, 10.0),
        SpreadDefinition::new("5y_2y", 5.0, 2.0),
    ]
}

/// Build a spread definition from loosely typed `(long, short)` legs.
///
/// # Errors
/// Returns `TransformError::Validation` unless exactly two legs are given.
pub fn spread_definition(name: &str, legs: &[f64]) -> Result<SpreadDefinition, TransformError> {
    match legs {
        [long, short] => Ok(SpreadDefinition::new(name, *long, *short)),
        _ => Err(TransformError::Validation(format!(
            "spread definition for '{name}' must be a (long, short) pair, got {} values",
            legs.len()
        ))),
    }
}

/// Configuration for spread calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadConfig {
    /// Spreads to compute.
    pub definitions: Vec<SpreadDefinition>,
    /// Input column names.
    pub columns: CurveColumns,
    /// Largest accepted distance between a target and the maturity used.
    pub max_maturity_gap: Option<f64>,
    /// Drop rows whose spread value is missing.
    pub dropna_values: bool,
}

impl Default for SpreadConfig {
    fn default() -> Self {
        Self {
            definitions: default_spread_definitions(),
            columns: CurveColumns::default(),
            max_maturity_gap: None,
            dropna_values: true,
        }
    }
}

/// Spread calculator over long-form curve data.
///
/// Each leg is resolved independently to the nearest available maturity and
/// every output row records both the requested and the used maturities.
#[derive(Debug, Clone, Default)]
pub struct SpreadCalculator {
    config: SpreadConfig,
}

impl SpreadCalculator {
    /// Create a calculator with the default spreads.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a calculator with a custom configuration.
    #[must_use]
    pub const fn with_config(config: SpreadConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &SpreadConfig {
        &self.config
    }

    /// Compute typed spread records, sorted by (date, spread).
    ///
    /// # Errors
    /// Returns `TransformError` on an invalid gap or a missing input column.
    pub fn compute(&self, data: &DataFrame) -> Result<Vec<SpreadRecord>, TransformError> {
        self.validate()?;
        if self.config.definitions.is_empty() {
            return Ok(Vec::new());
        }
        let pivot = CurvePivot::from_frame(data, &self.config.columns)?;
        Ok(self.from_pivot(&pivot))
    }

    /// Compute spread records from an existing pivot.
    #[must_use]
    pub fn from_pivot(&self, pivot: &CurvePivot) -> Vec<SpreadRecord> {
        if pivot.is_empty() {
            return Vec::new();
        }

        let mut records = Vec::with_capacity(pivot.dates().len() * self.config.definitions.len());
        for definition in &self.config.definitions {
            let long = pivot.resolve(definition.long_maturity, self.config.max_maturity_gap);
            let short = pivot.resolve(definition.short_maturity, self.config.max_maturity_gap);
            debug!(%definition, long_used = ?long.used, short_used = ?short.used, "resolved spread legs");

            for (row, date) in pivot.dates().iter().enumerate() {
                let value = long.values[row].zip(short.values[row]).map(|(l, s)| l - s);
                if value.is_none() && self.config.dropna_values {
                    continue;
                }
                records.push(SpreadRecord {
                    date: *date,
                    spread: definition.name.clone(),
                    value,
                    long_maturity_target: definition.long_maturity,
                    short_maturity_target: definition.short_maturity,
                    long_maturity_used: long.used,
                    short_maturity_used: short.used,
                });
            }
        }

        records.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.spread.cmp(&b.spread)));
        records
    }
}

impl CurveTransform for SpreadCalculator {
    fn name(&self) -> &str {
        "spreads"
    }

    fn required_columns(&self) -> Vec<&str> {
        self.config.columns.required()
    }

    fn validate(&self) -> Result<(), TransformError> {
        validate_max_gap(self.config.max_maturity_gap)
    }

    fn apply(&self, data: &DataFrame) -> Result<DataFrame, TransformError> {
        Ok(spreads_frame(&self.compute(data)?)?)
    }
}

/// Render spread records as a frame with [`SPREAD_COLUMNS`].
///
/// # Errors
/// Returns a polars error if the frame cannot be assembled.
pub fn spreads_frame(records: &[SpreadRecord]) -> PolarsResult<DataFrame> {
    let dates: Vec<_> = records.iter().map(|r| Some(r.date)).collect();
    let names: Vec<&str> = records.iter().map(|r| r.spread.as_str()).collect();
    let values: Vec<Option<f64>> = records.iter().map(|r| r.value).collect();
    let long_targets: Vec<f64> = records.iter().map(|r| r.long_maturity_target).collect();
    let short_targets: Vec<f64> = records.iter().map(|r| r.short_maturity_target).collect();
    let long_used: Vec<Option<f64>> = records.iter().map(|r| r.long_maturity_used).collect();
    let short_used: Vec<Option<f64>> = records.iter().map(|r| r.short_maturity_used).collect();

    DataFrame::new(vec![
        date_column(DATE_COL, &dates)?,
        Column::new("spread".into(), names),
        Column::new(VALUE_COL.into(), values),
        Column::new("long_maturity_target".into(), long_targets),
        Column::new("short_maturity_target".into(), short_targets),
        Column::new("long_maturity_used".into(), long_used),
        Column::new("short_maturity_used".into(), short_used),
    ])
}

/// Calculate named spreads from long-form curve data.
///
/// # Errors
/// Returns `TransformError::Schema` if an input column is absent and
/// `TransformError::Validation` on an invalid gap.
pub fn calculate_spreads(data: &DataFrame, config: &SpreadConfig) -> Result<DataFrame, TransformError> {
    SpreadCalculator::with_config(config.clone()).apply(data)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::rstest;

    use super::*;

    fn two_day_curve() -> DataFrame {
        df! {
            "date" => &["2026-01-01", "2026-01-01", "2026-01-01", "2026-01-02", "2026-01-02", "2026-01-02"],
            "maturity_years" => &[2.0, 10.0, 30.0, 2.0, 10.0, 30.0],
            "value" => &[4.0, 4.8, 5.1, 3.9, 4.2, 4.9],
        }
        .unwrap()
    }

    fn values_of(frame: &DataFrame, spread: &str) -> Vec<f64> {
        let names = frame.column("spread").unwrap().str().unwrap();
        let values = frame.column("value").unwrap().f64().unwrap();
        names
            .into_iter()
            .zip(values)
            .filter(|(name, _)| *name == Some(spread))
            .filter_map(|(_, value)| value)
            .collect()
    }

    #[test]
    fn spread_exactness() {
        let config = SpreadConfig {
            definitions: vec![
                SpreadDefinition::new("10Y-2Y", 10.0, 2.0),
                SpreadDefinition::new("30Y-10Y", 30.0, 10.0),
            ],
            ..Default::default()
        };
        let result = calculate_spreads(&two_day_curve(), &config).unwrap();

        let ten_two = values_of(&result, "10Y-2Y");
        assert_relative_eq!(ten_two[0], 0.8, epsilon = 1e-12);
        assert_relative_eq!(ten_two[1], 0.3, epsilon = 1e-12);

        let thirty_ten = values_of(&result, "30Y-10Y");
        assert_relative_eq!(thirty_ten[0], 0.3, epsilon = 1e-12);
        assert_relative_eq!(thirty_ten[1], 0.7, epsilon = 1e-12);
    }

    #[test]
    fn sorted_by_date_then_name() {
        let result = calculate_spreads(&two_day_curve(), &SpreadConfig::default()).unwrap();
        let names: Vec<&str> =
            result.column("spread").unwrap().str().unwrap().into_no_null_iter().collect();
        assert_eq!(names, vec!["10y_2y", "30y_10y", "5y_2y", "10y_2y", "30y_10y", "5y_2y"]);
    }

    #[test]
    fn used_maturities_are_recorded() {
        let records = SpreadCalculator::new().compute(&two_day_curve()).unwrap();
        let five_two = records.iter().find(|r| r.spread == "5y_2y").unwrap();
        assert_eq!(five_two.long_maturity_target, 5.0);
        assert_eq!(five_two.long_maturity_used, Some(2.0));
        assert_eq!(five_two.short_maturity_used, Some(2.0));
        assert_eq!(five_two.value, Some(0.0));
    }

    #[test]
    fn max_gap_exclusion() {
        let calculator = SpreadCalculator::with_config(SpreadConfig {
            definitions: vec![SpreadDefinition::new("7y_2y", 7.0, 2.0)],
            max_maturity_gap: Some(1.0),
            dropna_values: false,
            ..Default::default()
        });

        let records = calculator.compute(&two_day_curve()).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.value.is_none() && r.long_maturity_used.is_none()));
        assert!(records.iter().all(|r| r.short_maturity_used == Some(2.0)));

        let dropped = SpreadCalculator::with_config(SpreadConfig {
            dropna_values: true,
            ..calculator.config().clone()
        });
        assert!(dropped.compute(&two_day_curve()).unwrap().is_empty());
    }

    #[test]
    fn empty_definitions_give_empty_table() {
        let config = SpreadConfig { definitions: Vec::new(), ..Default::default() };
        let result = calculate_spreads(&two_day_curve(), &config).unwrap();
        assert_eq!(result.height(), 0);
        let names: Vec<&str> = result.get_column_names().iter().map(|c| c.as_str()).collect();
        assert_eq!(names, SPREAD_COLUMNS.to_vec());
    }

    #[test]
    fn empty_pivot_gives_empty_table() {
        let df = df! {
            "date" => &["garbage"],
            "maturity_years" => &[2.0],
            "value" => &[4.0],
        }
        .unwrap();
        let result = calculate_spreads(&df, &SpreadConfig::default()).unwrap();
        assert_eq!(result.height(), 0);
        assert_eq!(result.width(), SPREAD_COLUMNS.len());
    }

    #[test]
    fn input_is_untouched_and_output_repeatable() {
        let input = two_day_curve();
        let snapshot = input.clone();
        let first = calculate_spreads(&input, &SpreadConfig::default()).unwrap();
        let second = calculate_spreads(&input, &SpreadConfig::default()).unwrap();
        assert!(first.equals_missing(&second));
        assert!(input.equals_missing(&snapshot));
    }

    #[rstest]
    #[case(&[10.0, 2.0], true)]
    #[case(&[10.0], false)]
    #[case(&[30.0, 10.0, 2.0], false)]
    #[case(&[], false)]
    fn definition_arity(#[case] legs: &[f64], #[case] ok: bool) {
        let result = spread_definition("custom", legs);
        assert_eq!(result.is_ok(), ok);
        if let Err(err) = result {
            assert!(err.is_validation());
        }
    }

    #[test]
    fn rejects_negative_gap() {
        let config = SpreadConfig { max_maturity_gap: Some(-0.5), ..Default::default() };
        assert!(calculate_spreads(&two_day_curve(), &config).unwrap_err().is_validation());
    }
}
