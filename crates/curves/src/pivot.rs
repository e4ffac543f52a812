//! Date x maturity curve matrix.

use ndarray::{Array1, Array2, ArrayView1};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tenorscope_math::{first_differences, nearest_maturity};
use tenorscope_primitives::{Date, Observation};
use tenorscope_traits::{TransformError, require_columns};
use tenorscope_utils::{DATE_COL, MATURITY_COL, VALUE_COL, coerce_dates, date_column, observations_frame};
use tracing::debug;

/// Column names of a long-form curve table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveColumns {
    /// Date column.
    pub date: String,
    /// Maturity column, in years.
    pub maturity: String,
    /// Yield column.
    pub value: String,
}

impl Default for CurveColumns {
    fn default() -> Self {
        Self {
            date: DATE_COL.to_string(),
            maturity: MATURITY_COL.to_string(),
            value: VALUE_COL.to_string(),
        }
    }
}

impl CurveColumns {
    /// The three column names, in schema-check order.
    #[must_use]
    pub fn required(&self) -> Vec<&str> {
        vec![self.date.as_str(), self.maturity.as_str(), self.value.as_str()]
    }
}

/// One resolved leg of a spread or factor.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLeg {
    /// Maturity actually used, `None` when the target could not be resolved.
    pub used: Option<f64>,
    /// Yields of the used maturity, one per pivot date.
    pub values: Vec<Option<f64>>,
}

/// A curve matrix keyed by date and maturity.
///
/// Rows are ascending by date, columns ascending by maturity. Duplicate
/// (date, maturity) observations are averaged over their present values and
/// a cell without any value stays `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct CurvePivot {
    dates: Vec<Date>,
    maturities: Vec<f64>,
    /// `values[[maturity, date]]`.
    values: Array2<Option<f64>>,
}

impl CurvePivot {
    /// Build the pivot from a long-form frame.
    ///
    /// Dates are coerced with [`coerce_dates`], maturity and value cast to
    /// floats. Rows missing a date or maturity after coercion are dropped;
    /// rows missing only the value still contribute their date and maturity.
    ///
    /// # Errors
    /// Returns `TransformError::Schema` if any of the three columns is absent.
    pub fn from_frame(data: &DataFrame, columns: &CurveColumns) -> Result<Self, TransformError> {
        require_columns(data, &columns.required())?;

        let long = DataFrame::new(vec![
            date_column(DATE_COL, &coerce_dates(data.column(&columns.date)?)?)?,
            data.column(&columns.maturity)?.cast(&DataType::Float64)?.with_name(MATURITY_COL.into()),
            data.column(&columns.value)?.cast(&DataType::Float64)?.with_name(VALUE_COL.into()),
        ])?;
        Ok(Self::aggregate(long)?)
    }

    /// Build the pivot from typed observations.
    ///
    /// # Errors
    /// Returns a polars error if the observations cannot be framed.
    pub fn from_observations(observations: &[Observation]) -> PolarsResult<Self> {
        Self::aggregate(observations_frame(observations)?)
    }

    /// Mean per (date, maturity) of a canonical long frame.
    fn aggregate(long: DataFrame) -> PolarsResult<Self> {
        let missing = || lit(NULL).cast(DataType::Float64);
        let cells = long
            .lazy()
            .with_columns([
                col(MATURITY_COL).fill_nan(missing()),
                col(VALUE_COL).fill_nan(missing()),
            ])
            .filter(col(DATE_COL).is_not_null().and(col(MATURITY_COL).is_not_null()))
            .group_by([col(DATE_COL), col(MATURITY_COL)])
            .agg([col(VALUE_COL).mean()])
            .collect()?;

        let cell_dates = coerce_dates(cells.column(DATE_COL)?)?;
        let cell_maturities = cells.column(MATURITY_COL)?.f64()?;
        let cell_values = cells.column(VALUE_COL)?.f64()?;

        let mut dates: Vec<Date> = cell_dates.iter().flatten().copied().collect();
        dates.sort_unstable();
        dates.dedup();

        let mut maturities: Vec<f64> = cell_maturities.into_iter().flatten().collect();
        maturities.sort_by(f64::total_cmp);
        maturities.dedup();

        let mut values = Array2::from_elem((maturities.len(), dates.len()), None);
        for ((date, maturity), value) in cell_dates.into_iter().zip(cell_maturities).zip(cell_values) {
            let (Some(date), Some(maturity)) = (date, maturity) else { continue };
            if let (Ok(row), Ok(col)) =
                (dates.binary_search(&date), maturities.binary_search_by(|m| m.total_cmp(&maturity)))
            {
                values[[col, row]] = value;
            }
        }

        Ok(Self { dates, maturities, values })
    }

    /// Row index: ascending dates.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Column index: ascending maturities.
    #[must_use]
    pub fn maturities(&self) -> &[f64] {
        &self.maturities
    }

    /// Whether the pivot has no rows or no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.maturities.is_empty()
    }

    /// Index of the column holding exactly `maturity`.
    #[must_use]
    pub fn column_index(&self, maturity: f64) -> Option<usize> {
        self.maturities.iter().position(|m| *m == maturity)
    }

    /// Values of column `index`, one per date.
    #[must_use]
    pub fn series(&self, index: usize) -> ArrayView1<'_, Option<f64>> {
        self.values.row(index)
    }

    /// Value at a (date, maturity) cell.
    #[must_use]
    pub fn value(&self, date: Date, maturity: f64) -> Option<f64> {
        let row = self.dates.binary_search(&date).ok()?;
        self.values.get((self.column_index(maturity)?, row)).copied().flatten()
    }

    /// Resolve `target` to the nearest column.
    ///
    /// An unresolved target yields an all-missing leg with `used = None`.
    #[must_use]
    pub fn resolve(&self, target: f64, max_gap: Option<f64>) -> ResolvedLeg {
        match nearest_maturity(&self.maturities, target, max_gap) {
            Some(index) => {
                ResolvedLeg { used: Some(self.maturities[index]), values: self.values.row(index).to_vec() }
            }
            None => {
                debug!(target, ?max_gap, "maturity target unresolved");
                ResolvedLeg { used: None, values: vec![None; self.dates.len()] }
            }
        }
    }

    /// Scaled first differences of every column along the dates.
    #[must_use]
    pub fn diff(&self, scale: f64) -> Self {
        let mut values = self.values.clone();
        for mut column in values.rows_mut() {
            let changes = first_differences(&column.to_vec(), scale);
            column.assign(&Array1::from(changes));
        }
        Self { dates: self.dates.clone(), maturities: self.maturities.clone(), values }
    }

    /// Long-form frame (`date`, `maturity_years`, `value`), ordered by date
    /// then maturity. Empty cells are skipped when `drop_missing` is set and
    /// emitted as nulls otherwise.
    ///
    /// # Errors
    /// Returns a polars error if the frame cannot be assembled.
    pub fn to_long_frame(&self, drop_missing: bool) -> PolarsResult<DataFrame> {
        let mut dates = Vec::new();
        let mut maturities = Vec::new();
        let mut values = Vec::new();

        for (row, date) in self.dates.iter().enumerate() {
            for (col, maturity) in self.maturities.iter().enumerate() {
                let value = self.values[[col, row]];
                if value.is_none() && drop_missing {
                    continue;
                }
                dates.push(Some(*date));
                maturities.push(*maturity);
                values.push(value);
            }
        }

        DataFrame::new(vec![
            date_column(DATE_COL, &dates)?,
            Column::new(MATURITY_COL.into(), maturities),
            Column::new(VALUE_COL.into(), values),
        ])
    }
}

/// Reject a gap that is negative or not finite.
pub(crate) fn validate_max_gap(max_gap: Option<f64>) -> Result<(), TransformError> {
    match max_gap {
        Some(gap) if !gap.is_finite() || gap < 0.0 => Err(TransformError::Validation(format!(
            "max_maturity_gap must be a finite non-negative number, got {gap}"
        ))),
        _ => Ok(()),
    }
}
