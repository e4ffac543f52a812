//! Date x bucket matrices for surface displays.

use std::fmt;

use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tenorscope_primitives::Date;
use tenorscope_traits::{TransformError, require_columns};
use tenorscope_utils::{DATE_COL, MATURITY_COL, VALUE_COL, coerce_dates, date_column};

const BUCKET_COL: &str = "bucket";

/// Column names of a heatmap source table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapColumns {
    /// Date column (matrix rows).
    pub date: String,
    /// Bucket column (matrix columns), e.g. maturity or spread name.
    pub bucket: String,
    /// Value column.
    pub value: String,
}

impl Default for HeatmapColumns {
    fn default() -> Self {
        Self {
            date: DATE_COL.to_string(),
            bucket: MATURITY_COL.to_string(),
            value: VALUE_COL.to_string(),
        }
    }
}

/// A heatmap column key.
#[derive(Debug, Clone, PartialEq)]
pub enum HeatmapBucket {
    /// Numeric bucket, e.g. a maturity in years.
    Numeric(f64),
    /// Text bucket, e.g. a spread name.
    Label(String),
}

impl fmt::Display for HeatmapBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(value) => write!(f, "{value}"),
            Self::Label(label) => f.write_str(label),
        }
    }
}

/// Mean-aggregated date x bucket matrix.
///
/// Buckets are numeric when every present bucket parses as a number and are
/// then sorted numerically; otherwise they are trimmed strings sorted
/// lexicographically. NaN buckets count as missing.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapMatrix {
    dates: Vec<Date>,
    buckets: Vec<HeatmapBucket>,
    /// `values[[date, bucket]]`.
    values: Array2<Option<f64>>,
}

impl HeatmapMatrix {
    /// Build the matrix from a long-form frame.
    ///
    /// Rows without a date or bucket are dropped.
    ///
    /// # Errors
    /// Returns `TransformError::Schema` if any of the three columns is absent.
    pub fn from_frame(data: &DataFrame, columns: &HeatmapColumns) -> Result<Self, TransformError> {
        require_columns(data, &[columns.date.as_str(), columns.bucket.as_str(), columns.value.as_str()])?;

        let long = DataFrame::new(vec![
            date_column(DATE_COL, &coerce_dates(data.column(&columns.date)?)?)?,
            bucket_column(data.column(&columns.bucket)?)?,
            data.column(&columns.value)?.cast(&DataType::Float64)?.with_name(VALUE_COL.into()),
        ])?;
        let numeric = long.column(BUCKET_COL)?.dtype().is_float();

        let missing = || lit(NULL).cast(DataType::Float64);
        let bucket = if numeric { col(BUCKET_COL).fill_nan(missing()) } else { col(BUCKET_COL) };
        let cells = long
            .lazy()
            .with_columns([bucket, col(VALUE_COL).fill_nan(missing())])
            .filter(col(DATE_COL).is_not_null().and(col(BUCKET_COL).is_not_null()))
            .group_by([col(DATE_COL), col(BUCKET_COL)])
            .agg([col(VALUE_COL).mean()])
            .collect()?;

        let cell_dates = coerce_dates(cells.column(DATE_COL)?)?;
        let cell_buckets: Vec<Option<HeatmapBucket>> = if numeric {
            cells.column(BUCKET_COL)?.f64()?.into_iter().map(|v| v.map(HeatmapBucket::Numeric)).collect()
        } else {
            cells
                .column(BUCKET_COL)?
                .str()?
                .into_iter()
                .map(|v| v.map(|s| HeatmapBucket::Label(s.to_string())))
                .collect()
        };
        let cell_values = cells.column(VALUE_COL)?.f64()?;

        let mut row_keys: Vec<Date> = cell_dates.iter().flatten().copied().collect();
        row_keys.sort_unstable();
        row_keys.dedup();

        let mut bucket_keys: Vec<HeatmapBucket> = cell_buckets.iter().flatten().cloned().collect();
        bucket_keys.sort_by(compare_buckets);
        bucket_keys.dedup();

        let mut values = Array2::from_elem((row_keys.len(), bucket_keys.len()), None);
        for ((date, bucket), value) in cell_dates.iter().zip(&cell_buckets).zip(cell_values) {
            let (Some(date), Some(bucket)) = (date, bucket) else { continue };
            if let (Ok(row), Ok(col)) = (
                row_keys.binary_search(date),
                bucket_keys.binary_search_by(|b| compare_buckets(b, bucket)),
            ) {
                values[[row, col]] = value;
            }
        }

        Ok(Self { dates: row_keys, buckets: bucket_keys, values })
    }

    /// Row keys, ascending.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Column keys, sorted.
    #[must_use]
    pub fn buckets(&self) -> &[HeatmapBucket] {
        &self.buckets
    }

    /// Value of a (row, column) cell.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get((row, col)).copied().flatten()
    }

    /// Whether the matrix has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.buckets.is_empty()
    }

    /// Copy with empty cells replaced by `value`.
    #[must_use]
    pub fn fill(&self, value: f64) -> Self {
        Self {
            dates: self.dates.clone(),
            buckets: self.buckets.clone(),
            values: self.values.mapv(|cell| Some(cell.unwrap_or(value))),
        }
    }

    /// Wide frame: `date` plus one column per bucket.
    ///
    /// # Errors
    /// Returns a polars error if the frame cannot be assembled.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let dates: Vec<Option<Date>> = self.dates.iter().copied().map(Some).collect();
        let mut columns = vec![date_column(DATE_COL, &dates)?];
        for (col, bucket) in self.buckets.iter().enumerate() {
            columns.push(Column::new(bucket.to_string().into(), self.values.column(col).to_vec()));
        }
        DataFrame::new(columns)
    }
}

/// Numeric bucket column when every present value parses as a number,
/// trimmed labels otherwise.
fn bucket_column(column: &Column) -> PolarsResult<Column> {
    let cast = column.cast(&DataType::Float64)?;
    let numbers = cast.f64()?;
    let nan = numbers.into_iter().filter(|v| v.is_some_and(f64::is_nan)).count();
    let present = column.len() - column.null_count() - nan;
    let parsed = numbers.into_iter().filter(|v| v.is_some_and(|x| !x.is_nan())).count();
    if present > 0 && parsed == present {
        return Ok(cast.with_name(BUCKET_COL.into()));
    }

    let text = column.cast(&DataType::String)?;
    let labels: Vec<Option<String>> = text.str()?.into_iter().map(|v| v.map(|s| s.trim().to_string())).collect();
    Ok(Column::new(BUCKET_COL.into(), labels))
}

fn compare_buckets(a: &HeatmapBucket, b: &HeatmapBucket) -> std::cmp::Ordering {
    match (a, b) {
        (HeatmapBucket::Numeric(a), HeatmapBucket::Numeric(b)) => a.total_cmp(b),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_buckets_sort_numerically() {
        let df = df! {
            "date" => &["2026-01-01", "2026-01-01", "2026-01-01"],
            "maturity_years" => &["10", "2", "30"],
            "value" => &[4.5, 4.0, 4.8],
        }
        .unwrap();

        let heatmap = HeatmapMatrix::from_frame(&df, &HeatmapColumns::default()).unwrap();
        assert_eq!(
            heatmap.buckets(),
            &[HeatmapBucket::Numeric(2.0), HeatmapBucket::Numeric(10.0), HeatmapBucket::Numeric(30.0)]
        );
        assert_eq!(heatmap.get(0, 0), Some(4.0));
    }

    #[test]
    fn nan_buckets_count_as_missing() {
        let df = df! {
            "date" => &["2026-01-01", "2026-01-01", "2026-01-01", "2026-01-01"],
            "maturity_years" => &[10.0, 2.0, f64::NAN, 30.0],
            "value" => &[4.5, 4.0, 9.9, 4.8],
        }
        .unwrap();

        let heatmap = HeatmapMatrix::from_frame(&df, &HeatmapColumns::default()).unwrap();
        assert_eq!(
            heatmap.buckets(),
            &[HeatmapBucket::Numeric(2.0), HeatmapBucket::Numeric(10.0), HeatmapBucket::Numeric(30.0)]
        );
        assert_eq!(heatmap.get(0, 2), Some(4.8));
    }

    #[test]
    fn duplicate_cells_average_present_values() {
        let df = df! {
            "date" => &["2026-01-01", "2026-01-01", "2026-01-01", "2026-01-02"],
            "maturity_years" => &[2.0, 2.0, 2.0, 2.0],
            "value" => &[Some(4.0), Some(5.0), None, Some(f64::NAN)],
        }
        .unwrap();

        let heatmap = HeatmapMatrix::from_frame(&df, &HeatmapColumns::default()).unwrap();
        assert_eq!(heatmap.dates().len(), 2);
        assert_eq!(heatmap.get(0, 0), Some(4.5));
        assert_eq!(heatmap.get(1, 0), None);
    }

    #[test]
    fn text_buckets_are_trimmed_and_sorted() {
        let df = df! {
            "date" => &["2026-01-01", "2026-01-01", "2026-01-01"],
            "spread" => &[" 5y_2y", "10y_2y ", "5y_2y"],
            "value" => &[1.0, 2.0, 3.0],
        }
        .unwrap();
        let columns = HeatmapColumns { bucket: "spread".to_string(), ..Default::default() };

        let heatmap = HeatmapMatrix::from_frame(&df, &columns).unwrap();
        let labels: Vec<String> = heatmap.buckets().iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["10y_2y", "5y_2y"]);
        assert_eq!(heatmap.get(0, 1), Some(2.0));
    }

    #[test]
    fn fill_and_frame() {
        let df = df! {
            "date" => &["2026-01-01", "2026-01-02"],
            "maturity_years" => &[2.0, 10.0],
            "value" => &[4.0, 4.5],
        }
        .unwrap();

        let heatmap = HeatmapMatrix::from_frame(&df, &HeatmapColumns::default()).unwrap();
        assert_eq!(heatmap.get(0, 1), None);

        let filled = heatmap.fill(0.0);
        assert_eq!(filled.get(0, 1), Some(0.0));

        let frame = filled.to_frame().unwrap();
        let names: Vec<&str> = frame.get_column_names().iter().map(|c| c.as_str()).collect();
        assert_eq!(names, vec!["date", "2", "10"]);
        assert_eq!(frame.column("10").unwrap().null_count(), 0);
    }

    #[test]
    fn schema_error() {
        let df = df! { "date" => &["2026-01-01"] }.unwrap();
        assert!(HeatmapMatrix::from_frame(&df, &HeatmapColumns::default()).unwrap_err().is_schema());
    }
}
