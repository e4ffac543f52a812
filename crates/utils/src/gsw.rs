//! Loader for wide-format zero-coupon yield files.
//!
//! The Gürkaynak-Sack-Wright (GSW) dataset publishes one row per date and one
//! column per tenor. This module enumerates the tenor columns once, cleans the
//! rows and melts them into the long form consumed by the curve transforms.

use std::path::Path;

use polars::prelude::*;
use tenorscope_primitives::{Date, MaturityColumn, sorted_maturity_columns};
use tracing::{debug, info};

use crate::{
    DATE_COL, MATURITY_COL, SOURCE_COL, TENOR_COL, UtilsError, VALUE_COL, coerce_dates,
    date_column, epoch_days,
};

/// Options for reading a GSW-style file.
#[derive(Debug, Clone)]
pub struct GswOptions {
    /// Name of the date column in the wide file.
    pub date_col: String,
    /// Preamble lines to skip before the header (9 for the raw Fed file).
    pub skip_rows: usize,
    /// Label written to the `source` column.
    pub source: String,
    /// Drop dates before this one.
    pub start_date: Option<Date>,
}

impl Default for GswOptions {
    fn default() -> Self {
        Self {
            date_col: "Date".to_string(),
            skip_rows: 0,
            source: "GSW".to_string(),
            start_date: None,
        }
    }
}

/// A cleaned curve dataset in both wide and long form.
#[derive(Debug, Clone)]
pub struct CurveDataset {
    /// One row per date: `date` plus one float column per tenor label.
    pub wide: DataFrame,
    /// Long form: `date`, `maturity_years`, `tenor`, `value`, `source`.
    pub long: DataFrame,
    /// Tenor columns, ascending by maturity.
    pub maturity_columns: Vec<MaturityColumn>,
    /// Dates present in `wide`, ascending.
    pub available_dates: Vec<Date>,
}

impl CurveDataset {
    /// Label of the tenor column with the given maturity, if any.
    #[must_use]
    pub fn tenor_label(&self, years: f64) -> Option<&str> {
        const TOLERANCE: f64 = 1e-8;
        self.maturity_columns
            .iter()
            .find(|m| (m.years - years).abs() < TOLERANCE)
            .map(|m| m.label.as_str())
    }
}

/// Read a GSW-style CSV file.
///
/// # Errors
/// Returns `UtilsError::MissingFile` if the path does not exist, a polars
/// error if the CSV cannot be parsed, and the errors of
/// [`normalize_gsw_frame`].
pub fn read_gsw_csv(path: impl AsRef<Path>, options: &GswOptions) -> Result<CurveDataset, UtilsError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(UtilsError::MissingFile(path.display().to_string()));
    }

    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_skip_rows(options.skip_rows)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    info!(path = %path.display(), rows = frame.height(), columns = frame.width(), "read curve file");

    normalize_gsw_frame(&frame, options)
}

/// Clean a wide curve frame and melt it to long form.
///
/// Steps: coerce the date column and drop rows that fail; apply
/// `start_date`; stable-sort by date and keep the last row of each date;
/// drop rows whose tenors are all missing; melt to one row per present
/// (date, tenor) value, ordered by date then maturity.
///
/// # Errors
/// Returns `UtilsError::MissingColumn` without a date column and
/// `UtilsError::InvalidInput` when no tenor column, no usable row or no
/// yield value is found.
pub fn normalize_gsw_frame(frame: &DataFrame, options: &GswOptions) -> Result<CurveDataset, UtilsError> {
    let date_col = options.date_col.as_str();
    let dates = coerce_dates(
        frame.column(date_col).map_err(|_| UtilsError::MissingColumn(date_col.to_string()))?,
    )?;

    let maturity_columns = sorted_maturity_columns(frame.get_column_names().iter().map(|c| c.as_str()));
    if maturity_columns.is_empty() {
        return Err(UtilsError::InvalidInput(
            "input must contain maturity columns like '1y', '2y', ...".to_string(),
        ));
    }
    debug!(tenors = maturity_columns.len(), "detected maturity columns");

    let mut columns = vec![date_column(DATE_COL, &dates)?];
    for maturity in &maturity_columns {
        columns.push(frame.column(&maturity.label)?.cast(&DataType::Float64)?);
    }

    let wide = wide_frame(DataFrame::new(columns)?, &maturity_columns, options.start_date)?;
    if wide.height() == 0 {
        return Err(UtilsError::InvalidInput(
            "no usable rows were found after parsing and cleaning the dataset".to_string(),
        ));
    }

    let available_dates: Vec<Date> = coerce_dates(wide.column(DATE_COL)?)?.into_iter().flatten().collect();
    let long = long_frame(&wide, &maturity_columns, &options.source)?;
    if long.height() == 0 {
        return Err(UtilsError::InvalidInput("no non-missing yield values were found".to_string()));
    }

    info!(
        dates = available_dates.len(),
        observations = long.height(),
        dropped = frame.height() - wide.height(),
        "normalized curve dataset"
    );

    Ok(CurveDataset { wide, long, maturity_columns, available_dates })
}

/// Dated rows on or after `start`, one per date (the last one wins), with at
/// least one tenor present.
fn wide_frame(
    frame: DataFrame,
    maturity_columns: &[MaturityColumn],
    start: Option<Date>,
) -> PolarsResult<DataFrame> {
    let tenors: Vec<Expr> = maturity_columns.iter().map(|m| col(m.label.as_str())).collect();
    let any_present = tenors
        .iter()
        .map(|tenor| tenor.clone().is_not_null())
        .reduce(Expr::or)
        .unwrap_or_else(|| lit(false));

    let mut dated = col(DATE_COL).is_not_null();
    if let Some(start) = start {
        dated = dated.and(col(DATE_COL).cast(DataType::Int32).gt_eq(lit(epoch_days(start))));
    }

    frame
        .lazy()
        .with_columns(
            tenors.iter().map(|tenor| tenor.clone().fill_nan(lit(NULL).cast(DataType::Float64))).collect::<Vec<_>>(),
        )
        .filter(dated)
        .sort([DATE_COL], SortMultipleOptions::new().with_maintain_order(true))
        .unique_stable(Some(vec![DATE_COL.into()]), UniqueKeepStrategy::Last)
        .filter(any_present)
        .collect()
}

/// Melt the wide frame to one row per present (date, tenor) value, ordered
/// by date then maturity.
fn long_frame(wide: &DataFrame, maturity_columns: &[MaturityColumn], source: &str) -> PolarsResult<DataFrame> {
    let lookup = DataFrame::new(vec![
        Column::new(TENOR_COL.into(), maturity_columns.iter().map(|m| m.label.as_str()).collect::<Vec<_>>()),
        Column::new(MATURITY_COL.into(), maturity_columns.iter().map(|m| m.years).collect::<Vec<_>>()),
    ])?;

    wide.clone()
        .lazy()
        .unpivot(UnpivotArgsDSL {
            on: maturity_columns.iter().map(|m| Selector::from(m.label.as_str())).collect(),
            index: vec![Selector::from(DATE_COL)],
            variable_name: Some(TENOR_COL.into()),
            value_name: Some(VALUE_COL.into()),
        })
        .filter(col(VALUE_COL).is_not_null())
        .left_join(lookup.lazy(), col(TENOR_COL), col(TENOR_COL))
        .sort([DATE_COL, MATURITY_COL], SortMultipleOptions::new().with_maintain_order(true))
        .select([
            col(DATE_COL),
            col(MATURITY_COL),
            col(TENOR_COL),
            col(VALUE_COL),
            lit(source).alias(SOURCE_COL),
        ])
        .collect()
}
