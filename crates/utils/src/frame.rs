//! Frame construction and reordering helpers.

use polars::prelude::*;
use tenorscope_primitives::Observation;

use crate::date_column;

/// Canonical date column of long-form curve tables.
pub const DATE_COL: &str = "date";
/// Canonical maturity column, in years.
pub const MATURITY_COL: &str = "maturity_years";
/// Canonical yield column.
pub const VALUE_COL: &str = "value";
/// Tenor label column (e.g. `10y`).
pub const TENOR_COL: &str = "tenor";
/// Data source column.
pub const SOURCE_COL: &str = "source";

/// Build a long-form frame (`date`, `maturity_years`, `value`) from observations.
///
/// # Errors
/// Returns a polars error if the frame cannot be assembled.
pub fn observations_frame(observations: &[Observation]) -> PolarsResult<DataFrame> {
    let dates: Vec<_> = observations.iter().map(|o| Some(o.date)).collect();
    let maturities: Vec<f64> = observations.iter().map(|o| o.maturity_years).collect();
    let values: Vec<Option<f64>> = observations.iter().map(|o| o.value).collect();

    DataFrame::new(vec![
        date_column(DATE_COL, &dates)?,
        Column::new(MATURITY_COL.into(), maturities),
        Column::new(VALUE_COL.into(), values),
    ])
}
