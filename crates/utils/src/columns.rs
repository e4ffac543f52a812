//! Column coercion helpers.

use chrono::{DateTime, Datelike, NaiveDateTime};
use polars::prelude::*;
use tenorscope_primitives::Date;

/// Days from 0001-01-01 to 1970-01-01, the origin of polars `Date` values.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"];

const DATETIME_FORMATS: [&str; 4] =
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a calendar date from text.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `MM/DD/YYYY`, `YYYYMMDD`, naive ISO
/// datetimes and RFC 3339 timestamps (the time part is discarded).
#[must_use]
pub fn parse_date(text: &str) -> Option<Date> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| Date::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
}

/// Convert days since the Unix epoch into a date.
#[must_use]
pub fn date_from_epoch_days(days: i32) -> Option<Date> {
    days.checked_add(EPOCH_DAYS_FROM_CE).and_then(Date::from_num_days_from_ce_opt)
}

/// Days since the Unix epoch.
#[must_use]
pub fn epoch_days(date: Date) -> i32 {
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}

/// Coerce a column to dates.
///
/// `Date` and `Datetime` columns convert directly. String columns, and
/// integer columns such as `YYYYMMDD` read as numbers, are parsed with
/// [`parse_date`]. Values that fail to convert, and columns of any other
/// type, yield `None`.
///
/// # Errors
/// Returns a polars error if an internal cast fails.
pub fn coerce_dates(column: &Column) -> PolarsResult<Vec<Option<Date>>> {
    match column.dtype() {
        DataType::String => Ok(column.str()?.into_iter().map(|v| v.and_then(parse_date)).collect()),
        DataType::Date => days_to_dates(&column.cast(&DataType::Int32)?),
        DataType::Datetime(_, _) => {
            days_to_dates(&column.cast(&DataType::Date)?.cast(&DataType::Int32)?)
        }
        dtype if dtype.is_integer() => {
            let text = column.cast(&DataType::String)?;
            Ok(text.str()?.into_iter().map(|v| v.and_then(parse_date)).collect())
        }
        _ => Ok(vec![None; column.len()]),
    }
}

/// Coerce a column to floats.
///
/// Casting is non-strict: unparsable strings become `None`. NaN is treated
/// as missing.
///
/// # Errors
/// Returns a polars error if the column type cannot be cast at all.
pub fn coerce_f64(column: &Column) -> PolarsResult<Vec<Option<f64>>> {
    let cast = column.cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_iter().map(|v| v.filter(|x| !x.is_nan())).collect())
}

/// Build a nullable polars `Date` column.
///
/// # Errors
/// Returns a polars error if the cast to `Date` fails.
pub fn date_column(name: &str, dates: &[Option<Date>]) -> PolarsResult<Column> {
    let days: Vec<Option<i32>> = dates.iter().map(|d| d.map(epoch_days)).collect();
    Column::new(name.into(), days).cast(&DataType::Date)
}

fn days_to_dates(days: &Column) -> PolarsResult<Vec<Option<Date>>> {
    Ok(days.i32()?.into_iter().map(|d| d.and_then(date_from_epoch_days)).collect())
}
