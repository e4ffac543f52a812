//! Maturity column definitions.

use serde::{Deserialize, Serialize};

const MONTHS_PER_YEAR: f64 = 12.0;

/// Prefix of the zero-coupon yield columns in the Federal Reserve GSW file.
const GSW_YIELD_PREFIX: &str = "SVENY";

/// A wide-format column holding the yields of one maturity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaturityColumn {
    /// Column label as found in the source table.
    pub label: String,
    /// Maturity in years.
    pub years: f64,
}

impl MaturityColumn {
    /// Create a new maturity column.
    #[must_use]
    pub fn new(label: impl Into<String>, years: f64) -> Self {
        Self { label: label.into(), years }
    }

    /// Parse a column label, returning `None` if it does not name a tenor.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        parse_maturity_label(label).map(|years| Self::new(label, years))
    }

    /// Label used when a maturity has no source column, e.g. `10y` or `0.25y`.
    #[must_use]
    pub fn canonical_label(years: f64) -> String {
        format!("{years}y")
    }
}

/// Parse a tenor label into years.
///
/// Accepts `<n>y` and `<n>m` (case-insensitive, `n` may carry a decimal part)
/// and the raw GSW column names `SVENY<nn>`.
///
/// # Returns
/// Maturity in years, or `None` when the label is not a tenor.
#[must_use]
pub fn parse_maturity_label(label: &str) -> Option<f64> {
    let trimmed = label.trim();

    if let Some(digits) = trimmed.strip_prefix(GSW_YIELD_PREFIX) {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        return digits.parse::<u32>().ok().map(f64::from);
    }

    let unit = trimmed.chars().last()?;
    let amount = parse_amount(&trimmed[..trimmed.len() - unit.len_utf8()])?;

    match unit.to_ascii_lowercase() {
        'y' => Some(amount),
        'm' => Some(amount / MONTHS_PER_YEAR),
        _ => None,
    }
}

/// Keep only tenor labels, ordered by ascending maturity.
///
/// Labels mapping to the same maturity keep their input order.
#[must_use]
pub fn sorted_maturity_columns<'a>(labels: impl IntoIterator<Item = &'a str>) -> Vec<MaturityColumn> {
    let mut columns: Vec<MaturityColumn> =
        labels.into_iter().filter_map(MaturityColumn::parse).collect();
    columns.sort_by(|a, b| a.years.total_cmp(&b.years));
    columns
}

fn parse_amount(text: &str) -> Option<f64> {
    let is_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    let valid = match text.split_once('.') {
        Some((whole, fraction)) => is_digits(whole) && is_digits(fraction),
        None => is_digits(text),
    };
    if !valid {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("10y", Some(10.0))]
    #[case("2Y", Some(2.0))]
    #[case(" 30y ", Some(30.0))]
    #[case("6m", Some(0.5))]
    #[case("3M", Some(0.25))]
    #[case("0.5y", Some(0.5))]
    #[case("SVENY05", Some(5.0))]
    #[case("SVENY30", Some(30.0))]
    #[case("Date", None)]
    #[case("y", None)]
    #[case("10", None)]
    #[case("1.y", None)]
    #[case("-1y", None)]
    #[case("10d", None)]
    #[case("SVENY", None)]
    #[case("SVENPY05", None)]
    #[case("", None)]
    fn parse_labels(#[case] label: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_maturity_label(label), expected);
    }

    #[test]
    fn sorted_columns_skip_non_tenors() {
        let columns = sorted_maturity_columns(["Date", "10y", "2y", "6m", "note"]);
        let labels: Vec<&str> = columns.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["6m", "2y", "10y"]);
    }

    #[test]
    fn canonical_label_formats_years() {
        assert_eq!(MaturityColumn::canonical_label(10.0), "10y");
        assert_eq!(MaturityColumn::canonical_label(0.25), "0.25y");
    }
}
