//! Empirical quantiles.

use polars::prelude::*;

use crate::MathError;

/// Empirical quantile of the present values of `values`.
///
/// Uses linear interpolation between the two closest ranks: with the values
/// sorted ascending, `h = (n - 1) q` and the result lies between `x[floor(h)]`
/// and `x[ceil(h)]`. NaN counts as missing.
///
/// # Arguments
/// * `values` - Input values, `None` marks a missing observation
/// * `q` - Quantile in [0, 1]
///
/// # Returns
/// The quantile, or `None` when no value is present.
///
/// # Errors
/// Returns `MathError::InvalidQuantile` if `q` is outside [0, 1] or NaN.
pub fn quantile(values: &[Option<f64>], q: f64) -> Result<Option<f64>, MathError> {
    if !(0.0..=1.0).contains(&q) {
        return Err(MathError::InvalidQuantile(q));
    }

    let present: Float64Chunked = values.iter().map(|v| v.filter(|x| !x.is_nan())).collect();
    Ok(present.quantile(q, QuantileMethod::Linear)?)
}
