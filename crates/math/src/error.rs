//! Error types for numeric kernels.

/// Errors that can occur in numeric kernels.
#[derive(Debug, thiserror::Error)]
pub enum MathError {
    /// Quantile outside [0, 1].
    #[error("invalid quantile: {0} (must be in [0, 1])")]
    InvalidQuantile(f64),

    /// Non-positive rolling window.
    #[error("invalid window: {0} (must be positive)")]
    InvalidWindow(usize),

    /// Minimum periods not in [1, window].
    #[error("invalid min_periods: {min_periods} (must be in [1, {window}])")]
    InvalidMinPeriods {
        /// Requested minimum periods.
        min_periods: usize,
        /// Window size.
        window: usize,
    },

    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}
