//! Trailing-window statistics.

use polars::prelude::*;

use crate::MathError;

/// Trailing window with a minimum number of present observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollingWindow {
    window: usize,
    min_periods: usize,
}

impl RollingWindow {
    /// Create a new rolling window.
    ///
    /// # Arguments
    /// * `window` - Number of trailing rows, must be positive
    /// * `min_periods` - Present observations required to emit a value,
    ///   defaults to `window`
    ///
    /// # Errors
    /// Returns `MathError::InvalidWindow` for a zero window and
    /// `MathError::InvalidMinPeriods` unless `1 <= min_periods <= window`.
    pub const fn new(window: usize, min_periods: Option<usize>) -> Result<Self, MathError> {
        if window == 0 {
            return Err(MathError::InvalidWindow(window));
        }
        let min_periods = match min_periods {
            Some(min_periods) => min_periods,
            None => window,
        };
        if min_periods == 0 || min_periods > window {
            return Err(MathError::InvalidMinPeriods { min_periods, window });
        }
        Ok(Self { window, min_periods })
    }

    /// Window size.
    #[must_use]
    pub const fn window(&self) -> usize {
        self.window
    }

    /// Minimum present observations.
    #[must_use]
    pub const fn min_periods(&self) -> usize {
        self.min_periods
    }

    /// Fixed-window options for a population statistic (`ddof = 0`).
    #[must_use]
    pub fn options(&self) -> RollingOptionsFixedWindow {
        RollingOptionsFixedWindow {
            window_size: self.window,
            min_periods: self.min_periods,
            fn_params: Some(RollingFnParams::Var(RollingVarParams { ddof: 0 })),
            ..Default::default()
        }
    }

    /// Trailing population standard deviation of `expr` (denominator `n`).
    ///
    /// Row `i` covers rows `i + 1 - window ..= i`. Nulls count towards the
    /// window length but not towards `min_periods`.
    #[must_use]
    pub fn population_std(&self, expr: Expr) -> Expr {
        expr.rolling_std(self.options())
    }
}
