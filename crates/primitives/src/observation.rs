//! Long-form curve observation.

use serde::{Deserialize, Serialize};

use crate::Date;

/// A single (date, maturity, yield) observation.
///
/// `value` is `None` when the source cell held no numeric yield.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Observation date.
    pub date: Date,
    /// Time to maturity in years.
    pub maturity_years: f64,
    /// Observed yield.
    pub value: Option<f64>,
}

impl Observation {
    /// Create an observation with a known value.
    #[must_use]
    pub const fn new(date: Date, maturity_years: f64, value: f64) -> Self {
        Self { date, maturity_years, value: Some(value) }
    }

    /// Create an observation whose value is missing.
    #[must_use]
    pub const fn missing(date: Date, maturity_years: f64) -> Self {
        Self { date, maturity_years, value: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observation_constructors() {
        let date = Date::from_ymd_opt(2026, 1, 2).unwrap();
        assert_eq!(Observation::new(date, 10.0, 4.5).value, Some(4.5));
        assert_eq!(Observation::missing(date, 10.0).value, None);
    }
}
