//! Volatility observations.

use serde::{Deserialize, Serialize};

use crate::Date;

/// Rolling volatility of one maturity on one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityPoint {
    /// Observation date.
    pub date: Date,
    /// Maturity in years.
    pub maturity_years: f64,
    /// Rolling standard deviation of the maturity's changes.
    pub volatility: f64,
}
