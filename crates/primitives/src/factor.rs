//! Curve factor records.

use serde::{Deserialize, Serialize};

use crate::Date;

/// Maturities actually used for each factor leg.
///
/// `None` marks a target that could not be resolved within the allowed gap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMaturities {
    /// Maturity used for the level.
    pub level: Option<f64>,
    /// Maturity used for the short slope leg.
    pub slope_short: Option<f64>,
    /// Maturity used for the long slope leg.
    pub slope_long: Option<f64>,
    /// Maturity used for the short curvature wing.
    pub curvature_short: Option<f64>,
    /// Maturity used for the curvature belly.
    pub curvature_mid: Option<f64>,
    /// Maturity used for the long curvature wing.
    pub curvature_long: Option<f64>,
}

/// Level, slope and curvature of the curve on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorRecord {
    /// Observation date.
    pub date: Date,
    /// `y(level)`.
    pub level: Option<f64>,
    /// `y(slope_long) - y(slope_short)`.
    pub slope: Option<f64>,
    /// `2 y(mid) - y(short) - y(long)`.
    pub curvature: Option<f64>,
    /// Resolved maturities behind the three factors.
    pub maturities: ResolvedMaturities,
}

impl FactorRecord {
    /// Whether all three factors are available.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.level.is_some() && self.slope.is_some() && self.curvature.is_some()
    }
}
