//! Regime label definitions.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Shape of the curve from its slope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum CurveRegime {
    /// Slope below the negative flat band.
    #[display("inverted")]
    #[serde(rename = "inverted")]
    Inverted,
    /// Slope above the flat band.
    #[display("steep")]
    #[serde(rename = "steep")]
    Steep,
    /// Slope within the flat band.
    #[display("flat")]
    #[serde(rename = "flat")]
    Flat,
    /// Slope missing.
    #[display("unknown_curve")]
    #[serde(rename = "unknown_curve")]
    Unknown,
}

/// Rate level relative to its own history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum LevelRegime {
    /// At or below the low quantile.
    #[display("low")]
    #[serde(rename = "low")]
    Low,
    /// Between the two quantiles.
    #[display("mid")]
    #[serde(rename = "mid")]
    Mid,
    /// At or above the high quantile.
    #[display("high")]
    #[serde(rename = "high")]
    High,
    /// Level or thresholds missing.
    #[display("unknown_level")]
    #[serde(rename = "unknown_level")]
    Unknown,
}

/// Volatility relative to its own history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum VolatilityRegime {
    /// At or above the high quantile.
    #[display("high_vol")]
    #[serde(rename = "high_vol")]
    HighVol,
    /// Below the high quantile.
    #[display("calm")]
    #[serde(rename = "calm")]
    Calm,
    /// Volatility or threshold missing.
    #[display("unknown_vol")]
    #[serde(rename = "unknown_vol")]
    Unknown,
}

/// Combined rate regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// Inverted curve with high volatility.
    #[display("risk_off")]
    RiskOff,
    /// Inverted curve.
    #[display("inversion")]
    Inversion,
    /// Steep curve at low rates.
    #[display("reflation")]
    Reflation,
    /// Flat curve at high rates.
    #[display("tight_policy")]
    TightPolicy,
    /// High volatility without a curve signal.
    #[display("volatile")]
    Volatile,
    /// None of the above.
    #[display("normal")]
    Normal,
    /// At least one input label unknown.
    #[display("unknown")]
    Unknown,
}

impl Regime {
    /// Every regime, in precedence order.
    pub const ALL: [Self; 7] = [
        Self::Unknown,
        Self::RiskOff,
        Self::Inversion,
        Self::Reflation,
        Self::TightPolicy,
        Self::Volatile,
        Self::Normal,
    ];

    /// Human-readable label for reports.
    #[must_use]
    pub const fn display_label(self) -> &'static str {
        match self {
            Self::RiskOff => "Risk-Off",
            Self::Inversion => "Inversion",
            Self::Reflation => "Steepening",
            Self::TightPolicy => "Restrictive",
            Self::Volatile => "Volatile",
            Self::Normal => "Neutral",
            Self::Unknown => "Unknown",
        }
    }
}

/// The three component labels and the combined regime of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegimeLabels {
    /// Curve shape label.
    pub curve: CurveRegime,
    /// Level label.
    pub level: LevelRegime,
    /// Volatility label.
    pub volatility: VolatilityRegime,
    /// Combined regime.
    pub regime: Regime,
}
