//! Analytics configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tenorscope_curves::{FactorConfig, RegimeConfig, default_spread_definitions, spread_definition};
use tenorscope_primitives::SpreadDefinition;
use tenorscope_utils::DATE_COL;
use tracing::debug;

use crate::AnalyticsError;

/// A spread as written in a configuration file: a name and `[long, short]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadEntry {
    /// Spread name.
    pub name: String,
    /// Long and short maturity targets, in years.
    pub maturities: Vec<f64>,
}

impl From<&SpreadDefinition> for SpreadEntry {
    fn from(definition: &SpreadDefinition) -> Self {
        Self {
            name: definition.name.clone(),
            maturities: vec![definition.long_maturity, definition.short_maturity],
        }
    }
}

/// Configuration of [`CurveAnalytics::build`](crate::CurveAnalytics::build).
///
/// Every field has a default, so a TOML file only needs the overrides:
///
/// ```toml
/// volatility_window = 63
///
/// [[spreads]]
/// name = "10y_3m"
/// maturities = [10.0, 0.25]
///
/// [regime]
/// slope_flat_band = 0.25
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Spreads to compute.
    pub spreads: Vec<SpreadEntry>,
    /// Largest distance between a spread target and the maturity used.
    pub spread_max_maturity_gap: Option<f64>,
    /// Factor targets.
    pub factors: FactorConfig,
    /// Rolling window of the volatility table, in observations.
    pub volatility_window: usize,
    /// Annualize the volatility table.
    pub annualize_volatility: bool,
    /// Periods per year used for annualization.
    pub periods_per_year: u32,
    /// Multiplier applied to daily curve changes (100 = basis points).
    pub changes_scale: f64,
    /// Maturity whose volatility feeds the regime labels.
    pub volatility_reference_maturity: f64,
    /// Regime thresholds.
    pub regime: RegimeConfig,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            spreads: default_spread_definitions().iter().map(SpreadEntry::from).collect(),
            spread_max_maturity_gap: None,
            factors: FactorConfig::default(),
            volatility_window: 21,
            annualize_volatility: false,
            periods_per_year: 252,
            changes_scale: 100.0,
            volatility_reference_maturity: 10.0,
            regime: RegimeConfig::default(),
        }
    }
}

impl AnalyticsConfig {
    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    /// Returns `AnalyticsError::Toml` on malformed input and the errors of
    /// [`validate`](Self::validate).
    pub fn from_toml_str(text: &str) -> Result<Self, AnalyticsError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    ///
    /// # Errors
    /// Returns `AnalyticsError::Io` if the file cannot be read, plus the
    /// errors of [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AnalyticsError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading analytics configuration");
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Typed spread definitions.
    ///
    /// # Errors
    /// Returns `AnalyticsError::Transform` if an entry does not have exactly
    /// two maturities.
    pub fn spread_definitions(&self) -> Result<Vec<SpreadDefinition>, AnalyticsError> {
        self.spreads
            .iter()
            .map(|entry| spread_definition(&entry.name, &entry.maturities).map_err(AnalyticsError::from))
            .collect()
    }

    /// Minimum observations per volatility window: `max(5, min(window, 10))`,
    /// capped at the window itself.
    #[must_use]
    pub fn volatility_min_periods(&self) -> usize {
        5.max(self.volatility_window.min(10)).min(self.volatility_window)
    }

    /// Check the parameters that the individual transforms do not see.
    ///
    /// # Errors
    /// Returns `AnalyticsError::InvalidConfig` or `AnalyticsError::Transform`.
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        self.spread_definitions()?;
        if self.volatility_window == 0 {
            return Err(AnalyticsError::InvalidConfig("volatility_window must be positive".to_string()));
        }
        if !self.changes_scale.is_finite() {
            return Err(AnalyticsError::InvalidConfig(format!(
                "changes_scale must be finite, got {}",
                self.changes_scale
            )));
        }
        if self.volatility_reference_maturity.is_nan() {
            return Err(AnalyticsError::InvalidConfig(
                "volatility_reference_maturity must be a number".to_string(),
            ));
        }
        let regime = &self.regime;
        let inputs = [DATE_COL, regime.level_col.as_str(), regime.slope_col.as_str(), regime.volatility_col.as_str()];
        if inputs.iter().enumerate().any(|(i, name)| inputs[..i].contains(name)) {
            return Err(AnalyticsError::InvalidConfig(format!(
                "regime level, slope and volatility columns must be distinct from each other and from '{DATE_COL}'"
            )));
        }
        Ok(())
    }
}
