//! Rule-based rate regime labels.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tenorscope_math::{MathError, quantile};
use tenorscope_primitives::{CurveRegime, LevelRegime, Regime, RegimeLabels, VolatilityRegime};
use tenorscope_traits::{CurveTransform, TransformError};
use tenorscope_utils::coerce_f64;
use tracing::debug;

/// Configuration for regime labelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeConfig {
    /// Slope column.
    pub slope_col: String,
    /// Level column.
    pub level_col: String,
    /// Volatility column.
    pub volatility_col: String,
    /// Column receiving the combined regime.
    pub output_col: String,
    /// Half-width of the band around zero slope that counts as flat.
    pub slope_flat_band: f64,
    /// Level quantile at or below which rates are low.
    pub level_low_quantile: f64,
    /// Level quantile at or above which rates are high.
    pub level_high_quantile: f64,
    /// Volatility quantile at or above which volatility is high.
    pub volatility_high_quantile: f64,
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self {
            slope_col: "slope".to_string(),
            level_col: "level".to_string(),
            volatility_col: "rolling_volatility".to_string(),
            output_col: "regime".to_string(),
            slope_flat_band: 0.10,
            level_low_quantile: 0.33,
            level_high_quantile: 0.67,
            volatility_high_quantile: 0.67,
        }
    }
}

/// Thresholds derived from the history being labelled.
///
/// Each is `None` when its series has no present value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RegimeThresholds {
    /// Low level threshold.
    pub level_low: Option<f64>,
    /// High level threshold.
    pub level_high: Option<f64>,
    /// High volatility threshold.
    pub volatility_high: Option<f64>,
}

impl RegimeThresholds {
    /// Label a level against the two level thresholds.
    #[must_use]
    pub fn level_regime(&self, level: Option<f64>) -> LevelRegime {
        let (Some(level), Some(low), Some(high)) = (level, self.level_low, self.level_high) else {
            return LevelRegime::Unknown;
        };
        if level <= low {
            LevelRegime::Low
        } else if level >= high {
            LevelRegime::High
        } else {
            LevelRegime::Mid
        }
    }

    /// Label a volatility against the high-volatility threshold.
    #[must_use]
    pub fn volatility_regime(&self, volatility: Option<f64>) -> VolatilityRegime {
        match (volatility, self.volatility_high) {
            (Some(vol), Some(high)) if vol >= high => VolatilityRegime::HighVol,
            (Some(_), Some(_)) => VolatilityRegime::Calm,
            _ => VolatilityRegime::Unknown,
        }
    }
}

/// Combine the three component labels; the first matching rule wins.
#[must_use]
pub const fn combine_regime(curve: CurveRegime, level: LevelRegime, volatility: VolatilityRegime) -> Regime {
    use CurveRegime as C;
    use LevelRegime as L;
    use VolatilityRegime as V;

    match (curve, level, volatility) {
        (C::Unknown, _, _) | (_, L::Unknown, _) | (_, _, V::Unknown) => Regime::Unknown,
        (C::Inverted, _, V::HighVol) => Regime::RiskOff,
        (C::Inverted, _, _) => Regime::Inversion,
        (C::Steep, L::Low, _) => Regime::Reflation,
        (C::Flat, L::High, _) => Regime::TightPolicy,
        (_, _, V::HighVol) => Regime::Volatile,
        _ => Regime::Normal,
    }
}

/// Regime labeler.
///
/// Levels are compared to their own low/high quantiles, volatility to its
/// own high quantile and the slope to a fixed band around zero. Every input
/// row yields exactly one label set.
#[derive(Debug, Clone, Default)]
pub struct RegimeLabeler {
    config: RegimeConfig,
}

impl RegimeLabeler {
    /// Create a labeler with a 10bp flat band and tercile thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a labeler with a custom configuration.
    #[must_use]
    pub const fn with_config(config: RegimeConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &RegimeConfig {
        &self.config
    }

    /// Label a slope against the flat band.
    #[must_use]
    pub fn curve_regime(&self, slope: Option<f64>) -> CurveRegime {
        let band = self.config.slope_flat_band;
        match slope {
            None => CurveRegime::Unknown,
            Some(s) if s < -band => CurveRegime::Inverted,
            Some(s) if s > band => CurveRegime::Steep,
            Some(_) => CurveRegime::Flat,
        }
    }

    /// Quantile thresholds of the present levels and volatilities.
    ///
    /// # Errors
    /// Returns `TransformError::Validation` for a quantile outside [0, 1].
    pub fn thresholds(
        &self,
        level: &[Option<f64>],
        volatility: &[Option<f64>],
    ) -> Result<RegimeThresholds, TransformError> {
        let threshold = |values: &[Option<f64>], q: f64| {
            quantile(values, q).map_err(|e| match e {
                MathError::Polars(e) => TransformError::Polars(e),
                e => TransformError::Validation(e.to_string()),
            })
        };
        Ok(RegimeThresholds {
            level_low: threshold(level, self.config.level_low_quantile)?,
            level_high: threshold(level, self.config.level_high_quantile)?,
            volatility_high: threshold(volatility, self.config.volatility_high_quantile)?,
        })
    }

    /// Label aligned slope, level and volatility series.
    ///
    /// # Errors
    /// Returns `TransformError::Validation` on invalid parameters or series
    /// of different lengths.
    pub fn label_series(
        &self,
        slope: &[Option<f64>],
        level: &[Option<f64>],
        volatility: &[Option<f64>],
    ) -> Result<Vec<RegimeLabels>, TransformError> {
        self.validate()?;
        if slope.len() != level.len() || slope.len() != volatility.len() {
            return Err(TransformError::Validation(format!(
                "series lengths differ: slope {}, level {}, volatility {}",
                slope.len(),
                level.len(),
                volatility.len()
            )));
        }

        let thresholds = self.thresholds(level, volatility)?;
        debug!(?thresholds, rows = slope.len(), "regime thresholds");

        Ok(slope
            .iter()
            .zip(level)
            .zip(volatility)
            .map(|((&slope, &level), &volatility)| {
                let curve = self.curve_regime(slope);
                let level = thresholds.level_regime(level);
                let volatility = thresholds.volatility_regime(volatility);
                RegimeLabels { curve, level, volatility, regime: combine_regime(curve, level, volatility) }
            })
            .collect())
    }
}

/// Present values of `name`, or an all-missing series when the column is absent.
fn optional_series(data: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    match data.column(name) {
        Ok(column) => coerce_f64(column),
        Err(_) => {
            debug!(column = name, "column absent, treating as missing");
            Ok(vec![None; data.height()])
        }
    }
}

impl CurveTransform for RegimeLabeler {
    fn name(&self) -> &str {
        "regimes"
    }

    fn required_columns(&self) -> Vec<&str> {
        Vec::new()
    }

    fn validate(&self) -> Result<(), TransformError> {
        let config = &self.config;
        if !config.slope_flat_band.is_finite() || config.slope_flat_band < 0.0 {
            return Err(TransformError::Validation(format!(
                "slope_flat_band must be a finite non-negative number, got {}",
                config.slope_flat_band
            )));
        }
        for (name, q) in [
            ("level_low_quantile", config.level_low_quantile),
            ("level_high_quantile", config.level_high_quantile),
            ("volatility_high_quantile", config.volatility_high_quantile),
        ] {
            if !(0.0..=1.0).contains(&q) {
                return Err(TransformError::Validation(format!("{name} must be between 0 and 1, got {q}")));
            }
        }
        Ok(())
    }

    fn apply(&self, data: &DataFrame) -> Result<DataFrame, TransformError> {
        self.validate()?;
        let config = &self.config;

        let labels = self.label_series(
            &optional_series(data, &config.slope_col)?,
            &optional_series(data, &config.level_col)?,
            &optional_series(data, &config.volatility_col)?,
        )?;

        let text = |name: &str, label: fn(&RegimeLabels) -> String| {
            Column::new(name.into(), labels.iter().map(label).collect::<Vec<_>>())
        };

        let mut result = data.clone();
        result.with_column(text("curve_regime", |l| l.curve.to_string()))?;
        result.with_column(text("level_regime", |l| l.level.to_string()))?;
        result.with_column(text("volatility_regime", |l| l.volatility.to_string()))?;
        result.with_column(text(config.output_col.as_str(), |l| l.regime.to_string()))?;
        Ok(result)
    }
}

/// Label rate regimes from slope, level and volatility columns.
///
/// Adds `curve_regime`, `level_regime`, `volatility_regime` and the combined
/// regime under `output_col`.
///
/// # Errors
/// Returns `TransformError::Validation` for a negative flat band or a
/// quantile outside [0, 1].
pub fn label_regimes(data: &DataFrame, config: &RegimeConfig) -> Result<DataFrame, TransformError> {
    RegimeLabeler::with_config(config.clone()).apply(data)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::rstest;

    use super::*;

    fn sample() -> DataFrame {
        df! {
            "slope" => &[-0.5, 0.5, 0.0],
            "level" => &[5.0, 2.0, 3.0],
            "rolling_volatility" => &[1.5, 0.3, 0.8],
        }
        .unwrap()
    }

    fn sample_config() -> RegimeConfig {
        RegimeConfig {
            slope_flat_band: 0.1,
            level_low_quantile: 0.2,
            level_high_quantile: 0.8,
            volatility_high_quantile: 0.7,
            ..Default::default()
        }
    }

    fn strings(frame: &DataFrame, name: &str) -> Vec<String> {
        frame.column(name).unwrap().str().unwrap().into_no_null_iter().map(str::to_string).collect()
    }

    #[test]
    fn assigns_known_states() {
        let labeled = label_regimes(&sample(), &sample_config()).unwrap();
        assert_eq!(strings(&labeled, "regime"), vec!["risk_off", "reflation", "normal"]);
        assert_eq!(strings(&labeled, "curve_regime"), vec!["inverted", "steep", "flat"]);
        assert_eq!(strings(&labeled, "level_regime"), vec!["high", "low", "mid"]);
        assert_eq!(strings(&labeled, "volatility_regime"), vec!["high_vol", "calm", "calm"]);
        assert_eq!(labeled.width(), 7);
    }

    #[test]
    fn thresholds_use_linear_quantiles() {
        let labeler = RegimeLabeler::with_config(sample_config());
        let thresholds = labeler
            .thresholds(&[Some(5.0), Some(2.0), Some(3.0)], &[Some(1.5), Some(0.3), Some(0.8)])
            .unwrap();
        assert_relative_eq!(thresholds.level_low.unwrap(), 2.4, epsilon = 1e-12);
        assert_relative_eq!(thresholds.level_high.unwrap(), 4.2, epsilon = 1e-12);
        assert_relative_eq!(thresholds.volatility_high.unwrap(), 1.08, epsilon = 1e-12);
    }

    #[test]
    fn missing_slope_is_unknown() {
        let df = df! {
            "slope" => &[None, Some(-0.5)],
            "level" => &[Some(5.0), Some(2.0)],
            "rolling_volatility" => &[Some(9.0), Some(1.0)],
        }
        .unwrap();
        let labeled = label_regimes(&df, &RegimeConfig::default()).unwrap();
        assert_eq!(strings(&labeled, "curve_regime")[0], "unknown_curve");
        assert_eq!(strings(&labeled, "regime")[0], "unknown");
    }

    #[test]
    fn absent_volatility_column_labels_unknown() {
        let df = df! { "slope" => &[0.5], "level" => &[2.0] }.unwrap();
        let labeled = label_regimes(&df, &RegimeConfig::default()).unwrap();
        assert_eq!(strings(&labeled, "volatility_regime"), vec!["unknown_vol"]);
        assert_eq!(strings(&labeled, "regime"), vec!["unknown"]);
    }

    #[test]
    fn custom_output_column() {
        let config = RegimeConfig { output_col: "rate_regime".to_string(), ..sample_config() };
        let labeled = label_regimes(&sample(), &config).unwrap();
        assert!(labeled.column("rate_regime").is_ok());
        assert!(labeled.column("regime").is_err());
    }

    #[test]
    fn band_edges_are_flat() {
        let labeler = RegimeLabeler::new();
        assert_eq!(labeler.curve_regime(Some(0.10)), CurveRegime::Flat);
        assert_eq!(labeler.curve_regime(Some(-0.10)), CurveRegime::Flat);
        assert_eq!(labeler.curve_regime(Some(0.11)), CurveRegime::Steep);
    }

    #[rstest]
    #[case(CurveRegime::Inverted, LevelRegime::High, VolatilityRegime::HighVol, Regime::RiskOff)]
    #[case(CurveRegime::Inverted, LevelRegime::Low, VolatilityRegime::Calm, Regime::Inversion)]
    #[case(CurveRegime::Steep, LevelRegime::Low, VolatilityRegime::HighVol, Regime::Reflation)]
    #[case(CurveRegime::Flat, LevelRegime::High, VolatilityRegime::HighVol, Regime::TightPolicy)]
    #[case(CurveRegime::Steep, LevelRegime::High, VolatilityRegime::HighVol, Regime::Volatile)]
    #[case(CurveRegime::Flat, LevelRegime::Mid, VolatilityRegime::Calm, Regime::Normal)]
    #[case(CurveRegime::Inverted, LevelRegime::Unknown, VolatilityRegime::HighVol, Regime::Unknown)]
    #[case(CurveRegime::Steep, LevelRegime::Low, VolatilityRegime::Unknown, Regime::Unknown)]
    fn precedence(
        #[case] curve: CurveRegime,
        #[case] level: LevelRegime,
        #[case] volatility: VolatilityRegime,
        #[case] expected: Regime,
    ) {
        assert_eq!(combine_regime(curve, level, volatility), expected);
    }

    #[rstest]
    #[case(RegimeConfig { level_low_quantile: -0.1, ..Default::default() })]
    #[case(RegimeConfig { level_high_quantile: 1.5, ..Default::default() })]
    #[case(RegimeConfig { volatility_high_quantile: f64::NAN, ..Default::default() })]
    #[case(RegimeConfig { slope_flat_band: -0.1, ..Default::default() })]
    fn invalid_parameters(#[case] config: RegimeConfig) {
        assert!(label_regimes(&sample(), &config).unwrap_err().is_validation());
    }

    #[test]
    fn empty_input_gives_empty_labels() {
        let df = df! {
            "slope" => Vec::<f64>::new(),
            "level" => Vec::<f64>::new(),
        }
        .unwrap();
        let labeled = label_regimes(&df, &RegimeConfig::default()).unwrap();
        assert_eq!(labeled.height(), 0);
        assert!(labeled.column("regime").is_ok());
    }

    #[test]
    fn input_is_untouched() {
        let input = sample();
        let first = label_regimes(&input, &sample_config()).unwrap();
        let second = label_regimes(&input, &sample_config()).unwrap();
        assert!(first.equals_missing(&second));
        assert!(input.equals_missing(&sample()));
    }
}
