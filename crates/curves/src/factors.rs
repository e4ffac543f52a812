//! Level, slope and curvature extraction.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tenorscope_primitives::{FactorRecord, ResolvedMaturities};
use tenorscope_traits::{CurveTransform, TransformError};
use tenorscope_utils::{DATE_COL, date_column};

use crate::{CurveColumns, CurvePivot, pivot::validate_max_gap};

/// Output columns of the factor table, in order.
pub const FACTOR_COLUMNS: [&str; 10] = [
    "date",
    "level",
    "slope",
    "curvature",
    "level_maturity_used",
    "slope_short_maturity_used",
    "slope_long_maturity_used",
    "curvature_short_maturity_used",
    "curvature_mid_maturity_used",
    "curvature_long_maturity_used",
];

/// Configuration for factor extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorConfig {
    /// Input column names.
    pub columns: CurveColumns,
    /// Maturity whose yield is the level.
    pub level_maturity: f64,
    /// Short leg of the slope.
    pub slope_short_maturity: f64,
    /// Long leg of the slope.
    pub slope_long_maturity: f64,
    /// Short wing of the curvature butterfly.
    pub curvature_short_maturity: f64,
    /// Belly of the curvature butterfly.
    pub curvature_mid_maturity: f64,
    /// Long wing of the curvature butterfly.
    pub curvature_long_maturity: f64,
    /// Largest accepted distance between a target and the maturity used.
    pub max_maturity_gap: Option<f64>,
}

impl Default for FactorConfig {
    fn default() -> Self {
        Self {
            columns: CurveColumns::default(),
            level_maturity: 10.0,
            slope_short_maturity: 2.0,
            slope_long_maturity: 10.0,
            curvature_short_maturity: 2.0,
            curvature_mid_maturity: 5.0,
            curvature_long_maturity: 10.0,
            max_maturity_gap: None,
        }
    }
}

/// Level, slope and curvature extractor.
///
/// - level = y(level)
/// - slope = y(slope_long) - y(slope_short)
/// - curvature = 2 y(curvature_mid) - y(curvature_short) - y(curvature_long)
///
/// Each target is resolved independently to the nearest available maturity.
#[derive(Debug, Clone, Default)]
pub struct FactorExtractor {
    config: FactorConfig,
}

impl FactorExtractor {
    /// Create an extractor with the default 10y level, 2s10s slope and
    /// 2s5s10s curvature.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with a custom configuration.
    #[must_use]
    pub const fn with_config(config: FactorConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &FactorConfig {
        &self.config
    }

    /// Compute one factor record per date, ascending.
    ///
    /// # Errors
    /// Returns `TransformError` on an invalid gap or a missing input column.
    pub fn extract(&self, data: &DataFrame) -> Result<Vec<FactorRecord>, TransformError> {
        self.validate()?;
        let pivot = CurvePivot::from_frame(data, &self.config.columns)?;
        Ok(self.from_pivot(&pivot))
    }

    /// Compute factor records from an existing pivot.
    #[must_use]
    pub fn from_pivot(&self, pivot: &CurvePivot) -> Vec<FactorRecord> {
        if pivot.is_empty() {
            return Vec::new();
        }

        let config = &self.config;
        let gap = config.max_maturity_gap;
        let level = pivot.resolve(config.level_maturity, gap);
        let slope_short = pivot.resolve(config.slope_short_maturity, gap);
        let slope_long = pivot.resolve(config.slope_long_maturity, gap);
        let curve_short = pivot.resolve(config.curvature_short_maturity, gap);
        let curve_mid = pivot.resolve(config.curvature_mid_maturity, gap);
        let curve_long = pivot.resolve(config.curvature_long_maturity, gap);

        let maturities = ResolvedMaturities {
            level: level.used,
            slope_short: slope_short.used,
            slope_long: slope_long.used,
            curvature_short: curve_short.used,
            curvature_mid: curve_mid.used,
            curvature_long: curve_long.used,
        };

        pivot
            .dates()
            .iter()
            .enumerate()
            .map(|(row, date)| {
                let slope = slope_long.values[row].zip(slope_short.values[row]).map(|(l, s)| l - s);
                let curvature = match (curve_short.values[row], curve_mid.values[row], curve_long.values[row]) {
                    (Some(short), Some(mid), Some(long)) => Some(2.0 * mid - short - long),
                    _ => None,
                };
                FactorRecord { date: *date, level: level.values[row], slope, curvature, maturities }
            })
            .collect()
    }
}

impl CurveTransform for FactorExtractor {
    fn name(&self) -> &str {
        "level_slope_curvature"
    }

    fn required_columns(&self) -> Vec<&str> {
        self.config.columns.required()
    }

    fn validate(&self) -> Result<(), TransformError> {
        validate_max_gap(self.config.max_maturity_gap)
    }

    fn apply(&self, data: &DataFrame) -> Result<DataFrame, TransformError> {
        Ok(factors_frame(&self.extract(data)?)?)
    }
}

/// Render factor records as a frame with [`FACTOR_COLUMNS`].
///
/// # Errors
/// Returns a polars error if the frame cannot be assembled.
pub fn factors_frame(records: &[FactorRecord]) -> PolarsResult<DataFrame> {
    let column = |name: &str, get: fn(&FactorRecord) -> Option<f64>| {
        Column::new(name.into(), records.iter().map(get).collect::<Vec<_>>())
    };
    let dates: Vec<_> = records.iter().map(|r| Some(r.date)).collect();

    DataFrame::new(vec![
        date_column(DATE_COL, &dates)?,
        column("level", |r| r.level),
        column("slope", |r| r.slope),
        column("curvature", |r| r.curvature),
        column("level_maturity_used", |r| r.maturities.level),
        column("slope_short_maturity_used", |r| r.maturities.slope_short),
        column("slope_long_maturity_used", |r| r.maturities.slope_long),
        column("curvature_short_maturity_used", |r| r.maturities.curvature_short),
        column("curvature_mid_maturity_used", |r| r.maturities.curvature_mid),
        column("curvature_long_maturity_used", |r| r.maturities.curvature_long),
    ])
}

/// Extract level, slope and curvature from long-form curve data.
///
/// # Errors
/// Returns `TransformError::Schema` if an input column is absent and
/// `TransformError::Validation` on an invalid gap.
pub fn extract_level_slope_curvature(
    data: &DataFrame,
    config: &FactorConfig,
) -> Result<DataFrame, TransformError> {
    FactorExtractor::with_config(config.clone()).apply(data)
}
