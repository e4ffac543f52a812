//! The analytics bundle derived from one curve dataset.

use polars::prelude::*;
use tenorscope_curves::{
    CurveColumns, CurvePivot, FactorExtractor, HeatmapColumns, HeatmapMatrix, SpreadCalculator,
    SpreadConfig, VolatilityConfig, compute_rolling_volatility, factors_frame, label_regimes,
    spreads_frame,
};
use tenorscope_math::nearest_maturity;
use tenorscope_primitives::{Date, FactorRecord, MaturityColumn, Regime, VolatilityPoint};
use tenorscope_traits::CurveTransform;
use tenorscope_utils::{
    CurveDataset, DATE_COL, MATURITY_COL, TENOR_COL, VALUE_COL, coerce_dates, coerce_f64, date_column,
};
use tracing::{debug, info, warn};

use crate::{AnalyticsConfig, AnalyticsError};

/// Column of the volatility table.
pub const VOLATILITY_COL: &str = "volatility";
/// Column of the human-readable regime name.
pub const REGIME_LABEL_COL: &str = "regime_label";

/// Every derived table of a curve dataset.
#[derive(Debug, Clone)]
pub struct CurveAnalytics {
    /// `date, spread, value, *_maturity_target, *_maturity_used`.
    pub spreads: DataFrame,
    /// One row per date: level, slope, curvature and the maturities used.
    pub factors: DataFrame,
    /// `date, factor, value` with factor in {level, slope, curvature}.
    pub factors_long: DataFrame,
    /// Daily curve changes: `date, tenor, maturity_years, value`.
    pub changes: DataFrame,
    /// Rolling volatility of the changes: `date, tenor, maturity_years, volatility`.
    pub volatility: DataFrame,
    /// Factors joined with the reference volatility and labelled.
    pub regimes: DataFrame,
    /// Date x maturity yield levels.
    pub level_heatmap: HeatmapMatrix,
    /// Date x maturity daily changes.
    pub change_heatmap: HeatmapMatrix,
    /// Maturity whose volatility fed the regime labels.
    pub volatility_reference: Option<f64>,
    regime_col: String,
}

impl CurveAnalytics {
    /// Derive spreads, factors, changes, volatility and regimes from a dataset.
    ///
    /// # Errors
    /// Returns `AnalyticsError` on an invalid configuration or if a transform
    /// fails.
    pub fn build(dataset: &CurveDataset, config: &AnalyticsConfig) -> Result<Self, AnalyticsError> {
        config.validate()?;
        let pivot = CurvePivot::from_frame(&dataset.long, &CurveColumns::default())?;
        info!(dates = pivot.dates().len(), maturities = pivot.maturities().len(), "building curve analytics");

        let calculator = SpreadCalculator::with_config(SpreadConfig {
            definitions: config.spread_definitions()?,
            max_maturity_gap: config.spread_max_maturity_gap,
            ..Default::default()
        });
        calculator.validate()?;
        let spreads = spreads_frame(&calculator.from_pivot(&pivot))?;

        let extractor = FactorExtractor::with_config(config.factors.clone());
        extractor.validate()?;
        let factor_records = extractor.from_pivot(&pivot);
        let factors = factors_frame(&factor_records)?;
        let factors_long = factors_long_frame(&factor_records)?;

        let daily_changes = pivot.diff(config.changes_scale);
        let changes = with_tenor(daily_changes.to_long_frame(true)?, dataset)?;
        let volatility = volatility_table(&daily_changes, dataset, config)?;

        let volatility_reference = reference_maturity(&volatility, config.volatility_reference_maturity)?;
        let regimes = regimes_table(&factors, &volatility, volatility_reference, config)?;

        let level_heatmap = HeatmapMatrix::from_frame(&dataset.long, &HeatmapColumns::default())?;
        let change_heatmap = HeatmapMatrix::from_frame(&changes, &HeatmapColumns::default())?;

        info!(
            spreads = spreads.height(),
            factors = factors.height(),
            volatility = volatility.height(),
            ?volatility_reference,
            "curve analytics ready"
        );

        Ok(Self {
            spreads,
            factors,
            factors_long,
            changes,
            volatility,
            regimes,
            level_heatmap,
            change_heatmap,
            volatility_reference,
            regime_col: config.regime.output_col.clone(),
        })
    }

    /// Share of dates in each regime, in percent, in precedence order.
    ///
    /// Regimes that never occur are omitted.
    ///
    /// # Errors
    /// Returns a polars error if the regime column is not a string column.
    pub fn regime_shares(&self) -> PolarsResult<Vec<(Regime, f64)>> {
        if self.regimes.height() == 0 {
            return Ok(Vec::new());
        }
        let labels = self.regimes.column(&self.regime_col)?.str()?;
        let total = labels.len() as f64;

        Ok(Regime::ALL
            .iter()
            .filter_map(|regime| {
                let wire = regime.to_string();
                let count = labels.into_iter().filter(|label| *label == Some(wire.as_str())).count();
                (count > 0).then(|| (*regime, 100.0 * count as f64 / total))
            })
            .collect())
    }

    /// Dates covered by the factor table, ascending.
    ///
    /// # Errors
    /// Returns a polars error if the date column is missing.
    pub fn dates(&self) -> PolarsResult<Vec<Date>> {
        Ok(coerce_dates(self.factors.column(DATE_COL)?)?.into_iter().flatten().collect())
    }

    /// Typed rows of the volatility table.
    ///
    /// # Errors
    /// Returns a polars error if a column is missing or mistyped.
    pub fn volatility_points(&self) -> PolarsResult<Vec<VolatilityPoint>> {
        let dates = coerce_dates(self.volatility.column(DATE_COL)?)?;
        let maturities = coerce_f64(self.volatility.column(MATURITY_COL)?)?;
        let volatility = coerce_f64(self.volatility.column(VOLATILITY_COL)?)?;

        Ok(dates
            .into_iter()
            .zip(maturities)
            .zip(volatility)
            .filter_map(|((date, maturity_years), volatility)| {
                Some(VolatilityPoint { date: date?, maturity_years: maturity_years?, volatility: volatility? })
            })
            .collect())
    }
}

fn factors_long_frame(records: &[FactorRecord]) -> PolarsResult<DataFrame> {
    let mut dates = Vec::with_capacity(records.len() * 3);
    let mut names = Vec::with_capacity(records.len() * 3);
    let mut values = Vec::with_capacity(records.len() * 3);

    for record in records {
        for (name, value) in
            [("level", record.level), ("slope", record.slope), ("curvature", record.curvature)]
        {
            dates.push(Some(record.date));
            names.push(name);
            values.push(value);
        }
    }

    DataFrame::new(vec![
        date_column(DATE_COL, &dates)?,
        Column::new("factor".into(), names),
        Column::new(VALUE_COL.into(), values),
    ])
}

/// Insert the dataset's tenor label next to `maturity_years`.
fn with_tenor(mut frame: DataFrame, dataset: &CurveDataset) -> PolarsResult<DataFrame> {
    let tenors: Vec<String> = frame
        .column(MATURITY_COL)?
        .f64()?
        .into_iter()
        .map(|years| match years {
            Some(years) => dataset
                .tenor_label(years)
                .map_or_else(|| MaturityColumn::canonical_label(years), str::to_string),
            None => String::new(),
        })
        .collect();

    frame.insert_column(1, Column::new(TENOR_COL.into(), tenors))?;
    Ok(frame)
}

fn volatility_table(
    changes: &CurvePivot,
    dataset: &CurveDataset,
    config: &AnalyticsConfig,
) -> Result<DataFrame, AnalyticsError> {
    // First changes stay in the panel as nulls so they occupy a window slot.
    let input = changes.to_long_frame(false)?;
    let rolling = compute_rolling_volatility(
        &input,
        &VolatilityConfig {
            value_col: VALUE_COL.to_string(),
            date_col: DATE_COL.to_string(),
            group_cols: vec![MATURITY_COL.to_string()],
            window: config.volatility_window,
            min_periods: Some(config.volatility_min_periods()),
            annualize: config.annualize_volatility,
            periods_per_year: config.periods_per_year,
            output_col: VOLATILITY_COL.to_string(),
        },
    )?;

    let present = rolling
        .lazy()
        .filter(col(VOLATILITY_COL).is_not_null())
        .sort([DATE_COL, MATURITY_COL], SortMultipleOptions::new().with_maintain_order(true))
        .select([col(DATE_COL), col(MATURITY_COL), col(VOLATILITY_COL)])
        .collect()?;
    Ok(with_tenor(present, dataset)?)
}

fn reference_maturity(volatility: &DataFrame, target: f64) -> PolarsResult<Option<f64>> {
    let mut available: Vec<f64> =
        volatility.column(MATURITY_COL)?.f64()?.into_iter().flatten().collect();
    available.sort_by(f64::total_cmp);
    available.dedup();

    let reference = nearest_maturity(&available, target, None).map(|idx| available[idx]);
    if reference.is_none() {
        warn!(target, "no volatility series available for regime labels");
    }
    Ok(reference)
}

fn regimes_table(
    factors: &DataFrame,
    volatility: &DataFrame,
    reference: Option<f64>,
    config: &AnalyticsConfig,
) -> Result<DataFrame, AnalyticsError> {
    let vol_col = config.regime.volatility_col.as_str();
    let base = factors.clone().lazy().select([
        col(DATE_COL),
        col("level").alias(config.regime.level_col.as_str()),
        col("slope").alias(config.regime.slope_col.as_str()),
    ]);

    let joined = match reference {
        Some(maturity) => {
            debug!(maturity, "joining reference volatility");
            let selected = volatility
                .clone()
                .lazy()
                .filter(col(MATURITY_COL).eq(lit(maturity)))
                .select([col(DATE_COL), col(VOLATILITY_COL).alias(vol_col)]);
            base.join(selected, [col(DATE_COL)], [col(DATE_COL)], JoinArgs::new(JoinType::Left))
        }
        None => base.with_column(lit(NULL).cast(DataType::Float64).alias(vol_col)),
    }
    .sort([DATE_COL], SortMultipleOptions::new().with_maintain_order(true))
    .collect()?;

    let mut labelled = label_regimes(&joined, &config.regime)?;

    let display: Vec<&str> = labelled
        .column(&config.regime.output_col)?
        .str()?
        .into_iter()
        .map(|wire| {
            Regime::ALL
                .iter()
                .find(|regime| Some(regime.to_string().as_str()) == wire)
                .map_or(Regime::Unknown.display_label(), |regime| regime.display_label())
        })
        .collect();
    labelled.with_column(Column::new(REGIME_LABEL_COL.into(), display))?;
    Ok(labelled)
}
