#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tenorscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod pivot;
pub use pivot::{CurveColumns, CurvePivot, ResolvedLeg};

mod spreads;
pub use spreads::{
    SPREAD_COLUMNS, SpreadCalculator, SpreadConfig, calculate_spreads, default_spread_definitions,
    spread_definition, spreads_frame,
};

mod factors;
pub use factors::{
    FACTOR_COLUMNS, FactorConfig, FactorExtractor, extract_level_slope_curvature, factors_frame,
};

mod volatility;
pub use volatility::{RollingVolatility, VolatilityConfig, compute_rolling_volatility};

mod regime;
pub use regime::{RegimeConfig, RegimeLabeler, RegimeThresholds, combine_regime, label_regimes};

mod heatmap;
pub use heatmap::{HeatmapBucket, HeatmapColumns, HeatmapMatrix};
