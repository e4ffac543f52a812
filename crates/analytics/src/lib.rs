#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tenorscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod bundle;
pub use bundle::{CurveAnalytics, REGIME_LABEL_COL, VOLATILITY_COL};

mod config;
pub use config::{AnalyticsConfig, SpreadEntry};

mod error;
pub use error::AnalyticsError;

/// Re-export commonly used types.
pub mod prelude {
    pub use tenorscope_traits::CurveTransform;

    pub use super::{AnalyticsConfig, AnalyticsError, CurveAnalytics};
}
