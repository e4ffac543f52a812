#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tenorscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod observation;
pub use observation::Observation;

mod maturity;
pub use maturity::{MaturityColumn, parse_maturity_label, sorted_maturity_columns};

mod spread;
pub use spread::{SpreadDefinition, SpreadRecord};

mod factor;
pub use factor::{FactorRecord, ResolvedMaturities};

mod regime;
pub use regime::{CurveRegime, LevelRegime, Regime, RegimeLabels, VolatilityRegime};

mod volatility;
pub use volatility::VolatilityPoint;

/// Re-export common date type.
pub type Date = chrono::NaiveDate;
