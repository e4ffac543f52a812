#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tenorscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod columns;
pub use columns::{
    coerce_dates, coerce_f64, date_column, date_from_epoch_days, epoch_days, parse_date,
};

mod frame;
pub use frame::{
    DATE_COL, MATURITY_COL, SOURCE_COL, TENOR_COL, VALUE_COL, observations_frame,
};

mod gsw;
pub use gsw::{CurveDataset, GswOptions, normalize_gsw_frame, read_gsw_csv};

mod error;
pub use error::UtilsError;
