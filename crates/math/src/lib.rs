#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tenorscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod quantile;
pub use quantile::quantile;

mod rolling;
pub use rolling::RollingWindow;

mod diff;
pub use diff::first_differences;

mod nearest;
pub use nearest::nearest_maturity;

mod error;
pub use error::MathError;
