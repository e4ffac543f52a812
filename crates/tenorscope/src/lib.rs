//! # tenorscope
//!
//! Deterministic term-structure analytics for yield curve datasets.
//!
//! This crate provides a unified interface to the tenorscope ecosystem.
//! Individual components can be enabled via feature flags.
//!
//! ## Features
//!
//! - `full` (default): Enables all components
//! - `primitives`: Observation, spread, factor and regime types
//! - `traits`: The `CurveTransform` abstraction and schema errors
//! - `math`: Quantiles, rolling statistics and nearest-maturity resolution
//! - `utils`: Column coercion and the GSW curve loader
//! - `curves`: Spreads, factors, rolling volatility, regimes and heatmaps
//! - `analytics`: The configured analytics bundle
//! - `cli`: The `analyze` binary
//!
//! ## Example
//!
//! ```rust,ignore
//! use tenorscope::analytics::{AnalyticsConfig, CurveAnalytics};
//! use tenorscope::utils::{GswOptions, read_gsw_csv};
//!
//! let dataset = read_gsw_csv("feds200628.csv", &GswOptions { skip_rows: 9, ..Default::default() })?;
//! let analytics = CurveAnalytics::build(&dataset, &AnalyticsConfig::default())?;
//! println!("{}", analytics.spreads);
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(feature = "primitives")]
#[doc(inline)]
pub use tenorscope_primitives as primitives;
#[cfg(feature = "traits")]
#[doc(inline)]
pub use tenorscope_traits as traits;
#[cfg(feature = "math")]
#[doc(inline)]
pub use tenorscope_math as math;
#[cfg(feature = "utils")]
#[doc(inline)]
pub use tenorscope_utils as utils;
#[cfg(feature = "curves")]
#[doc(inline)]
pub use tenorscope_curves as curves;
#[cfg(feature = "analytics")]
#[doc(inline)]
pub use tenorscope_analytics as analytics;

// Only the `analyze` binary uses these.
#[cfg(feature = "cli")]
use clap as _;
#[cfg(feature = "cli")]
use polars as _;
#[cfg(feature = "cli")]
use tracing as _;
#[cfg(feature = "cli")]
use tracing_subscriber as _;
