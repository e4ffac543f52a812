//! Error types for curve analytics.

use tenorscope_traits::TransformError;
use tenorscope_utils::UtilsError;

/// Errors that can occur while building the analytics bundle.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// Transform error.
    #[error("transform error: {0}")]
    Transform(#[from] TransformError),

    /// Loader error.
    #[error("data loading error: {0}")]
    Utils(#[from] UtilsError),

    /// Polars error.
    #[error("data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AnalyticsError {
    /// Returns whether the error stems from configuration rather than data.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Toml(_) | Self::InvalidConfig(_))
            || matches!(self, Self::Transform(TransformError::Validation(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = AnalyticsError::InvalidConfig("volatility_window must be positive".to_string());
        assert!(err.to_string().contains("volatility_window"));
    }

    #[test]
    fn error_is_config() {
        let err = AnalyticsError::Transform(TransformError::Validation("bad".to_string()));
        assert!(err.is_config());

        let err = AnalyticsError::Transform(TransformError::Schema { missing: vec!["date".to_string()] });
        assert!(!err.is_config());
    }
}
