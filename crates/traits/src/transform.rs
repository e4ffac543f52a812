//! Curve transformation trait definitions.

use polars::prelude::*;

/// Errors that can occur during transformation.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// Required columns absent from the input table.
    #[error("missing required columns: {}", .missing.join(", "))]
    Schema {
        /// Names of the absent columns, in request order.
        missing: Vec<String>,
    },

    /// Parameter outside its documented domain.
    #[error("invalid parameter: {0}")]
    Validation(String),

    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

impl TransformError {
    /// Returns whether the error comes from the input schema.
    #[must_use]
    pub const fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }

    /// Returns whether the error comes from a parameter check.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Check that every column in `required` is present in `data`.
///
/// # Errors
/// Returns `TransformError::Schema` naming all absent columns.
pub fn require_columns(data: &DataFrame, required: &[&str]) -> Result<(), TransformError> {
    let present = data.get_column_names();
    let missing: Vec<String> = required
        .iter()
        .filter(|name| !present.iter().any(|c| c.as_str() == **name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() { Ok(()) } else { Err(TransformError::Schema { missing }) }
}

/// A pure transformation from a long-form curve table to a derived table.
///
/// Implementations never mutate their input and return a fresh frame, so a
/// single instance can be shared across threads.
pub trait CurveTransform: Send + Sync {
    /// Returns the name of this transformation.
    fn name(&self) -> &str;

    /// Columns that must be present in the input.
    fn required_columns(&self) -> Vec<&str>;

    /// Check the configuration before any data is touched.
    ///
    /// # Errors
    /// Returns `TransformError::Validation` for out-of-domain parameters.
    fn validate(&self) -> Result<(), TransformError> {
        Ok(())
    }

    /// Check that the input carries the required columns.
    ///
    /// # Errors
    /// Returns `TransformError::Schema` naming the absent columns.
    fn check_schema(&self, data: &DataFrame) -> Result<(), TransformError> {
        require_columns(data, &self.required_columns())
    }

    /// Apply the transformation.
    ///
    /// # Errors
    /// Returns `TransformError` on invalid configuration or input schema.
    fn apply(&self, data: &DataFrame) -> Result<DataFrame, TransformError>;
}
