//! Error types for data utilities.

/// Errors that can occur while loading or reshaping data.
#[derive(Debug, thiserror::Error)]
pub enum UtilsError {
    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Missing column.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// Input file does not exist.
    #[error("missing input file: {0}")]
    MissingFile(String),

    /// Input parsed but holds nothing usable.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
