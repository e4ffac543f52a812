//! Spread definitions and records.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::Date;

/// A named long-minus-short maturity spread.
#[derive(Debug, Clone, PartialEq, Display, Serialize, Deserialize)]
#[display("{name} ({long_maturity}y - {short_maturity}y)")]
pub struct SpreadDefinition {
    /// Spread name, e.g. `10y_2y`.
    pub name: String,
    /// Target maturity of the long leg, in years.
    pub long_maturity: f64,
    /// Target maturity of the short leg, in years.
    pub short_maturity: f64,
}

impl SpreadDefinition {
    /// Create a new spread definition.
    #[must_use]
    pub fn new(name: impl Into<String>, long_maturity: f64, short_maturity: f64) -> Self {
        Self { name: name.into(), long_maturity, short_maturity }
    }
}

/// One spread observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadRecord {
    /// Observation date.
    pub date: Date,
    /// Spread name.
    pub spread: String,
    /// `yield(long_used) - yield(short_used)`, `None` if either leg is missing.
    pub value: Option<f64>,
    /// Requested long maturity.
    pub long_maturity_target: f64,
    /// Requested short maturity.
    pub short_maturity_target: f64,
    /// Maturity actually used for the long leg, `None` if unresolved.
    pub long_maturity_used: Option<f64>,
    /// Maturity actually used for the short leg, `None` if unresolved.
    pub short_maturity_used: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_display() {
        let def = SpreadDefinition::new("10y_2y", 10.0, 2.0);
        assert_eq!(def.to_string(), "10y_2y (10y - 2y)");
    }
}
