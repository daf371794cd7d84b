//! OHLCV price bar representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::StratagemError;

/// One bar of a historical price series. The series itself is owned by the
/// caller, ordered strictly ascending by timestamp, and never mutated by the
/// engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}

/// Check series shape before any evaluation: non-empty, timestamps strictly
/// ascending (which also guarantees uniqueness).
pub fn validate_series(bars: &[PriceBar]) -> Result<(), StratagemError> {
    if bars.is_empty() {
        return Err(StratagemError::EmptyPriceSeries);
    }
    for (i, pair) in bars.windows(2).enumerate() {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(StratagemError::UnorderedPriceSeries { index: i + 1 });
        }
    }
    Ok(())
}
