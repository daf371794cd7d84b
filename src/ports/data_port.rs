//! Market-data access port trait.
//!
//! The engine consumes a validated, time-ordered bar series from an external
//! collaborator. Failures (unknown symbol, no rows in range) propagate as
//! typed errors; the core never retries.

use chrono::{DateTime, Utc};

use crate::domain::bar::PriceBar;
use crate::domain::error::StratagemError;

pub trait DataPort {
    /// Fetch bars for a symbol, ascending by timestamp, optionally bounded
    /// by an inclusive date range.
    fn fetch_bars(
        &self,
        symbol: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<PriceBar>, StratagemError>;

    fn list_symbols(&self) -> Result<Vec<String>, StratagemError>;

    /// (first timestamp, last timestamp, bar count) for a symbol, or `None`
    /// when the symbol exists but holds no rows.
    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(DateTime<Utc>, DateTime<Utc>, usize)>, StratagemError>;
}
