//! CSV file data adapter.
//!
//! One `{SYMBOL}.csv` per symbol under a base directory, with columns
//! `timestamp,open,high,low,close,volume`. Timestamps are RFC 3339 or plain
//! `YYYY-MM-DD` dates (taken as midnight UTC). Rows are sorted ascending
//! after load.

use chrono::{DateTime, NaiveDate, Utc};
use std::fs;
use std::path::PathBuf;

use crate::domain::bar::PriceBar;
use crate::domain::error::StratagemError;
use crate::ports::data_port::DataPort;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn load_all(&self, symbol: &str) -> Result<Vec<PriceBar>, StratagemError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|_| StratagemError::NoData {
            symbol: symbol.to_string(),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| {
                data_error(symbol, format!("CSV parse error: {}", e))
            })?;

            let raw = get_field(&record, 0, "timestamp", symbol, row)?;
            let timestamp = parse_timestamp(raw).ok_or_else(|| {
                data_error(symbol, format!("row {}: invalid timestamp", row + 1))
            })?;

            bars.push(PriceBar {
                timestamp,
                open: get_number(&record, 1, "open", symbol, row)?,
                high: get_number(&record, 2, "high", symbol, row)?,
                low: get_number(&record, 3, "low", symbol, row)?,
                close: get_number(&record, 4, "close", symbol, row)?,
                volume: get_number(&record, 5, "volume", symbol, row)?,
            });
        }

        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }
}

fn data_error(symbol: &str, reason: String) -> StratagemError {
    StratagemError::DataFormat {
        symbol: symbol.to_string(),
        reason,
    }
}

fn get_field<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    name: &str,
    symbol: &str,
    row: usize,
) -> Result<&'r str, StratagemError> {
    record.get(index).ok_or_else(|| {
        data_error(symbol, format!("row {}: missing {} column", row + 1, name))
    })
}

fn get_number(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    symbol: &str,
    row: usize,
) -> Result<f64, StratagemError> {
    get_field(record, index, name, symbol, row)?
        .trim()
        .parse()
        .map_err(|e| data_error(symbol, format!("row {}: invalid {}: {}", row + 1, name, e)))
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<PriceBar>, StratagemError> {
        let bars: Vec<PriceBar> = self
            .load_all(symbol)?
            .into_iter()
            .filter(|b| start.is_none_or(|s| b.timestamp >= s))
            .filter(|b| end.is_none_or(|e| b.timestamp <= e))
            .collect();

        if bars.is_empty() {
            return Err(StratagemError::NoData {
                symbol: symbol.to_string(),
            });
        }
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, StratagemError> {
        let entries = fs::read_dir(&self.base_path)?;

        let mut symbols = Vec::new();
        for entry in entries {
            let name = entry?.file_name();
            let name_str = name.to_string_lossy();
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }
        symbols.sort();
        Ok(symbols)
    }

    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(DateTime<Utc>, DateTime<Utc>, usize)>, StratagemError> {
        let bars = self.load_all(symbol)?;
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => {
                Ok(Some((first.timestamp, last.timestamp, bars.len())))
            }
            _ => Ok(None),
        }
    }
}
