//! Shared helpers for integration tests.

use chrono::{TimeZone, Utc};

use stratagem::domain::bar::PriceBar;
use stratagem::domain::indicator::IndicatorSpec;
use stratagem::domain::rule::{SignalType, ThresholdCondition, ThresholdRule};
use stratagem::domain::strategy::{IndicatorDefinition, StrategyDefinition};

/// One daily bar per price, starting 2024-01-01.
pub fn make_bars(prices: &[f64]) -> Vec<PriceBar> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    prices
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            timestamp: start + chrono::Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000.0,
        })
        .collect()
}

/// Ten declining bars then a steady rally; a fast EMA crosses a slow one
/// exactly once during the rally.
pub fn dip_then_rally() -> Vec<f64> {
    let mut prices: Vec<f64> = (0..10).map(|i| 110.0 - i as f64).collect();
    prices.extend((0..30).map(|i| 101.0 + 2.0 * i as f64));
    prices
}

/// SMA(1) tracks the close, so threshold rules on it trigger at exact
/// prices: enter crossing above `entry_level`, exit crossing above
/// `exit_level`.
pub fn price_trigger_strategy(entry_level: f64, exit_level: f64) -> StrategyDefinition {
    StrategyDefinition {
        name: "price triggers".into(),
        description: None,
        indicators: vec![IndicatorDefinition {
            name: "price".into(),
            spec: IndicatorSpec::Sma { window: 1 },
        }],
        crossover_rules: vec![],
        threshold_rules: vec![
            ThresholdRule {
                name: "enter".into(),
                indicator: "price".into(),
                threshold: entry_level,
                condition: ThresholdCondition::Above,
                signal_type: SignalType::Entry,
            },
            ThresholdRule {
                name: "exit".into(),
                indicator: "price".into(),
                threshold: exit_level,
                condition: ThresholdCondition::Above,
                signal_type: SignalType::Exit,
            },
        ],
    }
}

/// Render bars as a CSV file body the CsvAdapter understands.
pub fn bars_to_csv(bars: &[PriceBar]) -> String {
    let mut out = String::from("timestamp,open,high,low,close,volume\n");
    for bar in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.timestamp.format("%Y-%m-%d"),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        ));
    }
    out
}
