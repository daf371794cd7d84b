//! Moving Average Convergence Divergence.
//!
//! Line = EMA(fast) - EMA(slow); signal = EMA(signal_window) of the line;
//! histogram = line - signal. The three series are aligned in one point
//! stream. Warm-up: a point is defined once all three series are, i.e.
//! after (slow_window-1) + (signal_window-1) bars.

use crate::domain::bar::PriceBar;
use crate::domain::indicator::ema::ema_raw;
use crate::domain::indicator::{IndicatorPoint, IndicatorValue};

pub fn macd_points(
    bars: &[PriceBar],
    fast_window: usize,
    slow_window: usize,
    signal_window: usize,
) -> Vec<IndicatorPoint> {
    if fast_window == 0 || slow_window == 0 || signal_window == 0 {
        return bars
            .iter()
            .map(|b| IndicatorPoint {
                timestamp: b.timestamp,
                value: None,
            })
            .collect();
    }

    let ema_fast = ema_raw(bars, fast_window);
    let ema_slow = ema_raw(bars, slow_window);
    let line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();

    // Signal line: EMA over the MACD line, seeded by the SMA of the first
    // signal_window defined line values (the line is defined from slow-1).
    let line_start = slow_window - 1;
    let k = 2.0 / (signal_window as f64 + 1.0);
    let mut signal = vec![0.0; bars.len()];

    if line_start + signal_window <= bars.len() {
        let seed_end = line_start + signal_window;
        let mut signal_ema =
            line[line_start..seed_end].iter().sum::<f64>() / signal_window as f64;
        signal[seed_end - 1] = signal_ema;

        for i in seed_end..bars.len() {
            signal_ema = line[i] * k + signal_ema * (1.0 - k);
            signal[i] = signal_ema;
        }
    }

    let warmup = slow_window - 1 + signal_window - 1;
    bars.iter()
        .enumerate()
        .map(|(i, bar)| IndicatorPoint {
            timestamp: bar.timestamp,
            value: if i >= warmup {
                Some(IndicatorValue::Macd {
                    line: line[i],
                    signal: signal[i],
                    histogram: line[i] - signal[i],
                })
            } else {
                None
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_bars(prices: &[f64]) -> Vec<PriceBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                timestamp: Utc
                    .with_ymd_and_hms(2024, 1 + (i / 28) as u32, 1 + (i % 28) as u32, 0, 0, 0)
                    .unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn macd_warmup() {
        let bars = make_bars(&ramp(40));
        let points = macd_points(&bars, 12, 26, 9);

        let warmup = 26 - 1 + 9 - 1;
        for (i, p) in points.iter().take(warmup).enumerate() {
            assert!(p.value.is_none(), "bar {} should be undefined", i);
        }
        assert!(points[warmup].value.is_some());
    }

    #[test]
    fn macd_histogram_is_line_minus_signal() {
        let bars = make_bars(&ramp(40));
        let points = macd_points(&bars, 12, 26, 9);

        for p in &points {
            if let Some(IndicatorValue::Macd {
                line,
                signal,
                histogram,
            }) = p.value
            {
                assert!((histogram - (line - signal)).abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn macd_line_is_ema_fast_minus_ema_slow() {
        let bars = make_bars(&[
            10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0,
        ]);
        let points = macd_points(&bars, 3, 5, 2);

        let ema_fast = ema_raw(&bars, 3);
        let ema_slow = ema_raw(&bars, 5);

        for (i, p) in points.iter().enumerate() {
            if let Some(IndicatorValue::Macd { line, .. }) = p.value {
                let expected = ema_fast[i] - ema_slow[i];
                assert!((line - expected).abs() < f64::EPSILON, "mismatch at {}", i);
            }
        }
    }

    #[test]
    fn macd_scalar_is_line() {
        let bars = make_bars(&ramp(20));
        let points = macd_points(&bars, 3, 5, 2);

        let defined = points.iter().find(|p| p.value.is_some()).unwrap();
        if let Some(IndicatorValue::Macd { line, .. }) = defined.value {
            assert_eq!(defined.scalar().unwrap(), line);
        } else {
            panic!("expected MACD value");
        }
    }

    #[test]
    fn macd_positive_in_uptrend() {
        // Fast EMA sits above slow EMA while prices rise steadily.
        let bars = make_bars(&ramp(50));
        let points = macd_points(&bars, 5, 10, 3);

        let last = points.last().unwrap();
        if let Some(IndicatorValue::Macd { line, .. }) = last.value {
            assert!(line > 0.0);
        } else {
            panic!("expected defined MACD at series end");
        }
    }

    #[test]
    fn macd_series_shorter_than_warmup() {
        let bars = make_bars(&ramp(10));
        let points = macd_points(&bars, 12, 26, 9);

        assert_eq!(points.len(), 10);
        assert!(points.iter().all(|p| p.value.is_none()));
    }

    #[test]
    fn macd_empty_bars() {
        let points = macd_points(&[], 12, 26, 9);
        assert!(points.is_empty());
    }

    #[test]
    fn macd_flat_series_is_zero() {
        let bars = make_bars(&[100.0; 40]);
        let points = macd_points(&bars, 12, 26, 9);

        for p in &points {
            if let Some(IndicatorValue::Macd {
                line,
                signal,
                histogram,
            }) = p.value
            {
                assert!(line.abs() < 1e-9);
                assert!(signal.abs() < 1e-9);
                assert!(histogram.abs() < 1e-9);
            }
        }
    }
}
