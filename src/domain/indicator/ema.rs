//! Exponential Moving Average.
//!
//! k = 2/(window+1), seeded with the SMA of the first `window` closes, then
//! EMA[i] = C[i]*k + EMA[i-1]*(1-k). Warm-up: first (window-1) bars are
//! undefined.

use crate::domain::bar::PriceBar;
use crate::domain::indicator::{IndicatorPoint, IndicatorValue};

pub fn ema_points(bars: &[PriceBar], window: usize) -> Vec<IndicatorPoint> {
    let raw = ema_raw(bars, window);
    bars.iter()
        .zip(raw)
        .enumerate()
        .map(|(i, (bar, v))| IndicatorPoint {
            timestamp: bar.timestamp,
            value: if window > 0 && i + 1 >= window {
                Some(IndicatorValue::Simple(v))
            } else {
                None
            },
        })
        .collect()
}

/// Raw EMA values aligned to the input; warm-up slots hold 0.0 and are only
/// meaningful from index (window-1) on. Used directly by the MACD kernel.
pub(crate) fn ema_raw(bars: &[PriceBar], window: usize) -> Vec<f64> {
    let mut raw = vec![0.0; bars.len()];
    if window == 0 {
        return raw;
    }

    let k = 2.0 / (window as f64 + 1.0);
    let mut ema = 0.0;
    let mut sum = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        if i < window - 1 {
            sum += bar.close;
        } else if i == window - 1 {
            sum += bar.close;
            ema = sum / window as f64;
            raw[i] = ema;
        } else {
            ema = bar.close * k + ema * (1.0 - k);
            raw[i] = ema;
        }
    }
    raw
}
