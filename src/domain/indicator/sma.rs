//! Simple Moving Average.
//!
//! Arithmetic mean of the trailing `window` closes. Warm-up: first
//! (window-1) bars are undefined.

use crate::domain::bar::PriceBar;
use crate::domain::indicator::{IndicatorPoint, IndicatorValue};

pub fn sma_points(bars: &[PriceBar], window: usize) -> Vec<IndicatorPoint> {
    let mut points = Vec::with_capacity(bars.len());
    if window == 0 {
        return bars
            .iter()
            .map(|b| IndicatorPoint {
                timestamp: b.timestamp,
                value: None,
            })
            .collect();
    }

    let mut sum = 0.0;
    for (i, bar) in bars.iter().enumerate() {
        sum += bar.close;
        if i >= window {
            sum -= bars[i - window].close;
        }
        let value = if i + 1 >= window {
            Some(IndicatorValue::Simple(sum / window as f64))
        } else {
            None
        };
        points.push(IndicatorPoint {
            timestamp: bar.timestamp,
            value,
        });
    }
    points
}
