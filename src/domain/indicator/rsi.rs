//! Relative Strength Index.
//!
//! Wilder smoothing for average gain/loss:
//! - Seed: simple mean of gains/losses over the first `window` changes
//! - Then: avg = (prev_avg * (window-1) + current) / window
//!
//! RSI = 100 - 100/(1 + avg_gain/avg_loss). When avg_loss is exactly zero
//! the ratio is treated as infinite (RSI = 100), except on a flat series
//! where avg_gain is also zero and RSI reports the neutral 50.
//!
//! Warm-up: first `window` bars are undefined (the seed needs `window`
//! price changes).

use crate::domain::bar::PriceBar;
use crate::domain::indicator::{IndicatorPoint, IndicatorValue};

pub fn rsi_points(bars: &[PriceBar], window: usize) -> Vec<IndicatorPoint> {
    let undefined = |b: &PriceBar| IndicatorPoint {
        timestamp: b.timestamp,
        value: None,
    };
    if window == 0 || bars.len() < 2 {
        return bars.iter().map(undefined).collect();
    }

    let changes: Vec<f64> = bars.windows(2).map(|w| w[1].close - w[0].close).collect();
    let gain = |c: &f64| c.max(0.0);
    let loss = |c: &f64| (-c).max(0.0);

    let mut points = Vec::with_capacity(bars.len());
    points.push(undefined(&bars[0]));

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for (i, bar) in bars.iter().enumerate().skip(1) {
        let c = i - 1;
        if c < window - 1 {
            points.push(undefined(bar));
            continue;
        }
        if c == window - 1 {
            avg_gain = changes[..window].iter().map(gain).sum::<f64>() / window as f64;
            avg_loss = changes[..window].iter().map(loss).sum::<f64>() / window as f64;
        } else {
            avg_gain = (avg_gain * (window - 1) as f64 + gain(&changes[c])) / window as f64;
            avg_loss = (avg_loss * (window - 1) as f64 + loss(&changes[c])) / window as f64;
        }
        points.push(IndicatorPoint {
            timestamp: bar.timestamp,
            value: Some(IndicatorValue::Simple(rsi_value(avg_gain, avg_loss))),
        });
    }
    points
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            50.0
        } else {
            100.0
        }
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
