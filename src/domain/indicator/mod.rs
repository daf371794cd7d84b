//! Technical indicator types and dispatch.
//!
//! - `IndicatorSpec`: closed enum of indicator kinds + parameters
//! - `IndicatorValue`: per-point output shape (simple or MACD triple)
//! - `IndicatorPoint`: one (timestamp, value) sample; `None` during warm-up
//! - `ComputedIndicator`: a named, immutable indicator series
//!
//! [`compute`] dispatches to the per-kind kernels through one exhaustive
//! match; adding an indicator means adding a variant and a kernel module.

pub mod sma;
pub mod ema;
pub mod rsi;
pub mod macd;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::bar::PriceBar;
use crate::domain::error::StratagemError;

/// Indicator kind and parameters. Doubles as the identity of a computed
/// series: two definitions with equal specs produce identical output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IndicatorSpec {
    Sma {
        window: usize,
    },
    Ema {
        window: usize,
    },
    Rsi {
        window: usize,
    },
    Macd {
        fast_window: usize,
        slow_window: usize,
        signal_window: usize,
    },
}

impl IndicatorSpec {
    /// Parameter validation, run before any series is computed.
    pub fn validate(&self, name: &str) -> Result<(), StratagemError> {
        let fail = |reason: &str| {
            Err(StratagemError::IndicatorParams {
                name: name.to_string(),
                reason: reason.to_string(),
            })
        };
        match *self {
            IndicatorSpec::Sma { window }
            | IndicatorSpec::Ema { window }
            | IndicatorSpec::Rsi { window } => {
                if window == 0 {
                    return fail("window must be positive");
                }
            }
            IndicatorSpec::Macd {
                fast_window,
                slow_window,
                signal_window,
            } => {
                if fast_window == 0 || slow_window == 0 || signal_window == 0 {
                    return fail("all windows must be positive");
                }
                if fast_window >= slow_window {
                    return fail("fast_window must be less than slow_window");
                }
            }
        }
        Ok(())
    }

    /// Number of leading bars with undefined values.
    pub fn warmup(&self) -> usize {
        match *self {
            IndicatorSpec::Sma { window } | IndicatorSpec::Ema { window } => window - 1,
            IndicatorSpec::Rsi { window } => window,
            IndicatorSpec::Macd {
                slow_window,
                signal_window,
                ..
            } => slow_window - 1 + signal_window - 1,
        }
    }
}

impl fmt::Display for IndicatorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            IndicatorSpec::Sma { window } => write!(f, "SMA({})", window),
            IndicatorSpec::Ema { window } => write!(f, "EMA({})", window),
            IndicatorSpec::Rsi { window } => write!(f, "RSI({})", window),
            IndicatorSpec::Macd {
                fast_window,
                slow_window,
                signal_window,
            } => write!(f, "MACD({},{},{})", fast_window, slow_window, signal_window),
        }
    }
}

/// A defined sample of an indicator at one timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
}

impl IndicatorValue {
    /// The comparable value of a sample: the value itself, or the MACD line
    /// for the MACD triple.
    pub fn scalar(&self) -> f64 {
        match *self {
            IndicatorValue::Simple(v) => v,
            IndicatorValue::Macd { line, .. } => line,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorPoint {
    pub timestamp: DateTime<Utc>,
    pub value: Option<IndicatorValue>,
}

impl IndicatorPoint {
    pub fn scalar(&self) -> Option<f64> {
        self.value.map(|v| v.scalar())
    }
}

/// A fully computed indicator series, aligned one point per input bar.
/// Immutable once produced; owned by the engine for one evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct ComputedIndicator {
    pub name: String,
    pub spec: IndicatorSpec,
    pub points: Vec<IndicatorPoint>,
}

impl ComputedIndicator {
    /// Defined comparable value at bar index `i`, if any.
    pub fn scalar_at(&self, i: usize) -> Option<f64> {
        self.points.get(i).and_then(|p| p.scalar())
    }
}

/// Compute one indicator over a price series. Pure and deterministic;
/// parameters are assumed validated (see [`IndicatorSpec::validate`]).
pub fn compute(name: &str, spec: &IndicatorSpec, bars: &[PriceBar]) -> ComputedIndicator {
    let points = match *spec {
        IndicatorSpec::Sma { window } => sma::sma_points(bars, window),
        IndicatorSpec::Ema { window } => ema::ema_points(bars, window),
        IndicatorSpec::Rsi { window } => rsi::rsi_points(bars, window),
        IndicatorSpec::Macd {
            fast_window,
            slow_window,
            signal_window,
        } => macd::macd_points(bars, fast_window, slow_window, signal_window),
    };
    ComputedIndicator {
        name: name.to_string(),
        spec: *spec,
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_display() {
        assert_eq!(IndicatorSpec::Sma { window: 20 }.to_string(), "SMA(20)");
        assert_eq!(IndicatorSpec::Ema { window: 9 }.to_string(), "EMA(9)");
        assert_eq!(IndicatorSpec::Rsi { window: 14 }.to_string(), "RSI(14)");
        assert_eq!(
            IndicatorSpec::Macd {
                fast_window: 12,
                slow_window: 26,
                signal_window: 9
            }
            .to_string(),
            "MACD(12,26,9)"
        );
    }

    #[test]
    fn validate_zero_window() {
        let err = IndicatorSpec::Sma { window: 0 }.validate("sma").unwrap_err();
        assert!(matches!(err, StratagemError::IndicatorParams { .. }));
    }

    #[test]
    fn validate_macd_fast_not_less_than_slow() {
        let spec = IndicatorSpec::Macd {
            fast_window: 26,
            slow_window: 26,
            signal_window: 9,
        };
        assert!(spec.validate("macd").is_err());

        let spec = IndicatorSpec::Macd {
            fast_window: 12,
            slow_window: 26,
            signal_window: 9,
        };
        assert!(spec.validate("macd").is_ok());
    }

    #[test]
    fn warmup_lengths() {
        assert_eq!(IndicatorSpec::Sma { window: 5 }.warmup(), 4);
        assert_eq!(IndicatorSpec::Ema { window: 5 }.warmup(), 4);
        assert_eq!(IndicatorSpec::Rsi { window: 14 }.warmup(), 14);
        assert_eq!(
            IndicatorSpec::Macd {
                fast_window: 12,
                slow_window: 26,
                signal_window: 9
            }
            .warmup(),
            33
        );
    }

    #[test]
    fn value_scalar() {
        assert_eq!(IndicatorValue::Simple(42.0).scalar(), 42.0);
        let macd = IndicatorValue::Macd {
            line: 1.5,
            signal: 1.0,
            histogram: 0.5,
        };
        assert_eq!(macd.scalar(), 1.5);
    }

    #[test]
    fn spec_json_round_trip() {
        let spec = IndicatorSpec::Macd {
            fast_window: 12,
            slow_window: 26,
            signal_window: 9,
        };
        let json = serde_json::to_string(&spec).unwrap();
        let back: IndicatorSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, back);
    }

    #[test]
    fn spec_json_tag() {
        let json = serde_json::to_string(&IndicatorSpec::Ema { window: 10 }).unwrap();
        assert!(json.contains("\"type\":\"ema\""));
    }
}
