//! Property tests for indicator warm-up, value ranges, and simulator
//! invariants.

mod common;

use common::make_bars;
use proptest::prelude::*;

use stratagem::domain::backtest::{backtest, BacktestConfig};
use stratagem::domain::indicator::{compute, IndicatorSpec};
use stratagem::domain::presets;

fn price_series() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(1.0f64..1000.0, 1..80)
}

proptest! {
    #[test]
    fn sma_warmup_prefix_then_defined(prices in price_series(), window in 1usize..20) {
        let bars = make_bars(&prices);
        let spec = IndicatorSpec::Sma { window };
        let computed = compute("sma", &spec, &bars);

        prop_assert_eq!(computed.points.len(), bars.len());
        for (i, point) in computed.points.iter().enumerate() {
            if i < window - 1 {
                prop_assert!(point.value.is_none());
            } else {
                let v = point.scalar();
                prop_assert!(v.is_some());
                prop_assert!(v.unwrap().is_finite());
            }
        }
    }

    #[test]
    fn ema_warmup_prefix_then_defined(prices in price_series(), window in 1usize..20) {
        let bars = make_bars(&prices);
        let spec = IndicatorSpec::Ema { window };
        let computed = compute("ema", &spec, &bars);

        for (i, point) in computed.points.iter().enumerate() {
            if i < window - 1 {
                prop_assert!(point.value.is_none());
            } else {
                let v = point.scalar();
                prop_assert!(v.is_some());
                prop_assert!(v.unwrap().is_finite());
            }
        }
    }

    #[test]
    fn rsi_defined_values_in_range(prices in price_series(), window in 1usize..20) {
        let bars = make_bars(&prices);
        let spec = IndicatorSpec::Rsi { window };
        let computed = compute("rsi", &spec, &bars);

        for point in &computed.points {
            if let Some(rsi) = point.scalar() {
                prop_assert!((0.0..=100.0).contains(&rsi));
            }
        }
    }

    #[test]
    fn backtest_invariants_hold(prices in price_series()) {
        let strategy = presets::ema_crossover("cross", 3, 7);
        let bars = make_bars(&prices);
        let result = backtest(&strategy, &bars, &BacktestConfig::default()).unwrap();

        // Drawdown is a non-positive fraction.
        prop_assert!(result.metrics.max_drawdown <= 0.0);

        // Win rate is a probability.
        prop_assert!((0.0..=1.0).contains(&result.metrics.win_rate));

        // At most the final trade may remain open.
        let open = result.trades.iter().filter(|t| !t.is_closed()).count();
        prop_assert!(open <= 1);
        if open == 1 {
            prop_assert!(!result.trades.last().unwrap().is_closed());
        }

        // Equity curve covers every bar; the final value matches it.
        prop_assert_eq!(result.equity_curve.len(), bars.len());
        let last = result.equity_curve.last().unwrap().equity;
        prop_assert_eq!(result.metrics.final_portfolio_value, last);
    }

    #[test]
    fn analyze_entry_stream_has_unique_timestamps(prices in price_series()) {
        let strategy = presets::ema_crossover("cross", 3, 7);
        let bars = make_bars(&prices);
        let result = stratagem::analyze(&strategy, &bars).unwrap();

        for pair in result.entry_signals.windows(2) {
            prop_assert!(pair[0].timestamp < pair[1].timestamp);
        }
        for pair in result.exit_signals.windows(2) {
            prop_assert!(pair[0].timestamp < pair[1].timestamp);
        }
    }
}
