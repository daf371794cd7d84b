//! Pre-built strategy patterns.

use super::indicator::IndicatorSpec;
use super::rule::{
    CrossoverDirection, CrossoverRule, SignalType, ThresholdCondition, ThresholdRule,
};
use super::strategy::{IndicatorDefinition, StrategyDefinition};

/// Two EMAs; enter when the fast one crosses above the slow one, exit on the
/// opposite cross.
pub fn ema_crossover(name: &str, fast_window: usize, slow_window: usize) -> StrategyDefinition {
    StrategyDefinition {
        name: name.to_string(),
        description: Some(format!("EMA crossover ({fast_window}/{slow_window})")),
        indicators: vec![
            IndicatorDefinition {
                name: "ema_fast".into(),
                spec: IndicatorSpec::Ema {
                    window: fast_window,
                },
            },
            IndicatorDefinition {
                name: "ema_slow".into(),
                spec: IndicatorSpec::Ema {
                    window: slow_window,
                },
            },
        ],
        crossover_rules: vec![
            CrossoverRule {
                name: "ema_entry".into(),
                fast_indicator: "ema_fast".into(),
                slow_indicator: "ema_slow".into(),
                direction: CrossoverDirection::Above,
                signal_type: SignalType::Entry,
            },
            CrossoverRule {
                name: "ema_exit".into(),
                fast_indicator: "ema_fast".into(),
                slow_indicator: "ema_slow".into(),
                direction: CrossoverDirection::Below,
                signal_type: SignalType::Exit,
            },
        ],
        threshold_rules: vec![],
    }
}

/// Single RSI; enter when it drops below `oversold`, exit when it rises
/// above `overbought`.
pub fn rsi_mean_reversion(
    name: &str,
    window: usize,
    oversold: f64,
    overbought: f64,
) -> StrategyDefinition {
    StrategyDefinition {
        name: name.to_string(),
        description: Some(format!("RSI mean reversion (window={window})")),
        indicators: vec![IndicatorDefinition {
            name: "rsi".into(),
            spec: IndicatorSpec::Rsi { window },
        }],
        crossover_rules: vec![],
        threshold_rules: vec![
            ThresholdRule {
                name: "rsi_entry".into(),
                indicator: "rsi".into(),
                threshold: oversold,
                condition: ThresholdCondition::Below,
                signal_type: SignalType::Entry,
            },
            ThresholdRule {
                name: "rsi_exit".into(),
                indicator: "rsi".into(),
                threshold: overbought,
                condition: ThresholdCondition::Above,
                signal_type: SignalType::Exit,
            },
        ],
    }
}
