//! Rule evaluation: crossover and threshold event detection.
//!
//! Both detectors are crossing-based: an event fires only on the bar where
//! the relation flips, never while it merely holds. A bar qualifies only
//! when the inputs are defined at that bar and the previous one, so warm-up
//! prefixes and the first bar never fire.

use crate::domain::bar::PriceBar;
use crate::domain::indicator::ComputedIndicator;
use crate::domain::rule::{
    CrossoverDirection, CrossoverRule, SignalEvent, ThresholdCondition, ThresholdRule,
};

/// Detect sign changes of (fast - slow) per the rule's direction.
/// `Above` fires where the difference was <= 0 and turns > 0; `Below` is the
/// mirror. Exactly one event per qualifying bar.
pub fn crossover_signals(
    rule: &CrossoverRule,
    fast: &ComputedIndicator,
    slow: &ComputedIndicator,
    bars: &[PriceBar],
) -> Vec<SignalEvent> {
    let mut events = Vec::new();

    for i in 1..bars.len() {
        let (Some(f_prev), Some(s_prev)) = (fast.scalar_at(i - 1), slow.scalar_at(i - 1)) else {
            continue;
        };
        let (Some(f_curr), Some(s_curr)) = (fast.scalar_at(i), slow.scalar_at(i)) else {
            continue;
        };

        let fired = match rule.direction {
            CrossoverDirection::Above => f_prev - s_prev <= 0.0 && f_curr - s_curr > 0.0,
            CrossoverDirection::Below => f_prev - s_prev >= 0.0 && f_curr - s_curr < 0.0,
        };

        if fired {
            events.push(SignalEvent {
                timestamp: bars[i].timestamp,
                signal_type: rule.signal_type,
                rule_name: rule.name.clone(),
                price: bars[i].close,
            });
        }
    }
    events
}

/// Detect the indicator crossing the fixed threshold. `Above` fires where
/// the value was <= threshold and turns > threshold; `Below` is the mirror.
pub fn threshold_signals(
    rule: &ThresholdRule,
    indicator: &ComputedIndicator,
    bars: &[PriceBar],
) -> Vec<SignalEvent> {
    let mut events = Vec::new();

    for i in 1..bars.len() {
        let (Some(prev), Some(curr)) = (indicator.scalar_at(i - 1), indicator.scalar_at(i))
        else {
            continue;
        };

        let fired = match rule.condition {
            ThresholdCondition::Above => prev <= rule.threshold && curr > rule.threshold,
            ThresholdCondition::Below => prev >= rule.threshold && curr < rule.threshold,
        };

        if fired {
            events.push(SignalEvent {
                timestamp: bars[i].timestamp,
                signal_type: rule.signal_type,
                rule_name: rule.name.clone(),
                price: bars[i].close,
            });
        }
    }
    events
}
