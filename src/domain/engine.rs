//! Strategy engine: orchestrates indicator computation, rule evaluation,
//! and combination of rule events into entry/exit streams.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::bar::{validate_series, PriceBar};
use super::error::StratagemError;
use super::indicator::{compute, ComputedIndicator};
use super::rule::{SignalEvent, SignalType};
use super::rule_eval::{crossover_signals, threshold_signals};
use super::strategy::StrategyDefinition;

/// Name carried by events of the combined entry stream.
pub const COMBINED_ENTRY: &str = "combined_entry";
/// Name carried by events of the combined exit stream.
pub const COMBINED_EXIT: &str = "combined_exit";

/// Raw output of one rule, in rule declaration order.
#[derive(Debug, Clone, Serialize)]
pub struct RuleSignals {
    pub rule_name: String,
    pub signal_type: SignalType,
    pub events: Vec<SignalEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalysisSummary {
    pub bars: usize,
    pub raw_signals: usize,
    pub entry_signals: usize,
    pub exit_signals: usize,
}

/// Everything one evaluation produces: computed indicator series, raw
/// per-rule events, and the combined entry/exit streams.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub strategy_name: String,
    pub indicators: Vec<ComputedIndicator>,
    pub rule_signals: Vec<RuleSignals>,
    pub entry_signals: Vec<SignalEvent>,
    pub exit_signals: Vec<SignalEvent>,
    pub summary: AnalysisSummary,
}

/// Evaluate a strategy against a price series.
///
/// Validates the strategy and series up front, computes every declared
/// indicator exactly once (shared across rules referencing it), evaluates
/// every rule, and partitions the raw events by declared signal type into
/// the combined streams. A combined stream holds at most one event per
/// timestamp: the union of the contributing rules, since rules sharing a
/// signal type express independent, OR-combined conditions for the same
/// trading decision.
pub fn analyze(
    strategy: &StrategyDefinition,
    bars: &[PriceBar],
) -> Result<AnalysisResult, StratagemError> {
    strategy.validate()?;
    validate_series(bars)?;

    let indicators: Vec<ComputedIndicator> = strategy
        .indicators
        .iter()
        .map(|def| compute(&def.name, &def.spec, bars))
        .collect();

    let by_name: HashMap<&str, &ComputedIndicator> =
        indicators.iter().map(|c| (c.name.as_str(), c)).collect();

    let mut rule_signals = Vec::new();
    for rule in &strategy.crossover_rules {
        let fast = lookup(&by_name, &rule.name, &rule.fast_indicator)?;
        let slow = lookup(&by_name, &rule.name, &rule.slow_indicator)?;
        rule_signals.push(RuleSignals {
            rule_name: rule.name.clone(),
            signal_type: rule.signal_type,
            events: crossover_signals(rule, fast, slow, bars),
        });
    }
    for rule in &strategy.threshold_rules {
        let indicator = lookup(&by_name, &rule.name, &rule.indicator)?;
        rule_signals.push(RuleSignals {
            rule_name: rule.name.clone(),
            signal_type: rule.signal_type,
            events: threshold_signals(rule, indicator, bars),
        });
    }

    let entry_signals = combine(&rule_signals, SignalType::Entry, COMBINED_ENTRY);
    let exit_signals = combine(&rule_signals, SignalType::Exit, COMBINED_EXIT);

    let summary = AnalysisSummary {
        bars: bars.len(),
        raw_signals: rule_signals.iter().map(|r| r.events.len()).sum(),
        entry_signals: entry_signals.len(),
        exit_signals: exit_signals.len(),
    };

    Ok(AnalysisResult {
        strategy_name: strategy.name.clone(),
        indicators,
        rule_signals,
        entry_signals,
        exit_signals,
        summary,
    })
}

fn lookup<'a>(
    by_name: &HashMap<&str, &'a ComputedIndicator>,
    rule: &str,
    name: &str,
) -> Result<&'a ComputedIndicator, StratagemError> {
    by_name
        .get(name)
        .copied()
        .ok_or_else(|| StratagemError::UnknownIndicator {
            rule: rule.to_string(),
            indicator: name.to_string(),
        })
}

/// Union of all events with the given signal type, collapsed to one event
/// per timestamp and renamed to the combined-stream tag.
fn combine(rule_signals: &[RuleSignals], signal_type: SignalType, tag: &str) -> Vec<SignalEvent> {
    let mut by_timestamp = BTreeMap::new();
    for rs in rule_signals {
        for event in &rs.events {
            if event.signal_type == signal_type {
                by_timestamp.entry(event.timestamp).or_insert(event.price);
            }
        }
    }
    by_timestamp
        .into_iter()
        .map(|(timestamp, price)| SignalEvent {
            timestamp,
            signal_type,
            rule_name: tag.to_string(),
            price,
        })
        .collect()
}
