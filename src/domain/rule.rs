//! Declarative trading rules and the signal events they emit.
//!
//! Rules reference indicators by name; the references are resolved and
//! validated by [`crate::domain::strategy::StrategyDefinition::validate`]
//! before any evaluation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a rule produces position entries or exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalType {
    Entry,
    Exit,
}

/// Crossover direction: does the fast series cross above or below the slow?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossoverDirection {
    Above,
    Below,
}

/// Threshold condition: does the series cross above or below the level?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdCondition {
    Above,
    Below,
}

/// Fires when `fast_indicator` crosses `slow_indicator` in `direction`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossoverRule {
    pub name: String,
    pub fast_indicator: String,
    pub slow_indicator: String,
    pub direction: CrossoverDirection,
    pub signal_type: SignalType,
}

/// Fires when `indicator` crosses the fixed `threshold` per `condition`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub name: String,
    pub indicator: String,
    pub threshold: f64,
    pub condition: ThresholdCondition,
    pub signal_type: SignalType,
}

/// One rule firing at one bar. `price` is the close of that bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalEvent {
    pub timestamp: DateTime<Utc>,
    pub signal_type: SignalType,
    pub rule_name: String,
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossover_rule_fields() {
        let rule = CrossoverRule {
            name: "golden_cross".into(),
            fast_indicator: "sma_50".into(),
            slow_indicator: "sma_200".into(),
            direction: CrossoverDirection::Above,
            signal_type: SignalType::Entry,
        };
        assert_eq!(rule.direction, CrossoverDirection::Above);
        assert_eq!(rule.signal_type, SignalType::Entry);
    }

    #[test]
    fn threshold_rule_fields() {
        let rule = ThresholdRule {
            name: "rsi_oversold".into(),
            indicator: "rsi".into(),
            threshold: 30.0,
            condition: ThresholdCondition::Below,
            signal_type: SignalType::Entry,
        };
        assert_eq!(rule.condition, ThresholdCondition::Below);
        assert!((rule.threshold - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn signal_type_json_lowercase() {
        assert_eq!(serde_json::to_string(&SignalType::Entry).unwrap(), "\"entry\"");
        assert_eq!(serde_json::to_string(&SignalType::Exit).unwrap(), "\"exit\"");
    }

    #[test]
    fn crossover_rule_json_round_trip() {
        let json = r#"{
            "name": "death_cross",
            "fast_indicator": "ema_fast",
            "slow_indicator": "ema_slow",
            "direction": "below",
            "signal_type": "exit"
        }"#;
        let rule: CrossoverRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.name, "death_cross");
        assert_eq!(rule.direction, CrossoverDirection::Below);
        assert_eq!(rule.signal_type, SignalType::Exit);

        let back = serde_json::to_string(&rule).unwrap();
        let again: CrossoverRule = serde_json::from_str(&back).unwrap();
        assert_eq!(rule, again);
    }
}
