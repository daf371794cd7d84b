//! JSON strategy file adapter.
//!
//! Deserializes a [`StrategyDefinition`] and runs full validation, so a
//! strategy obtained here is ready for the engine.

use std::fs;
use std::path::Path;

use crate::domain::error::StratagemError;
use crate::domain::strategy::StrategyDefinition;

pub fn strategy_from_json(content: &str) -> Result<StrategyDefinition, StratagemError> {
    let strategy: StrategyDefinition =
        serde_json::from_str(content).map_err(|e| StratagemError::StrategyParse {
            file: "<inline>".to_string(),
            reason: e.to_string(),
        })?;
    strategy.validate()?;
    Ok(strategy)
}

pub fn strategy_from_file<P: AsRef<Path>>(path: P) -> Result<StrategyDefinition, StratagemError> {
    let content = fs::read_to_string(path.as_ref())?;
    let strategy: StrategyDefinition =
        serde_json::from_str(&content).map_err(|e| StratagemError::StrategyParse {
            file: path.as_ref().display().to_string(),
            reason: e.to_string(),
        })?;
    strategy.validate()?;
    Ok(strategy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::IndicatorSpec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const GOLDEN_CROSS: &str = r#"{
        "name": "Golden Cross",
        "description": "50/200 SMA crossover",
        "indicators": [
            {"name": "sma_fast", "type": "sma", "window": 50},
            {"name": "sma_slow", "type": "sma", "window": 200}
        ],
        "crossover_rules": [
            {"name": "entry", "fast_indicator": "sma_fast", "slow_indicator": "sma_slow",
             "direction": "above", "signal_type": "entry"},
            {"name": "exit", "fast_indicator": "sma_fast", "slow_indicator": "sma_slow",
             "direction": "below", "signal_type": "exit"}
        ]
    }"#;

    #[test]
    fn parses_and_validates() {
        let strategy = strategy_from_json(GOLDEN_CROSS).unwrap();
        assert_eq!(strategy.name, "Golden Cross");
        assert_eq!(strategy.indicators[0].spec, IndicatorSpec::Sma { window: 50 });
        assert_eq!(strategy.crossover_rules.len(), 2);
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let result = strategy_from_json("{not json");
        assert!(matches!(result, Err(StratagemError::StrategyParse { .. })));
    }

    #[test]
    fn unresolved_reference_fails_validation() {
        let json = r#"{
            "name": "Broken",
            "indicators": [{"name": "rsi", "type": "rsi", "window": 14}],
            "crossover_rules": [
                {"name": "entry", "fast_indicator": "rsi", "slow_indicator": "sma_200",
                 "direction": "above", "signal_type": "entry"}
            ]
        }"#;
        let err = strategy_from_json(json).unwrap_err();
        assert!(matches!(
            err,
            StratagemError::UnknownIndicator { indicator, .. } if indicator == "sma_200"
        ));
    }

    #[test]
    fn bad_params_fail_validation() {
        let json = r#"{
            "name": "Broken",
            "indicators": [
                {"name": "macd", "type": "macd",
                 "fast_window": 26, "slow_window": 12, "signal_window": 9}
            ]
        }"#;
        assert!(matches!(
            strategy_from_json(json),
            Err(StratagemError::IndicatorParams { .. })
        ));
    }

    #[test]
    fn from_file_round_trip() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", GOLDEN_CROSS).unwrap();

        let strategy = strategy_from_file(file.path()).unwrap();
        assert_eq!(strategy.name, "Golden Cross");
    }

    #[test]
    fn from_file_missing_is_io_error() {
        let result = strategy_from_file("/nonexistent/strategy.json");
        assert!(matches!(result, Err(StratagemError::Io(_))));
    }
}
