//! Declarative strategy configuration model.
//!
//! A `StrategyDefinition` is produced by the caller (typically deserialized
//! from JSON by an outer layer), validated once, and read-only for the
//! engine. It has no lifecycle beyond a single evaluation call.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::error::StratagemError;
use super::indicator::IndicatorSpec;
use super::rule::{CrossoverRule, ThresholdRule};

/// A named indicator declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorDefinition {
    pub name: String,
    #[serde(flatten)]
    pub spec: IndicatorSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub indicators: Vec<IndicatorDefinition>,
    #[serde(default)]
    pub crossover_rules: Vec<CrossoverRule>,
    #[serde(default)]
    pub threshold_rules: Vec<ThresholdRule>,
}

impl StrategyDefinition {
    /// Full up-front validation: indicator names unique, parameters legal,
    /// at least one indicator declared, every rule reference resolvable.
    /// Runs before any series is computed; a failing strategy produces no
    /// partial results.
    pub fn validate(&self) -> Result<(), StratagemError> {
        if self.indicators.is_empty() {
            return Err(StratagemError::StrategyInvalid {
                reason: "strategy must declare at least one indicator".into(),
            });
        }

        let mut names: HashSet<&str> = HashSet::new();
        for ind in &self.indicators {
            ind.spec.validate(&ind.name)?;
            if !names.insert(ind.name.as_str()) {
                return Err(StratagemError::DuplicateIndicator {
                    name: ind.name.clone(),
                });
            }
        }

        let resolve = |rule: &str, indicator: &str| -> Result<(), StratagemError> {
            if names.contains(indicator) {
                Ok(())
            } else {
                Err(StratagemError::UnknownIndicator {
                    rule: rule.to_string(),
                    indicator: indicator.to_string(),
                })
            }
        };

        for rule in &self.crossover_rules {
            resolve(&rule.name, &rule.fast_indicator)?;
            resolve(&rule.name, &rule.slow_indicator)?;
        }
        for rule in &self.threshold_rules {
            resolve(&rule.name, &rule.indicator)?;
        }
        Ok(())
    }

    /// Look up a declared indicator by name.
    pub fn indicator(&self, name: &str) -> Option<&IndicatorDefinition> {
        self.indicators.iter().find(|i| i.name == name)
    }
}
