//! Domain error types.
//!
//! Configuration errors (invalid indicator parameters, unresolved rule
//! references, malformed price series) are fatal for an evaluation and are
//! raised before any computation starts. Insufficient history is never an
//! error; it surfaces as undefined indicator values and therefore fewer
//! signals.

/// Top-level error type for stratagem.
#[derive(Debug, thiserror::Error)]
pub enum StratagemError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid strategy: {reason}")]
    StrategyInvalid { reason: String },

    #[error("invalid parameters for indicator '{name}': {reason}")]
    IndicatorParams { name: String, reason: String },

    #[error("duplicate indicator name '{name}'")]
    DuplicateIndicator { name: String },

    #[error("rule '{rule}' references unknown indicator '{indicator}'")]
    UnknownIndicator { rule: String, indicator: String },

    #[error("strategy parse error in {file}: {reason}")]
    StrategyParse { file: String, reason: String },

    #[error("price series is empty")]
    EmptyPriceSeries,

    #[error("price series is not strictly ordered at index {index}")]
    UnorderedPriceSeries { index: usize },

    #[error("no data for symbol {symbol}")]
    NoData { symbol: String },

    #[error("data error for symbol {symbol}: {reason}")]
    DataFormat { symbol: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StratagemError> for std::process::ExitCode {
    fn from(err: &StratagemError) -> Self {
        let code: u8 = match err {
            StratagemError::Io(_) => 1,
            StratagemError::ConfigParse { .. }
            | StratagemError::ConfigMissing { .. }
            | StratagemError::ConfigInvalid { .. } => 2,
            StratagemError::StrategyInvalid { .. }
            | StratagemError::IndicatorParams { .. }
            | StratagemError::DuplicateIndicator { .. }
            | StratagemError::UnknownIndicator { .. }
            | StratagemError::StrategyParse { .. }
            | StratagemError::EmptyPriceSeries
            | StratagemError::UnorderedPriceSeries { .. } => 4,
            StratagemError::NoData { .. } | StratagemError::DataFormat { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
