//! stratagem — declarative strategy evaluation and backtesting engine.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].
//!
//! The two core entry points are [`analyze`] and [`backtest`]: pure,
//! synchronous functions from a strategy definition and a price series to a
//! fresh result. The engine holds no state between calls, so concurrent
//! evaluations of different strategies or symbols need no synchronization.

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;

pub use domain::backtest::{backtest, BacktestConfig, BacktestResult};
pub use domain::engine::{analyze, AnalysisResult};
pub use domain::error::StratagemError;
pub use domain::strategy::StrategyDefinition;
