//! Backtest entry point: analysis plus portfolio simulation.

use serde::Serialize;

use super::bar::PriceBar;
use super::engine::{analyze, AnalysisResult};
use super::error::StratagemError;
use super::metrics::PerformanceMetrics;
use super::portfolio::{simulate, EquityPoint, Trade};
use super::strategy::StrategyDefinition;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestConfig {
    pub initial_cash: f64,
    /// Fraction of trade value charged per leg (0.001 = 0.1%).
    pub commission_rate: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_cash: 10_000.0,
            commission_rate: 0.0,
        }
    }
}

impl BacktestConfig {
    pub fn validate(&self) -> Result<(), StratagemError> {
        if !self.initial_cash.is_finite() || self.initial_cash <= 0.0 {
            return Err(StratagemError::ConfigInvalid {
                section: "backtest".into(),
                key: "initial_cash".into(),
                reason: "initial_cash must be positive".into(),
            });
        }
        if !self.commission_rate.is_finite() || self.commission_rate < 0.0 {
            return Err(StratagemError::ConfigInvalid {
                section: "backtest".into(),
                key: "commission_rate".into(),
                reason: "commission_rate must be non-negative".into(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BacktestResult {
    pub metrics: PerformanceMetrics,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    pub analysis: AnalysisResult,
}

/// Run a full backtest: validate, analyze, replay the combined signal
/// streams through the simulator, and compute metrics. Pure function of its
/// inputs.
pub fn backtest(
    strategy: &StrategyDefinition,
    bars: &[PriceBar],
    config: &BacktestConfig,
) -> Result<BacktestResult, StratagemError> {
    config.validate()?;
    let analysis = analyze(strategy, bars)?;

    let sim = simulate(
        bars,
        &analysis.entry_signals,
        &analysis.exit_signals,
        config.initial_cash,
        config.commission_rate,
    );
    let metrics = PerformanceMetrics::compute(config.initial_cash, &sim.trades, &sim.equity_curve);

    Ok(BacktestResult {
        metrics,
        trades: sim.trades,
        equity_curve: sim.equity_curve,
        analysis,
    })
}
