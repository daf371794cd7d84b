//! Performance metrics over the simulator output.

use serde::Serialize;

use super::portfolio::{EquityPoint, Trade};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Derived, read-only performance summary; recomputed on every simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    /// final_portfolio_value / initial_cash - 1, open positions marked to
    /// market at the final close.
    pub total_return: f64,
    /// mean(bar returns) / population stdev * sqrt(252); 0 when the curve is
    /// too short or the stdev is zero.
    pub sharpe_ratio: f64,
    /// Minimum of equity/peak - 1 over the curve; always <= 0, 0 for a
    /// never-declining curve.
    pub max_drawdown: f64,
    /// Winning closed trades / closed trades; 0 when no trade has closed.
    pub win_rate: f64,
    /// Closed and still-open trades.
    pub total_trades: usize,
    pub final_portfolio_value: f64,
}

impl PerformanceMetrics {
    pub fn compute(initial_cash: f64, trades: &[Trade], equity_curve: &[EquityPoint]) -> Self {
        let final_portfolio_value = equity_curve.last().map_or(initial_cash, |p| p.equity);

        let total_return = if initial_cash > 0.0 {
            final_portfolio_value / initial_cash - 1.0
        } else {
            0.0
        };

        let closed = trades.iter().filter(|t| t.is_closed()).count();
        let wins = trades
            .iter()
            .filter(|t| t.realized_pnl.is_some_and(|pnl| pnl > 0.0))
            .count();
        let win_rate = if closed > 0 {
            wins as f64 / closed as f64
        } else {
            0.0
        };

        PerformanceMetrics {
            total_return,
            sharpe_ratio: compute_sharpe(equity_curve),
            max_drawdown: compute_drawdown(equity_curve),
            win_rate,
            total_trades: trades.len(),
            final_portfolio_value,
        }
    }
}

/// Minimum of equity(t)/peak(t) - 1, peak running over the curve so far.
fn compute_drawdown(equity_curve: &[EquityPoint]) -> f64 {
    let mut peak = f64::MIN;
    let mut max_dd = 0.0_f64;

    for point in equity_curve {
        if point.equity > peak {
            peak = point.equity;
        }
        if peak > 0.0 {
            let dd = point.equity / peak - 1.0;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

fn compute_sharpe(equity_curve: &[EquityPoint]) -> f64 {
    if equity_curve.len() < 2 {
        return 0.0;
    }

    let returns: Vec<f64> = equity_curve
        .windows(2)
        .map(|w| {
            if w[0].equity > 0.0 {
                w[1].equity / w[0].equity - 1.0
            } else {
                0.0
            }
        })
        .collect();

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    if stddev > 0.0 {
        mean / stddev * TRADING_DAYS_PER_YEAR.sqrt()
    } else {
        0.0
    }
}
