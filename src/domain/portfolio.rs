//! Single-position portfolio simulator.
//!
//! Replays the merged, time-ordered union of entry and exit events against
//! the bar series through a two-state machine (flat / long). At a given
//! timestamp exits are applied before entries. An exit while flat and an
//! entry while long are both ignored, so positions never overlap.
//!
//! The simulator never errors: degenerate inputs (no bars, no signals)
//! produce an empty ledger and a flat equity curve.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

use super::bar::PriceBar;
use super::rule::SignalEvent;

/// One round trip (or still-open position) in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub entry_timestamp: DateTime<Utc>,
    pub entry_price: f64,
    pub exit_timestamp: Option<DateTime<Utc>>,
    pub exit_price: Option<f64>,
    pub size: f64,
    pub realized_pnl: Option<f64>,
}

impl Trade {
    pub fn is_closed(&self) -> bool {
        self.exit_timestamp.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquityPoint {
    pub timestamp: DateTime<Utc>,
    pub equity: f64,
}

/// Trade ledger plus the per-bar equity curve (cash + marked position).
#[derive(Debug, Clone, Serialize)]
pub struct Simulation {
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    pub final_value: f64,
}

struct OpenPosition {
    entry_timestamp: DateTime<Utc>,
    entry_price: f64,
    size: f64,
    entry_commission: f64,
}

/// Replay entry/exit events against the price series.
///
/// Entries deploy the full current cash: size = cash / (price * (1 + rate)),
/// with the commission deducted from the entry value. Exits realize
/// PnL = (exit - entry) * size minus both commissions. A position still open
/// when the series ends stays in the ledger with no exit fields and is
/// marked to market in the equity curve.
pub fn simulate(
    bars: &[PriceBar],
    entries: &[SignalEvent],
    exits: &[SignalEvent],
    initial_cash: f64,
    commission_rate: f64,
) -> Simulation {
    let entry_at: HashSet<DateTime<Utc>> = entries.iter().map(|e| e.timestamp).collect();
    let exit_at: HashSet<DateTime<Utc>> = exits.iter().map(|e| e.timestamp).collect();

    let mut cash = initial_cash;
    let mut open: Option<OpenPosition> = None;
    let mut trades = Vec::new();
    let mut equity_curve = Vec::with_capacity(bars.len());

    for bar in bars {
        if exit_at.contains(&bar.timestamp) {
            if let Some(pos) = open.take() {
                let proceeds = pos.size * bar.close;
                let exit_commission = proceeds * commission_rate;
                cash += proceeds - exit_commission;
                trades.push(Trade {
                    entry_timestamp: pos.entry_timestamp,
                    entry_price: pos.entry_price,
                    exit_timestamp: Some(bar.timestamp),
                    exit_price: Some(bar.close),
                    size: pos.size,
                    realized_pnl: Some(
                        (bar.close - pos.entry_price) * pos.size
                            - pos.entry_commission
                            - exit_commission,
                    ),
                });
            }
        }

        if entry_at.contains(&bar.timestamp) && open.is_none() && bar.close > 0.0 {
            let size = cash / (bar.close * (1.0 + commission_rate));
            if size > 0.0 {
                let entry_commission = size * bar.close * commission_rate;
                cash -= size * bar.close + entry_commission;
                open = Some(OpenPosition {
                    entry_timestamp: bar.timestamp,
                    entry_price: bar.close,
                    size,
                    entry_commission,
                });
            }
        }

        let position_value = open.as_ref().map_or(0.0, |p| p.size * bar.close);
        equity_curve.push(EquityPoint {
            timestamp: bar.timestamp,
            equity: cash + position_value,
        });
    }

    if let Some(pos) = open {
        trades.push(Trade {
            entry_timestamp: pos.entry_timestamp,
            entry_price: pos.entry_price,
            exit_timestamp: None,
            exit_price: None,
            size: pos.size,
            realized_pnl: None,
        });
    }

    let final_value = equity_curve.last().map_or(initial_cash, |p| p.equity);

    Simulation {
        trades,
        equity_curve,
        final_value,
    }
}
