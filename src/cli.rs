//! CLI definition and dispatch.
//!
//! Narration goes to stderr, data to stdout; exit codes come from the error
//! taxonomy via `From<&StratagemError> for ExitCode`.

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::config_adapter::{backtest_config, FileConfigAdapter};
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::strategy_json::strategy_from_file;
use crate::domain::backtest::{backtest, BacktestConfig, BacktestResult};
use crate::domain::bar::PriceBar;
use crate::domain::engine::{analyze, AnalysisResult};
use crate::domain::error::StratagemError;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "stratagem", about = "Technical-analysis strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate a strategy and report its signals
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        strategy: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Run a backtest and report performance metrics
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        strategy: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        initial_cash: Option<f64>,
        #[arg(long)]
        commission: Option<f64>,
        #[arg(long)]
        json: bool,
    },
    /// Validate a strategy definition file
    Validate {
        #[arg(short, long)]
        strategy: PathBuf,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data coverage for symbol(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            config,
            strategy,
            symbol,
            json,
        } => run_analyze(&config, &strategy, symbol.as_deref(), json),
        Command::Backtest {
            config,
            strategy,
            symbol,
            initial_cash,
            commission,
            json,
        } => run_backtest(
            &config,
            &strategy,
            symbol.as_deref(),
            initial_cash,
            commission,
            json,
        ),
        Command::Validate { strategy } => run_validate(&strategy),
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
    }
}

fn fail(err: &StratagemError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    eprintln!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path).map_err(|e| fail(&e))
}

fn data_adapter(config: &dyn ConfigPort) -> Result<CsvAdapter, ExitCode> {
    let dir = config
        .get_string("data", "dir")
        .ok_or_else(|| {
            fail(&StratagemError::ConfigMissing {
                section: "data".into(),
                key: "dir".into(),
            })
        })?;
    Ok(CsvAdapter::new(PathBuf::from(dir)))
}

fn resolve_symbol(
    symbol_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<String, ExitCode> {
    symbol_override
        .map(|s| s.to_uppercase())
        .or_else(|| {
            config
                .get_string("backtest", "symbol")
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
        })
        .ok_or_else(|| {
            fail(&StratagemError::ConfigMissing {
                section: "backtest".into(),
                key: "symbol".into(),
            })
        })
}

fn date_bound(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<DateTime<Utc>>, StratagemError> {
    match config.get_string("backtest", key) {
        None => Ok(None),
        Some(raw) => {
            let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                StratagemError::ConfigInvalid {
                    section: "backtest".into(),
                    key: key.into(),
                    reason: "invalid date format (expected YYYY-MM-DD)".into(),
                }
            })?;
            Ok(date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()))
        }
    }
}

fn fetch_bars(
    config: &dyn ConfigPort,
    symbol_override: Option<&str>,
) -> Result<(String, Vec<PriceBar>), ExitCode> {
    let adapter = data_adapter(config)?;
    let symbol = resolve_symbol(symbol_override, config)?;

    let start = date_bound(config, "start_date").map_err(|e| fail(&e))?;
    let end = date_bound(config, "end_date").map_err(|e| fail(&e))?;

    eprintln!("Fetching bars for {}", symbol);
    let bars = adapter
        .fetch_bars(&symbol, start, end)
        .map_err(|e| fail(&e))?;
    eprintln!("  {} bars loaded", bars.len());

    Ok((symbol, bars))
}

fn run_analyze(
    config_path: &PathBuf,
    strategy_path: &PathBuf,
    symbol_override: Option<&str>,
    json: bool,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let strategy = match strategy_from_file(strategy_path) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };
    eprintln!("Loaded strategy: {}", strategy.name);

    let (symbol, bars) = match fetch_bars(&config, symbol_override) {
        Ok(v) => v,
        Err(code) => return code,
    };

    let result = match analyze(&strategy, &bars) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    if json {
        return print_json(&result);
    }
    print_analysis(&symbol, &result);
    ExitCode::SUCCESS
}

fn print_analysis(symbol: &str, result: &AnalysisResult) {
    println!("=== Analysis: {} on {} ===", result.strategy_name, symbol);
    println!("Bars analyzed:    {}", result.summary.bars);
    println!("Indicators:");
    for ind in &result.indicators {
        let defined = ind.points.iter().filter(|p| p.value.is_some()).count();
        println!("  {:12} {} ({} defined points)", ind.name, ind.spec, defined);
    }
    println!("Rule signals:");
    for rs in &result.rule_signals {
        println!("  {:12} {} events", rs.rule_name, rs.events.len());
    }
    println!("Entry signals:    {}", result.summary.entry_signals);
    println!("Exit signals:     {}", result.summary.exit_signals);

    for event in result.entry_signals.iter().chain(&result.exit_signals) {
        println!(
            "  {:5?} {} @ {:.2}",
            event.signal_type,
            event.timestamp.format("%Y-%m-%d"),
            event.price
        );
    }
}

fn run_backtest(
    config_path: &PathBuf,
    strategy_path: &PathBuf,
    symbol_override: Option<&str>,
    initial_cash: Option<f64>,
    commission: Option<f64>,
    json: bool,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let strategy = match strategy_from_file(strategy_path) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };
    eprintln!("Loaded strategy: {}", strategy.name);

    let mut bt_config = match backtest_config(&config) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    if let Some(cash) = initial_cash {
        bt_config.initial_cash = cash;
    }
    if let Some(rate) = commission {
        bt_config.commission_rate = rate;
    }

    let (symbol, bars) = match fetch_bars(&config, symbol_override) {
        Ok(v) => v,
        Err(code) => return code,
    };

    eprintln!(
        "Running backtest: {} bars, initial cash {:.2}",
        bars.len(),
        bt_config.initial_cash
    );
    let result = match backtest(&strategy, &bars, &bt_config) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    if json {
        return print_json(&result);
    }
    print_backtest(&symbol, &bt_config, &result);
    ExitCode::SUCCESS
}

fn print_backtest(symbol: &str, config: &BacktestConfig, result: &BacktestResult) {
    let m = &result.metrics;
    println!(
        "=== Backtest: {} on {} ===",
        result.analysis.strategy_name, symbol
    );
    println!("Total Return:     {:.2}%", m.total_return * 100.0);
    println!("Sharpe Ratio:     {:.2}", m.sharpe_ratio);
    println!("Max Drawdown:     {:.2}%", m.max_drawdown * 100.0);
    println!("Win Rate:         {:.1}%", m.win_rate * 100.0);
    println!("Total Trades:     {}", m.total_trades);
    println!(
        "Final Value:      {:.2} (from {:.2})",
        m.final_portfolio_value, config.initial_cash
    );

    if !result.trades.is_empty() {
        println!("\nTrades:");
        for trade in &result.trades {
            let entry = trade.entry_timestamp.format("%Y-%m-%d");
            match (trade.exit_timestamp, trade.exit_price, trade.realized_pnl) {
                (Some(exit_ts), Some(exit_price), Some(pnl)) => {
                    println!(
                        "  {} @ {:.2} -> {} @ {:.2}  pnl {:+.2}",
                        entry,
                        trade.entry_price,
                        exit_ts.format("%Y-%m-%d"),
                        exit_price,
                        pnl
                    );
                }
                _ => {
                    println!("  {} @ {:.2} -> still open", entry, trade.entry_price);
                }
            }
        }
    }
}

fn run_validate(strategy_path: &PathBuf) -> ExitCode {
    eprintln!("Validating strategy: {}", strategy_path.display());
    match strategy_from_file(strategy_path) {
        Ok(strategy) => {
            println!("Strategy '{}' is valid", strategy.name);
            println!("  indicators: {}", strategy.indicators.len());
            println!(
                "  rules: {} crossover, {} threshold",
                strategy.crossover_rules.len(),
                strategy.threshold_rules.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_list_symbols(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let adapter = match data_adapter(&config) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match adapter.list_symbols() {
        Ok(symbols) => {
            if symbols.is_empty() {
                eprintln!("No symbols found");
            } else {
                for symbol in &symbols {
                    println!("{}", symbol);
                }
                eprintln!("{} symbols found", symbols.len());
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_info(config_path: &PathBuf, symbol_override: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let adapter = match data_adapter(&config) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let symbols = match symbol_override {
        Some(s) => vec![s.to_uppercase()],
        None => match adapter.list_symbols() {
            Ok(s) => s,
            Err(e) => return fail(&e),
        },
    };

    for symbol in &symbols {
        match adapter.data_range(symbol) {
            Ok(Some((first, last, count))) => {
                println!(
                    "{}: {} bars, {} to {}",
                    symbol,
                    count,
                    first.format("%Y-%m-%d"),
                    last.format("%Y-%m-%d")
                );
            }
            Ok(None) => eprintln!("{}: no data", symbol),
            Err(e) => eprintln!("error querying {}: {}", symbol, e),
        }
    }
    ExitCode::SUCCESS
}

fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize result: {e}");
            ExitCode::from(1)
        }
    }
}
