//! CLI definition and dispatch.

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_export;
use crate::adapters::csv_quote_adapter::CsvQuoteAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_state_adapter::JsonStateAdapter;
use crate::domain::error::PapertraderError;
use crate::domain::ledger::LedgerState;
use crate::domain::trading;
use crate::domain::universe::{self, Universe};
use crate::domain::valuation::valuation;
use crate::ports::config_port::ConfigPort;
use crate::ports::quote_port::QuotePort;
use crate::ports::state_port::StatePort;

pub const DEFAULT_STARTING_BALANCE: f64 = 500_000.0;
pub const DEFAULT_STATE_FILE: &str = "stock_data.json";
pub const DEFAULT_QUOTES_DIR: &str = "quotes";
pub const DEFAULT_EXPORT_FILE: &str = "stock_transactions.csv";

#[derive(Parser, Debug)]
#[command(name = "papertrader", about = "Simulated stock trading ledger")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Look up the latest price for a symbol
    Quote {
        #[arg(long)]
        symbol: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Buy shares against the cash balance
    Buy {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        quantity: i64,
        /// Trade at this price instead of looking one up
        #[arg(long)]
        price: Option<f64>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Sell shares from the portfolio
    Sell {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        quantity: i64,
        /// Trade at this price instead of looking one up
        #[arg(long)]
        price: Option<f64>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show holdings with unrealized profit/loss
    Portfolio {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Add a symbol to the watchlist
    Watch {
        #[arg(long)]
        symbol: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Remove a symbol from the watchlist
    Unwatch {
        #[arg(long)]
        symbol: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show the watchlist with current prices
    Watchlist {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Export transaction history to CSV
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Discard saved state and start over with a fresh ledger
    Reset {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Quote { symbol, config } => run_quote(&symbol, config.as_ref()),
        Command::Buy {
            symbol,
            quantity,
            price,
            config,
        } => run_buy(&symbol, quantity, price, config.as_ref()),
        Command::Sell {
            symbol,
            quantity,
            price,
            config,
        } => run_sell(&symbol, quantity, price, config.as_ref()),
        Command::Portfolio { config } => run_portfolio(config.as_ref()),
        Command::Watch { symbol, config } => run_watch(&symbol, config.as_ref()),
        Command::Unwatch { symbol, config } => run_unwatch(&symbol, config.as_ref()),
        Command::Watchlist { config } => run_watchlist(config.as_ref()),
        Command::Export { output, config } => run_export(output.as_ref(), config.as_ref()),
        Command::Reset { config } => run_reset(config.as_ref()),
    }
}

/// Resolved configuration. Every key has a built-in default, so running
/// without a config file works out of the box.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub starting_balance: f64,
    pub state_file: PathBuf,
    pub symbols: Vec<String>,
    pub quotes_dir: PathBuf,
}

pub fn build_settings(config: &dyn ConfigPort) -> Result<Settings, PapertraderError> {
    let starting_balance =
        config.get_double("ledger", "starting_balance", DEFAULT_STARTING_BALANCE);
    if starting_balance <= 0.0 {
        return Err(PapertraderError::ConfigInvalid {
            section: "ledger".into(),
            key: "starting_balance".into(),
            reason: "must be positive".into(),
        });
    }

    let state_file = config
        .get_string("ledger", "state_file")
        .unwrap_or_else(|| DEFAULT_STATE_FILE.to_string());

    let symbols = match config.get_string("market", "symbols") {
        Some(list) => universe::parse_symbols(&list)?,
        None => universe::DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
    };

    let quotes_dir = config
        .get_string("market", "quotes_dir")
        .unwrap_or_else(|| DEFAULT_QUOTES_DIR.to_string());

    Ok(Settings {
        starting_balance,
        state_file: PathBuf::from(state_file),
        symbols,
        quotes_dir: PathBuf::from(quotes_dir),
    })
}

/// Load the INI file when one was given; otherwise fall back to built-in
/// defaults for everything.
pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, ExitCode> {
    match path {
        Some(p) => FileConfigAdapter::from_file(p).map_err(|e| {
            let err = PapertraderError::ConfigParse {
                file: p.display().to_string(),
                reason: e.to_string(),
            };
            eprintln!("error: {err}");
            ExitCode::from(&err)
        }),
        None => Ok(FileConfigAdapter::empty()),
    }
}

struct Context {
    universe: Universe,
    state_adapter: JsonStateAdapter,
    quotes: CsvQuoteAdapter,
}

fn build_context(config_path: Option<&PathBuf>) -> Result<Context, ExitCode> {
    let config = load_config(config_path)?;
    let settings = match build_settings(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return Err((&e).into());
        }
    };

    let universe = Universe::new(settings.symbols.clone());
    let state_adapter = JsonStateAdapter::new(settings.state_file, settings.starting_balance);
    let quotes = CsvQuoteAdapter::new(settings.quotes_dir);

    Ok(Context {
        universe,
        state_adapter,
        quotes,
    })
}

fn load_state(adapter: &JsonStateAdapter) -> Result<LedgerState, ExitCode> {
    adapter.load().map_err(|e| {
        eprintln!("error: {e}");
        if matches!(e, PapertraderError::CorruptState { .. }) {
            eprintln!("run 'papertrader reset' to discard it and start fresh");
        }
        ExitCode::from(&e)
    })
}

fn resolve_price(
    quotes: &dyn QuotePort,
    symbol: &str,
    override_price: Option<f64>,
) -> Result<f64, PapertraderError> {
    match override_price {
        Some(price) if price > 0.0 => Ok(price),
        Some(price) => Err(PapertraderError::InvalidPrice { price }),
        None => quotes.latest_close(symbol),
    }
}

fn run_quote(symbol: &str, config_path: Option<&PathBuf>) -> ExitCode {
    let ctx = match build_context(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let symbol = match ctx.universe.resolve(symbol) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match ctx.quotes.latest_close(&symbol) {
        Ok(price) => {
            println!("{symbol}: {price:.2}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_buy(
    symbol: &str,
    quantity: i64,
    price: Option<f64>,
    config_path: Option<&PathBuf>,
) -> ExitCode {
    let ctx = match build_context(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let symbol = match ctx.universe.resolve(symbol) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let mut state = match load_state(&ctx.state_adapter) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let price = match resolve_price(&ctx.quotes, &symbol, price) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let receipt = match trading::buy(&mut state, &symbol, quantity, price, Utc::now()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if let Err(e) = ctx.state_adapter.save(&state) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    println!(
        "Bought {} shares of {} at {:.2} (cost {:.2})",
        receipt.quantity, receipt.symbol, receipt.price, receipt.cost
    );
    println!("Balance: {:.2}", state.balance);
    ExitCode::SUCCESS
}

fn run_sell(
    symbol: &str,
    quantity: i64,
    price: Option<f64>,
    config_path: Option<&PathBuf>,
) -> ExitCode {
    let ctx = match build_context(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let symbol = match ctx.universe.resolve(symbol) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let mut state = match load_state(&ctx.state_adapter) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let price = match resolve_price(&ctx.quotes, &symbol, price) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let receipt = match trading::sell(&mut state, &symbol, quantity, price, Utc::now()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if let Err(e) = ctx.state_adapter.save(&state) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    println!(
        "Sold {} shares of {} at {:.2} (proceeds {:.2})",
        receipt.quantity, receipt.symbol, receipt.price, receipt.proceeds
    );
    println!("Profit/Loss: {:.2}", receipt.profit_loss);
    println!("Balance: {:.2}", state.balance);
    ExitCode::SUCCESS
}

fn run_portfolio(config_path: Option<&PathBuf>) -> ExitCode {
    let ctx = match build_context(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let state = match load_state(&ctx.state_adapter) {
        Ok(s) => s,
        Err(code) => return code,
    };

    if state.holdings.is_empty() {
        println!("No holdings.");
        println!("Balance: {:.2}", state.balance);
        return ExitCode::SUCCESS;
    }

    let mut symbols: Vec<&String> = state.holdings.keys().collect();
    symbols.sort();

    for symbol in symbols {
        match ctx.quotes.latest_close(symbol) {
            Ok(price) => {
                // holding exists for every key we iterate
                if let Ok(v) = valuation(&state, symbol, price) {
                    for lot in &v.lots {
                        println!(
                            "{}: {} shares at {:.2} (current: {:.2}), Profit/Loss: {:.2}",
                            symbol, lot.quantity, lot.purchase_price, price, lot.profit_loss
                        );
                    }
                    println!(
                        "  {} total: {} shares, value {:.2}, Profit/Loss: {:.2}",
                        symbol, v.total_quantity, v.market_value, v.total_profit_loss
                    );
                }
            }
            Err(e) => {
                eprintln!("warning: {e}");
                if let Some(lots) = state.lots(symbol) {
                    for lot in lots {
                        println!(
                            "{}: {} shares at {:.2} (current price unavailable)",
                            symbol, lot.quantity, lot.purchase_price
                        );
                    }
                }
            }
        }
    }

    println!("Balance: {:.2}", state.balance);
    ExitCode::SUCCESS
}

fn run_watch(symbol: &str, config_path: Option<&PathBuf>) -> ExitCode {
    let ctx = match build_context(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let symbol = match ctx.universe.resolve(symbol) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let mut state = match load_state(&ctx.state_adapter) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let added = state.watch(&symbol);
    if let Err(e) = ctx.state_adapter.save(&state) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    if added {
        println!("Added {symbol} to watchlist.");
    } else {
        println!("{symbol} is already on the watchlist.");
    }
    ExitCode::SUCCESS
}

fn run_unwatch(symbol: &str, config_path: Option<&PathBuf>) -> ExitCode {
    let ctx = match build_context(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let symbol = match ctx.universe.resolve(symbol) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let mut state = match load_state(&ctx.state_adapter) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let removed = state.unwatch(&symbol);
    if let Err(e) = ctx.state_adapter.save(&state) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    if removed {
        println!("Removed {symbol} from watchlist.");
    } else {
        println!("{symbol} was not on the watchlist.");
    }
    ExitCode::SUCCESS
}

fn run_watchlist(config_path: Option<&PathBuf>) -> ExitCode {
    let ctx = match build_context(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let state = match load_state(&ctx.state_adapter) {
        Ok(s) => s,
        Err(code) => return code,
    };

    if state.watchlist.is_empty() {
        println!("Watchlist is empty.");
        return ExitCode::SUCCESS;
    }

    let mut symbols: Vec<&String> = state.watchlist.iter().collect();
    symbols.sort();

    for symbol in symbols {
        match ctx.quotes.latest_close(symbol) {
            Ok(price) => println!("{symbol}: {price:.2}"),
            Err(_) => println!("{symbol}: price unavailable"),
        }
    }
    ExitCode::SUCCESS
}

fn run_export(output: Option<&PathBuf>, config_path: Option<&PathBuf>) -> ExitCode {
    let ctx = match build_context(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let state = match load_state(&ctx.state_adapter) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let output = output
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE));

    match csv_export::export_to_file(&state.transactions, &output) {
        Ok(()) => {
            eprintln!(
                "Exported {} transactions to {}",
                state.transactions.len(),
                output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_reset(config_path: Option<&PathBuf>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let settings = match build_settings(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let adapter = JsonStateAdapter::new(settings.state_file, settings.starting_balance);
    let state = LedgerState::new(settings.starting_balance);

    match adapter.save(&state) {
        Ok(()) => {
            eprintln!(
                "Ledger reset: balance {:.2}, no holdings, no transactions",
                state.balance
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
