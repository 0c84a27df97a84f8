//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

use crate::adapters::console_notifier::ConsoleNotifier;
use crate::adapters::csv_adapter::CsvCandleAdapter;
use crate::adapters::csv_export_adapter::CsvExportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_trade_store::JsonTradeStore;
use crate::bot::command::Command as BotCommand;
use crate::bot::{ChatContext, Session, TradingBot};
use crate::domain::config::{BotConfig, ExchangeSettings};
use crate::domain::error::SigtraderError;
use crate::logging;
use crate::ports::market_data_port::MarketDataPort;
use crate::ports::notifier_port::NotifierPort;

/// Recipient used for console replies when none is given.
pub const CONSOLE_RECIPIENT: &str = "console";

#[derive(Parser, Debug)]
#[command(name = "sigtrader", about = "Multi-timeframe crypto signal bot with a simulated portfolio")]
pub struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan on a schedule while reading commands from stdin
    Run {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Bind scheduled notices to this recipient without waiting for /start
        #[arg(short, long)]
        recipient: Option<String>,
    },
    /// Run a single scan cycle
    Scan {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, default_value = CONSOLE_RECIPIENT)]
        recipient: String,
    },
    /// Dispatch one command, e.g. `exec /analyze BTCUSDT`
    Exec {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, default_value = CONSOLE_RECIPIENT)]
        recipient: String,
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Validate the configuration and print the effective settings
    Validate {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    logging::init(cli.verbose);

    match execute(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Run one subcommand to completion.
pub fn execute(command: Command) -> Result<(), SigtraderError> {
    match command {
        Command::Run { config, recipient } => run_bot(config.as_deref(), recipient),
        Command::Scan { config, recipient } => run_scan(config.as_deref(), recipient),
        Command::Exec {
            config,
            recipient,
            text,
        } => run_exec(config.as_deref(), recipient, &text.join(" ")),
        Command::Validate { config } => run_validate(config.as_deref()),
    }
}

/// Typed settings from `path`. No path, or a path that does not exist,
/// yields the defaults.
pub fn load_config(path: Option<&Path>) -> Result<BotConfig, SigtraderError> {
    match path {
        None => Ok(BotConfig::default()),
        Some(p) if !p.exists() => {
            warn!(path = %p.display(), "config file not found, using defaults");
            Ok(BotConfig::default())
        }
        Some(p) => {
            info!(path = %p.display(), "loading config");
            let adapter = FileConfigAdapter::from_file(p)?;
            BotConfig::from_config(&adapter)
        }
    }
}

#[cfg(feature = "binance")]
fn exchange_provider(settings: &ExchangeSettings) -> Result<Box<dyn MarketDataPort>, SigtraderError> {
    use crate::adapters::binance_adapter::BinanceAdapter;
    Ok(Box::new(BinanceAdapter::new(settings)?))
}

#[cfg(not(feature = "binance"))]
fn exchange_provider(_settings: &ExchangeSettings) -> Result<Box<dyn MarketDataPort>, SigtraderError> {
    Err(SigtraderError::ConfigMissing {
        section: "scanner".into(),
        key: "data_dir".into(),
    })
}

/// Wire the adapters selected by `config` into a bot.
pub fn build_bot(config: BotConfig) -> Result<TradingBot, SigtraderError> {
    let market: Box<dyn MarketDataPort> = match &config.data_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "reading candles from local files");
            Box::new(CsvCandleAdapter::new(dir.clone()))
        }
        None => exchange_provider(&config.exchange)?,
    };
    let store = Box::new(JsonTradeStore::new(config.trade_log.clone()));
    TradingBot::new(config, market, store, Box::new(CsvExportAdapter))
}

fn run_scan(config_path: Option<&Path>, recipient: String) -> Result<(), SigtraderError> {
    let bot = build_bot(load_config(config_path)?)?;
    let ctx = ChatContext::new(recipient);
    let report = bot.scan_cycle(Some(&ctx), &ConsoleNotifier::stdout());

    for (symbol, reason) in &report.errors {
        eprintln!("warning: {symbol}: {reason}");
    }
    eprintln!(
        "Scan finished: {} opened, {} closed, {} failed",
        report.opened.len(),
        report.closed.len(),
        report.errors.len()
    );
    Ok(())
}

fn run_exec(config_path: Option<&Path>, recipient: String, text: &str) -> Result<(), SigtraderError> {
    let command: BotCommand = text.parse()?;
    let bot = build_bot(load_config(config_path)?)?;
    let ctx = ChatContext::new(recipient);
    let mut session = Session::bound_to(ctx.clone());

    bot.dispatch(&mut session, &ctx, command)
        .send(&ConsoleNotifier::stdout(), &ctx)
}

fn run_validate(config_path: Option<&Path>) -> Result<(), SigtraderError> {
    let config = load_config(config_path)?;

    println!("Configuration OK");
    match &config.data_dir {
        Some(dir) => println!("  candles:    {} (local files)", dir.display()),
        None => println!(
            "  exchange:   {} (timeout {}s, {} retries)",
            config.exchange.base_url, config.exchange.timeout_secs, config.exchange.max_retries
        ),
    }
    println!("  symbols:    {}", config.symbols.join(", "));
    let labels: Vec<&str> = config.timeframes.iter().map(|t| t.label.as_str()).collect();
    println!("  timeframes: {}", labels.join(", "));
    println!(
        "  scanner:    {} candles, every {}s, min score {:.2}",
        config.candle_limit, config.interval_secs, config.min_score
    );
    println!(
        "  portfolio:  {:.2} USDT, {:.2}% risk per trade",
        config.initial_capital,
        config.risk_per_trade * 100.0
    );
    println!("  trade log:  {}", config.trade_log.display());
    println!("  export:     {}", config.export_path.display());
    Ok(())
}

fn lock_session(session: &Mutex<Session>) -> std::sync::MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Scan, then wait out `interval` unless told to stop. Dropping the sender
/// counts as a stop.
fn schedule_scans(
    bot: &TradingBot,
    session: &Mutex<Session>,
    notifier: &dyn NotifierPort,
    interval: Duration,
    stop: &Receiver<()>,
) {
    loop {
        let ctx = lock_session(session).context().cloned();
        bot.scan_cycle(ctx.as_ref(), notifier);
        match stop.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    info!("scheduler stopped");
}

fn run_bot(config_path: Option<&Path>, recipient: Option<String>) -> Result<(), SigtraderError> {
    let bot = Arc::new(build_bot(load_config(config_path)?)?);
    let notifier = Arc::new(ConsoleNotifier::stdout());
    let console = ChatContext::new(recipient.clone().unwrap_or_else(|| CONSOLE_RECIPIENT.to_string()));
    let session = Arc::new(Mutex::new(match recipient {
        Some(r) => Session::bound_to(ChatContext::new(r)),
        None => Session::default(),
    }));
    let interval = Duration::from_secs(bot.config().interval_secs);

    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    let scheduler = {
        let bot = Arc::clone(&bot);
        let session = Arc::clone(&session);
        let notifier = Arc::clone(&notifier);
        thread::Builder::new()
            .name("scanner".into())
            .spawn(move || schedule_scans(&bot, &session, notifier.as_ref(), interval, &stop_rx))?
    };
    info!(interval_secs = interval.as_secs(), "bot running, reading commands from stdin");

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut local = lock_session(&session).clone();
        let ctx = local.context().cloned().unwrap_or_else(|| console.clone());
        let reply = bot.handle_command(&mut local, &ctx, &line);
        *lock_session(&session) = local;

        if let Err(e) = reply.send(notifier.as_ref(), &ctx) {
            warn!(error = %e, "reply not delivered");
        }
    }

    info!("stdin closed, stopping");
    let _ = stop_tx.send(());
    scheduler
        .join()
        .map_err(|_| SigtraderError::Io(std::io::Error::other("scheduler thread panicked")))
}
