//! Scan-cycle and command entry points.
//!
//! [`TradingBot`] wires the market data provider, the scorer and the ledger
//! together. It is shared between the scheduler and the command loop, so its
//! mutable parts sit behind locks. Who receives scheduled notices is not bot
//! state: callers pass a [`ChatContext`] in, usually taken from their
//! [`Session`].

pub mod command;
pub mod messages;

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};
use tracing::{debug, info, warn};

use crate::domain::config::BotConfig;
use crate::domain::consensus::{aggregate, Consensus};
use crate::domain::error::SigtraderError;
use crate::domain::ledger::{PortfolioInfo, PortfolioLedger, Unsaved};
use crate::domain::pipeline::analyze_symbol;
use crate::domain::scorer::SignalScorer;
use crate::domain::signal::TimeframeResult;
use crate::domain::trade::Trade;
use crate::ports::export_port::TradeExportPort;
use crate::ports::market_data_port::MarketDataPort;
use crate::ports::notifier_port::NotifierPort;
use crate::ports::trade_store_port::TradeStorePort;
use command::{Command, CommandError};

/// Where replies and notices go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatContext {
    pub recipient: String,
}

impl ChatContext {
    pub fn new(recipient: impl Into<String>) -> Self {
        ChatContext {
            recipient: recipient.into(),
        }
    }
}

/// Caller-owned conversation state. `/start` binds the recipient used for
/// scheduled scans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    bound: Option<ChatContext>,
}

impl Session {
    pub fn bound_to(ctx: ChatContext) -> Self {
        Session { bound: Some(ctx) }
    }

    pub fn context(&self) -> Option<&ChatContext> {
        self.bound.as_ref()
    }

    pub fn bind(&mut self, ctx: ChatContext) {
        self.bound = Some(ctx);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    File { path: PathBuf, caption: String },
}

impl Reply {
    pub fn send(&self, notifier: &dyn NotifierPort, ctx: &ChatContext) -> Result<(), SigtraderError> {
        match self {
            Reply::Text(text) => notifier.send_text(&ctx.recipient, text),
            Reply::File { path, caption } => notifier.send_file(&ctx.recipient, path, caption),
        }
    }
}

/// Outcome of one scan over every configured symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    pub closed: Vec<Trade>,
    pub opened: Vec<Trade>,
    /// `(symbol, reason)` for every symbol that failed part-way.
    pub errors: Vec<(String, String)>,
}

pub struct TradingBot {
    market: Box<dyn MarketDataPort>,
    scorer: RwLock<SignalScorer>,
    ledger: Mutex<PortfolioLedger>,
    exporter: Box<dyn TradeExportPort>,
    config: BotConfig,
}

fn split<T>(result: Result<T, Unsaved<T>>) -> (T, Result<(), SigtraderError>) {
    match result {
        Ok(applied) => (applied, Ok(())),
        Err(unsaved) => {
            let (applied, error) = unsaved.into_parts();
            (applied, Err(error))
        }
    }
}

fn notify(notifier: &dyn NotifierPort, ctx: &ChatContext, text: &str) {
    if let Err(e) = notifier.send_text(&ctx.recipient, text) {
        warn!(recipient = %ctx.recipient, error = %e, "notice not delivered");
    }
}

impl TradingBot {
    pub fn new(
        config: BotConfig,
        market: Box<dyn MarketDataPort>,
        store: Box<dyn TradeStorePort>,
        exporter: Box<dyn TradeExportPort>,
    ) -> Result<Self, SigtraderError> {
        let scorer = SignalScorer::new(config.min_score)?;
        let ledger = PortfolioLedger::open(store, config.initial_capital, config.risk_per_trade)?;
        Ok(TradingBot {
            market,
            scorer: RwLock::new(scorer),
            ledger: Mutex::new(ledger),
            exporter,
            config,
        })
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn portfolio_info(&self) -> PortfolioInfo {
        self.ledger().info()
    }

    pub fn min_score(&self) -> f64 {
        self.scorer.read().unwrap_or_else(PoisonError::into_inner).min_score()
    }

    fn ledger(&self) -> MutexGuard<'_, PortfolioLedger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn analyze(&self, symbol: &str) -> Result<Vec<TimeframeResult>, SigtraderError> {
        let scorer = self
            .scorer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        analyze_symbol(
            self.market.as_ref(),
            &scorer,
            symbol,
            &self.config.timeframes,
            self.config.candle_limit,
        )
    }

    /// Analyze every configured symbol in order, close trades whose stop or
    /// target was hit, and open a trade wherever the timeframes agree.
    ///
    /// Skipped entirely when no recipient is bound. A failing symbol is
    /// logged and recorded in the report; the remaining symbols still run.
    pub fn scan_cycle(&self, ctx: Option<&ChatContext>, notifier: &dyn NotifierPort) -> ScanReport {
        let mut report = ScanReport::default();
        let Some(ctx) = ctx else {
            warn!("no recipient bound, skipping scan");
            return report;
        };

        info!(symbols = self.config.symbols.len(), "scan started");
        for symbol in &self.config.symbols {
            if let Err(e) = self.scan_symbol(symbol, ctx, notifier, &mut report) {
                warn!(symbol = %symbol, error = %e, "scan failed for symbol");
                report.errors.push((symbol.clone(), e.to_string()));
            }
        }
        info!(
            closed = report.closed.len(),
            opened = report.opened.len(),
            errors = report.errors.len(),
            "scan finished"
        );
        report
    }

    fn scan_symbol(
        &self,
        symbol: &str,
        ctx: &ChatContext,
        notifier: &dyn NotifierPort,
        report: &mut ScanReport,
    ) -> Result<(), SigtraderError> {
        let results = self.analyze(symbol)?;
        let Some(current_price) = results.first().map(|r| r.signal.entry) else {
            return Ok(());
        };
        let consensus = aggregate(&results);
        debug!(
            symbol,
            direction = %consensus.direction,
            long_votes = consensus.long_votes,
            short_votes = consensus.short_votes,
            "consensus"
        );

        let mut notices = Vec::new();
        let outcome = self.settle_symbol(symbol, current_price, &consensus, &mut notices, report);
        for text in &notices {
            notify(notifier, ctx, text);
        }
        outcome
    }

    /// Close hit trades, then open on consensus, under one ledger lock.
    /// Trades that changed in memory are recorded even when the trade log
    /// write fails; that error is returned afterwards.
    fn settle_symbol(
        &self,
        symbol: &str,
        current_price: f64,
        consensus: &Consensus<'_>,
        notices: &mut Vec<String>,
        report: &mut ScanReport,
    ) -> Result<(), SigtraderError> {
        let mut ledger = self.ledger();

        let (closed, saved) = split(ledger.check_and_close_trades(symbol, current_price));
        for trade in closed {
            notices.push(messages::trade_closed(&trade, ledger.balance()));
            report.closed.push(trade);
        }
        saved?;

        let Some(signal) = consensus.signal() else {
            return Ok(());
        };
        let (trade, saved) = split(ledger.open_trade(
            symbol,
            consensus.direction,
            signal.entry,
            signal.stop_loss,
            signal.take_profit,
        ));
        notices.push(messages::auto_signal(signal, &trade, ledger.balance()));
        report.opened.push(trade);
        saved
    }

    /// Parse and run one command text.
    pub fn handle_command(&self, session: &mut Session, ctx: &ChatContext, text: &str) -> Reply {
        match text.parse::<Command>() {
            Ok(command) => self.dispatch(session, ctx, command),
            Err(e) => {
                debug!(input = text, error = %e, "command rejected");
                Reply::Text(messages::command_error(&e))
            }
        }
    }

    pub fn dispatch(&self, session: &mut Session, ctx: &ChatContext, command: Command) -> Reply {
        debug!(%command, recipient = %ctx.recipient, "dispatching command");
        let outcome = match command {
            Command::Start => {
                session.bind(ctx.clone());
                info!(recipient = %ctx.recipient, "recipient bound for scans");
                Ok(Reply::Text(messages::WELCOME.to_string()))
            }
            Command::Price(symbol) => self
                .market
                .get_price(&symbol)
                .map(|price| Reply::Text(messages::price(&symbol, price))),
            Command::Analyze(symbol) => self.analyze(&symbol).map(|results| {
                Reply::Text(messages::analysis(&symbol, &results, &aggregate(&results)))
            }),
            Command::Info => Ok(Reply::Text(messages::portfolio_info(
                &self.ledger().info(),
            ))),
            Command::History(limit) => {
                let ledger = self.ledger();
                let limit = limit.unwrap_or(self.config.history_limit);
                Ok(Reply::Text(messages::trade_history(
                    &ledger.trade_history(limit),
                )))
            }
            Command::Open => Ok(Reply::Text(messages::open_trades(
                &self.ledger().open_trades(),
            ))),
            Command::Reset => self
                .ledger()
                .reset(self.config.initial_capital, self.config.risk_per_trade)
                .map(|()| {
                    Reply::Text(messages::reset(
                        self.config.initial_capital,
                        self.config.risk_per_trade,
                    ))
                }),
            Command::SetRisk(risk) => self
                .ledger()
                .set_risk(risk)
                .map(|()| Reply::Text(messages::risk_set(risk))),
            Command::SetMinScore(min_score) => self
                .scorer
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .set_min_score(min_score)
                .map(|()| Reply::Text(messages::min_score_set(min_score))),
            Command::Export => self
                .ledger()
                .export(self.exporter.as_ref(), &self.config.export_path)
                .map(|written| match written {
                    Some(path) => Reply::File {
                        path,
                        caption: messages::EXPORT_CAPTION.to_string(),
                    },
                    None => Reply::Text(messages::NOTHING_TO_EXPORT.to_string()),
                }),
            Command::Help => Ok(Reply::Text(messages::help())),
        };

        outcome.unwrap_or_else(|e| {
            warn!(error = %e, "command failed");
            Reply::Text(messages::error(e))
        })
    }
}

/// Map a parse failure onto the crate error, for callers that exit on it.
impl From<CommandError> for SigtraderError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Unknown(input) => SigtraderError::UnknownCommand { input },
            other => SigtraderError::invalid_argument("command", other.to_string()),
        }
    }
}
