//! Simulated portfolio ledger.
//!
//! Owns capital, risk policy and the append-only trade history. Every
//! mutating call writes the full trade list through the [`TradeStorePort`]
//! before returning. Balance is always `initial_capital + Σ closed PnL`; on
//! load it is recomputed from the stored trades rather than read back.
//!
//! A persistence failure is returned to the caller, but the in-memory
//! mutation that preceded it stands. Calls that create or close trades hand
//! those trades back inside [`Unsaved`] so the caller can still report them.

use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use super::error::SigtraderError;
use super::signal::Direction;
use super::trade::{Trade, TradeId};
use crate::ports::export_port::TradeExportPort;
use crate::ports::trade_store_port::TradeStorePort;

pub const DEFAULT_INITIAL_CAPITAL: f64 = 1000.0;
pub const DEFAULT_RISK_PER_TRADE: f64 = 0.005;
/// Risk-per-unit used when the stop sits on the wrong side of entry.
pub const FALLBACK_RISK_PCT: f64 = 0.01;

/// Point-in-time totals behind the portfolio summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioInfo {
    pub initial_capital: f64,
    pub balance: f64,
    pub total_pnl: f64,
    pub open_trades: usize,
    pub closed_trades: usize,
    pub risk_per_trade: f64,
}

/// A mutation applied in memory whose write-through to the store failed.
#[derive(Debug)]
pub struct Unsaved<T> {
    pub applied: T,
    pub error: SigtraderError,
}

impl<T> Unsaved<T> {
    pub fn into_parts(self) -> (T, SigtraderError) {
        (self.applied, self.error)
    }
}

impl<T> From<Unsaved<T>> for SigtraderError {
    fn from(unsaved: Unsaved<T>) -> Self {
        unsaved.error
    }
}

pub struct PortfolioLedger {
    initial_capital: f64,
    balance: f64,
    risk_per_trade: f64,
    trades: Vec<Trade>,
    store: Box<dyn TradeStorePort>,
}

impl std::fmt::Debug for PortfolioLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioLedger")
            .field("initial_capital", &self.initial_capital)
            .field("balance", &self.balance)
            .field("risk_per_trade", &self.risk_per_trade)
            .field("trades", &self.trades.len())
            .finish()
    }
}

pub fn validate_risk(risk_per_trade: f64) -> Result<(), SigtraderError> {
    if risk_per_trade > 0.0 && risk_per_trade <= 1.0 {
        Ok(())
    } else {
        Err(SigtraderError::invalid_argument(
            "risk_per_trade",
            format!("{} is outside (0, 1]", risk_per_trade),
        ))
    }
}

fn validate_capital(initial_capital: f64) -> Result<(), SigtraderError> {
    if initial_capital.is_finite() && initial_capital > 0.0 {
        Ok(())
    } else {
        Err(SigtraderError::invalid_argument(
            "initial_capital",
            format!("{} must be a positive amount", initial_capital),
        ))
    }
}

/// Position size for a trade risking `balance * risk_per_trade`.
///
/// Long risk per unit is `entry - stop_loss`, anything else `stop_loss - entry`.
/// A non-positive distance falls back to `entry * 0.01`.
pub fn position_size(
    balance: f64,
    risk_per_trade: f64,
    direction: Direction,
    entry: f64,
    stop_loss: f64,
) -> f64 {
    let risk_amount = balance * risk_per_trade;
    let mut risk_per_unit = match direction {
        Direction::Long => entry - stop_loss,
        _ => stop_loss - entry,
    };
    if risk_per_unit <= 0.0 {
        risk_per_unit = entry * FALLBACK_RISK_PCT;
    }
    risk_amount / risk_per_unit
}

impl PortfolioLedger {
    /// Build a ledger and rehydrate its history from `store`.
    ///
    /// A store that cannot be read is logged and treated as empty.
    pub fn open(
        store: Box<dyn TradeStorePort>,
        initial_capital: f64,
        risk_per_trade: f64,
    ) -> Result<Self, SigtraderError> {
        validate_capital(initial_capital)?;
        validate_risk(risk_per_trade)?;

        let trades = match store.load() {
            Ok(trades) => trades,
            Err(e) => {
                warn!(error = %e, "could not load trade log, starting empty");
                Vec::new()
            }
        };

        let mut ledger = PortfolioLedger {
            initial_capital,
            balance: initial_capital,
            risk_per_trade,
            trades,
            store,
        };
        ledger.balance = ledger.initial_capital + ledger.realized_pnl();
        info!(
            trades = ledger.trades.len(),
            balance = ledger.balance,
            "portfolio ledger loaded"
        );
        Ok(ledger)
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    pub fn risk_per_trade(&self) -> f64 {
        self.risk_per_trade
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn trade(&self, id: TradeId) -> Option<&Trade> {
        self.trades.get(id)
    }

    fn realized_pnl(&self) -> f64 {
        self.trades.iter().filter_map(|t| t.profit_loss).sum()
    }

    fn persist(&self) -> Result<(), SigtraderError> {
        self.store.save(&self.trades).inspect_err(|e| {
            error!(error = %e, "trade log write failed, keeping in-memory state");
        })
    }

    /// Size and record a new open trade, then persist.
    pub fn open_trade(
        &mut self,
        symbol: &str,
        direction: Direction,
        entry: f64,
        stop_loss: f64,
        take_profit: f64,
    ) -> Result<Trade, Unsaved<Trade>> {
        let size = position_size(
            self.balance,
            self.risk_per_trade,
            direction,
            entry,
            stop_loss,
        );
        let trade = Trade {
            symbol: symbol.to_string(),
            direction,
            entry,
            stop_loss,
            take_profit,
            size,
            open_time: Utc::now(),
            close_time: None,
            close_price: None,
            profit_loss: None,
        };
        info!(symbol, %direction, entry, size, "trade opened");
        self.trades.push(trade.clone());
        match self.persist() {
            Ok(()) => Ok(trade),
            Err(error) => Err(Unsaved {
                applied: trade,
                error,
            }),
        }
    }

    fn close_in_memory(&mut self, id: TradeId, close_price: f64) -> Option<Trade> {
        let trade = self.trades.get_mut(id)?;
        if !trade.is_open() {
            return None;
        }
        let pnl = trade.pnl_at(close_price);
        trade.close_price = Some(close_price);
        trade.profit_loss = Some(pnl);
        trade.close_time = Some(Utc::now());
        let closed = trade.clone();

        self.balance = self.initial_capital + self.realized_pnl();
        info!(
            symbol = %closed.symbol,
            direction = %closed.direction,
            close_price,
            pnl,
            balance = self.balance,
            "trade closed"
        );
        Some(closed)
    }

    /// Close one trade at `close_price`.
    ///
    /// Returns `Ok(None)` without touching state when the trade is already
    /// closed. An unknown id is an invalid argument.
    pub fn close_trade(
        &mut self,
        id: TradeId,
        close_price: f64,
    ) -> Result<Option<Trade>, SigtraderError> {
        if id >= self.trades.len() {
            return Err(SigtraderError::invalid_argument(
                "trade",
                format!("no trade with id {}", id),
            ));
        }
        match self.close_in_memory(id, close_price) {
            Some(trade) => {
                self.persist()?;
                Ok(Some(trade))
            }
            None => {
                debug!(id, "close ignored, trade already closed");
                Ok(None)
            }
        }
    }

    /// Close every open trade of `symbol` whose stop or target has been hit
    /// at `current_price`. Returns the trades closed by this call, also when
    /// the write-through fails.
    pub fn check_and_close_trades(
        &mut self,
        symbol: &str,
        current_price: f64,
    ) -> Result<Vec<Trade>, Unsaved<Vec<Trade>>> {
        let hits: Vec<TradeId> = self
            .trades
            .iter()
            .enumerate()
            .filter(|(_, t)| t.symbol == symbol && t.is_open())
            .filter(|(_, t)| t.hits_stop_loss(current_price) || t.hits_take_profit(current_price))
            .map(|(id, _)| id)
            .collect();

        let closed: Vec<Trade> = hits
            .into_iter()
            .filter_map(|id| self.close_in_memory(id, current_price))
            .collect();

        if closed.is_empty() {
            return Ok(closed);
        }
        match self.persist() {
            Ok(()) => Ok(closed),
            Err(error) => Err(Unsaved {
                applied: closed,
                error,
            }),
        }
    }

    /// Drop all history and start over with new capital and risk.
    pub fn reset(&mut self, initial_capital: f64, risk_per_trade: f64) -> Result<(), SigtraderError> {
        validate_capital(initial_capital)?;
        validate_risk(risk_per_trade)?;

        self.initial_capital = initial_capital;
        self.balance = initial_capital;
        self.risk_per_trade = risk_per_trade;
        self.trades.clear();
        info!(initial_capital, risk_per_trade, "portfolio reset");
        self.persist()
    }

    /// Leaves the ledger untouched when `risk_per_trade` is outside (0, 1].
    pub fn set_risk(&mut self, risk_per_trade: f64) -> Result<(), SigtraderError> {
        validate_risk(risk_per_trade)?;
        self.risk_per_trade = risk_per_trade;
        info!(risk_per_trade, "risk per trade updated");
        Ok(())
    }

    pub fn info(&self) -> PortfolioInfo {
        let open_trades = self.trades.iter().filter(|t| t.is_open()).count();
        PortfolioInfo {
            initial_capital: self.initial_capital,
            balance: self.balance,
            total_pnl: self.realized_pnl(),
            open_trades,
            closed_trades: self.trades.len() - open_trades,
            risk_per_trade: self.risk_per_trade,
        }
    }

    /// The last `limit` closed trades, oldest first.
    pub fn trade_history(&self, limit: usize) -> Vec<&Trade> {
        let closed: Vec<&Trade> = self.trades.iter().filter(|t| !t.is_open()).collect();
        let skip = closed.len().saturating_sub(limit);
        closed.into_iter().skip(skip).collect()
    }

    pub fn open_trades(&self) -> Vec<&Trade> {
        self.trades.iter().filter(|t| t.is_open()).collect()
    }

    /// Write the full trade list to `path`.
    ///
    /// Returns `Ok(None)` and creates nothing when there are no trades.
    pub fn export(
        &self,
        exporter: &dyn TradeExportPort,
        path: &Path,
    ) -> Result<Option<PathBuf>, SigtraderError> {
        if self.trades.is_empty() {
            debug!("nothing to export");
            return Ok(None);
        }
        exporter.export(&self.trades, path)?;
        info!(path = %path.display(), trades = self.trades.len(), "trades exported");
        Ok(Some(path.to_path_buf()))
    }
}
