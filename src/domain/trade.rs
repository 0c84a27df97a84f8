//! Simulated trade records and their stop/target checks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::signal::Direction;

/// Index of a trade in the ledger's append-only history.
pub type TradeId = usize;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub symbol: String,
    pub direction: Direction,
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub size: f64,
    pub open_time: DateTime<Utc>,
    #[serde(default)]
    pub close_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub close_price: Option<f64>,
    #[serde(default)]
    pub profit_loss: Option<f64>,
}

impl Trade {
    pub fn is_open(&self) -> bool {
        self.close_time.is_none()
    }

    pub fn is_long(&self) -> bool {
        self.direction == Direction::Long
    }

    /// Long: price <= stop. Anything else: price >= stop.
    pub fn hits_stop_loss(&self, price: f64) -> bool {
        if self.is_long() {
            price <= self.stop_loss
        } else {
            price >= self.stop_loss
        }
    }

    /// Long: price >= target. Anything else: price <= target.
    pub fn hits_take_profit(&self, price: f64) -> bool {
        if self.is_long() {
            price >= self.take_profit
        } else {
            price <= self.take_profit
        }
    }

    /// Profit or loss if the trade were closed at `price`.
    pub fn pnl_at(&self, price: f64) -> f64 {
        if self.is_long() {
            (price - self.entry) * self.size
        } else {
            (self.entry - price) * self.size
        }
    }
}
