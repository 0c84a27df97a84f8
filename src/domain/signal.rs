//! Trade direction and per-timeframe trade signals.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::indicator::IndicatorSnapshot;

/// Stop-loss distance from entry as a fraction of price.
pub const STOP_LOSS_PCT: f64 = 0.01;
/// Take-profit distance from entry as a fraction of price.
pub const TAKE_PROFIT_PCT: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
    Neutral,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
            Direction::Neutral => "NEUTRAL",
        }
    }

    pub fn is_actionable(&self) -> bool {
        !matches!(self, Direction::Neutral)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LONG" => Ok(Direction::Long),
            "SHORT" => Ok(Direction::Short),
            "NEUTRAL" => Ok(Direction::Neutral),
            other => Err(format!("unknown direction '{}'", other)),
        }
    }
}

/// Stop-loss and take-profit prices around an entry.
///
/// Long: SL = entry * 0.99, TP = entry * 1.02. Short and neutral use the
/// mirrored short bracket: SL = entry * 1.01, TP = entry * 0.98.
pub fn bracket(direction: Direction, entry: f64) -> (f64, f64) {
    match direction {
        Direction::Long => (
            entry * (1.0 - STOP_LOSS_PCT),
            entry * (1.0 + TAKE_PROFIT_PCT),
        ),
        Direction::Short | Direction::Neutral => (
            entry * (1.0 + STOP_LOSS_PCT),
            entry * (1.0 - TAKE_PROFIT_PCT),
        ),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeSignal {
    pub symbol: String,
    pub direction: Direction,
    pub score: f64,
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub rsi: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub macd: f64,
}

impl TradeSignal {
    pub fn new(symbol: &str, direction: Direction, score: f64, snapshot: &IndicatorSnapshot) -> Self {
        let entry = snapshot.close;
        let (stop_loss, take_profit) = bracket(direction, entry);

        TradeSignal {
            symbol: symbol.to_string(),
            direction,
            score,
            entry,
            stop_loss,
            take_profit,
            rsi: snapshot.rsi,
            ema_fast: snapshot.ema_fast,
            ema_slow: snapshot.ema_slow,
            macd: snapshot.macd,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeframeResult {
    pub timeframe: String,
    pub signal: TradeSignal,
}
