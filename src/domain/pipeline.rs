//! Per-symbol, per-timeframe signal generation.
//!
//! Timeframes are fetched and scored strictly in declaration order; the first
//! fetch failure aborts the symbol so the caller can skip it.

use std::fmt;
use std::str::FromStr;
use tracing::debug;

use super::candle::Candle;
use super::error::SigtraderError;
use super::indicator::IndicatorSnapshot;
use super::interval::Interval;
use super::scorer::SignalScorer;
use super::signal::{TimeframeResult, TradeSignal};
use crate::ports::market_data_port::MarketDataPort;

pub const DEFAULT_CANDLE_LIMIT: usize = 150;

/// A labelled interval, e.g. `"15m"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeframe {
    pub label: String,
    pub interval: Interval,
}

impl Timeframe {
    pub fn new(interval: Interval) -> Self {
        Timeframe {
            label: interval.label().to_string(),
            interval,
        }
    }

    /// 5m, 15m, 1h.
    pub fn defaults() -> Vec<Timeframe> {
        [
            Interval::FiveMinutes,
            Interval::FifteenMinutes,
            Interval::OneHour,
        ]
        .into_iter()
        .map(Timeframe::new)
        .collect()
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Interval>().map(Timeframe::new)
    }
}

/// Score one candle series. Never fails; sparse series resolve to the
/// indicator fallbacks.
pub fn analyze_candles(symbol: &str, candles: &[Candle], scorer: &SignalScorer) -> TradeSignal {
    let snapshot = IndicatorSnapshot::from_candles(candles);
    let result = scorer.score(&snapshot);
    debug!(
        symbol,
        candles = candles.len(),
        direction = %result.direction,
        score = result.score,
        "timeframe scored"
    );
    TradeSignal::new(symbol, result.direction, result.score, &snapshot)
}

/// Fetch and score every timeframe for `symbol`, in order.
///
/// An empty candle response is treated as a provider failure: there is no
/// latest close to enter at.
pub fn analyze_symbol(
    provider: &dyn MarketDataPort,
    scorer: &SignalScorer,
    symbol: &str,
    timeframes: &[Timeframe],
    limit: usize,
) -> Result<Vec<TimeframeResult>, SigtraderError> {
    timeframes
        .iter()
        .map(|tf| {
            let candles = provider.get_candles(symbol, tf.interval, limit)?;
            if candles.is_empty() {
                return Err(SigtraderError::provider(
                    symbol,
                    format!("no {} candles returned", tf.label),
                ));
            }
            Ok(TimeframeResult {
                timeframe: tf.label.clone(),
                signal: analyze_candles(symbol, &candles, scorer),
            })
        })
        .collect()
}
