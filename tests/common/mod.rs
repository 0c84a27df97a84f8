#![allow(dead_code)]

use chrono::{Duration, TimeZone, Utc};
use sigtrader::domain::candle::Candle;
use sigtrader::domain::error::SigtraderError;
use sigtrader::domain::interval::Interval;
use sigtrader::domain::trade::Trade;
use sigtrader::ports::market_data_port::MarketDataPort;
use sigtrader::ports::notifier_port::NotifierPort;
use sigtrader::ports::trade_store_port::TradeStorePort;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Canned candles per symbol (same series for every interval unless
/// overridden), spot prices and injected failures.
#[derive(Clone, Default)]
pub struct MockMarketData {
    pub candles: Arc<Mutex<HashMap<String, Vec<Candle>>>>,
    pub by_interval: Arc<Mutex<HashMap<(String, Interval), Vec<Candle>>>>,
    pub prices: HashMap<String, f64>,
    pub errors: HashMap<String, String>,
    pub calls: Arc<Mutex<Vec<(String, Interval)>>>,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_candles(self, symbol: &str, candles: Vec<Candle>) -> Self {
        self.set_candles(symbol, candles);
        self
    }

    pub fn with_interval(self, symbol: &str, interval: Interval, candles: Vec<Candle>) -> Self {
        self.by_interval
            .lock()
            .unwrap()
            .insert((symbol.to_string(), interval), candles);
        self
    }

    pub fn with_price(mut self, symbol: &str, price: f64) -> Self {
        self.prices.insert(symbol.to_string(), price);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    /// Replace the series for `symbol`; clones share the same data.
    pub fn set_candles(&self, symbol: &str, candles: Vec<Candle>) {
        self.candles
            .lock()
            .unwrap()
            .insert(symbol.to_string(), candles);
    }
}

impl MarketDataPort for MockMarketData {
    fn get_candles(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, SigtraderError> {
        self.calls
            .lock()
            .unwrap()
            .push((symbol.to_string(), interval));
        if let Some(reason) = self.errors.get(symbol) {
            return Err(SigtraderError::provider(symbol, reason.clone()));
        }
        let specific = self
            .by_interval
            .lock()
            .unwrap()
            .get(&(symbol.to_string(), interval))
            .cloned();
        let candles = match specific {
            Some(c) => c,
            None => self
                .candles
                .lock()
                .unwrap()
                .get(symbol)
                .cloned()
                .unwrap_or_default(),
        };
        let skip = candles.len().saturating_sub(limit);
        Ok(candles.into_iter().skip(skip).collect())
    }

    fn get_price(&self, symbol: &str) -> Result<f64, SigtraderError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(SigtraderError::provider(symbol, reason.clone()));
        }
        self.prices
            .get(symbol)
            .copied()
            .ok_or_else(|| SigtraderError::provider(symbol, "Invalid symbol."))
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    pub trades: Arc<Mutex<Vec<Trade>>>,
    pub saves: Arc<Mutex<usize>>,
}

impl TradeStorePort for MemoryStore {
    fn load(&self) -> Result<Vec<Trade>, SigtraderError> {
        Ok(self.trades.lock().unwrap().clone())
    }

    fn save(&self, trades: &[Trade]) -> Result<(), SigtraderError> {
        *self.trades.lock().unwrap() = trades.to_vec();
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}

/// Records every delivered message as `(recipient, text)`.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    pub fn texts(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(_, t)| t.clone()).collect()
    }
}

impl NotifierPort for RecordingNotifier {
    fn send_text(&self, recipient: &str, text: &str) -> Result<(), SigtraderError> {
        self.sent
            .lock()
            .unwrap()
            .push((recipient.to_string(), text.to_string()));
        Ok(())
    }

    fn send_file(&self, recipient: &str, path: &Path, caption: &str) -> Result<(), SigtraderError> {
        self.send_text(recipient, &format!("{} [{}]", caption, path.display()))
    }
}

pub fn make_candles(closes: &[f64]) -> Vec<Candle> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Candle {
            open_time: start + Duration::minutes(i as i64),
            open: c,
            high: c + 0.5,
            low: c - 0.5,
            close: c,
            volume: 10.0,
        })
        .collect()
}

/// 150 candles falling one point per bar and ending at `last`.
///
/// Scores SHORT at 0.65 (ema, macd, adx, atr) against LONG 0.15
/// (oversold rsi).
pub fn falling_to(last: f64) -> Vec<Candle> {
    make_candles(&(0..150).map(|i| last + 149.0 - i as f64).collect::<Vec<_>>())
}

pub fn flat(price: f64, count: usize) -> Vec<Candle> {
    make_candles(&vec![price; count])
}
