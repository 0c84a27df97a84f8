//! Binance spot REST market data provider.
//!
//! Uses the public, unauthenticated endpoints:
//! - `GET /api/v3/klines?symbol=..&interval=..&limit=..`
//! - `GET /api/v3/ticker/price?symbol=..`
//!
//! Connection failures, timeouts, HTTP 429 and 5xx responses are retried with
//! exponential backoff. Any other non-success status fails immediately with
//! the upstream body in the error.

use crate::domain::candle::Candle;
use crate::domain::config::ExchangeSettings;
use crate::domain::error::SigtraderError;
use crate::domain::interval::Interval;
use crate::ports::market_data_port::MarketDataPort;
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const KLINES_PATH: &str = "/api/v3/klines";
const TICKER_PATH: &str = "/api/v3/ticker/price";

#[derive(Debug, Deserialize)]
struct TickerPrice {
    price: String,
}

pub struct BinanceAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
    max_retries: u32,
    base_delay: Duration,
}

enum Attempt {
    Done(String),
    Retry(String),
    Fail(String),
}

impl BinanceAdapter {
    pub fn new(settings: &ExchangeSettings) -> Result<Self, SigtraderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(concat!("sigtrader/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SigtraderError::provider("*", format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            max_retries: settings.max_retries,
            base_delay: Duration::from_millis(500),
        })
    }

    fn attempt(&self, url: &str, query: &[(&str, String)]) -> Attempt {
        match self.client.get(url).query(query).send() {
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().unwrap_or_default();
                if status.is_success() {
                    Attempt::Done(body)
                } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS
                    || status.is_server_error()
                {
                    Attempt::Retry(format!("HTTP {}: {}", status, body))
                } else {
                    Attempt::Fail(format!("HTTP {}: {}", status, body))
                }
            }
            Err(e) if e.is_connect() || e.is_timeout() => Attempt::Retry(e.to_string()),
            Err(e) => Attempt::Fail(e.to_string()),
        }
    }

    fn get_with_retry(
        &self,
        symbol: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<String, SigtraderError> {
        let url = format!("{}{}", self.base_url, path);
        let mut last_error = String::from("no attempt made");

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = backoff(self.base_delay, attempt);
                warn!(
                    symbol,
                    attempt,
                    max_retries = self.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %last_error,
                    "retrying market data request"
                );
                std::thread::sleep(delay);
            }

            match self.attempt(&url, query) {
                Attempt::Done(body) => return Ok(body),
                Attempt::Retry(reason) => last_error = reason,
                Attempt::Fail(reason) => return Err(SigtraderError::provider(symbol, reason)),
            }
        }

        Err(SigtraderError::provider(symbol, last_error))
    }
}

/// Delay before retry `attempt` (1-based), doubling from `base`.
fn backoff(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
}

fn number_at(row: &[Value], idx: usize) -> Option<f64> {
    match row.get(idx)? {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Decode kline rows `[openTime, "open", "high", "low", "close", "volume", ...]`.
pub fn parse_klines(symbol: &str, body: &str) -> Result<Vec<Candle>, SigtraderError> {
    let rows: Vec<Vec<Value>> = serde_json::from_str(body)
        .map_err(|e| SigtraderError::provider(symbol, format!("unexpected kline payload: {}", e)))?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let bad = || SigtraderError::provider(symbol, format!("malformed kline row {}", i));
            let open_time = row
                .first()
                .and_then(Value::as_i64)
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
                .ok_or_else(bad)?;
            Ok(Candle {
                open_time,
                open: number_at(row, 1).ok_or_else(bad)?,
                high: number_at(row, 2).ok_or_else(bad)?,
                low: number_at(row, 3).ok_or_else(bad)?,
                close: number_at(row, 4).ok_or_else(bad)?,
                volume: number_at(row, 5).ok_or_else(bad)?,
            })
        })
        .collect()
}

pub fn parse_ticker(symbol: &str, body: &str) -> Result<f64, SigtraderError> {
    let ticker: TickerPrice = serde_json::from_str(body)
        .map_err(|e| SigtraderError::provider(symbol, format!("unexpected ticker payload: {}", e)))?;
    ticker
        .price
        .parse()
        .map_err(|e| SigtraderError::provider(symbol, format!("invalid price '{}': {}", ticker.price, e)))
}

impl MarketDataPort for BinanceAdapter {
    fn get_candles(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, SigtraderError> {
        let query = [
            ("symbol", symbol.to_string()),
            ("interval", interval.label().to_string()),
            ("limit", limit.to_string()),
        ];
        let body = self.get_with_retry(symbol, KLINES_PATH, &query)?;
        let mut candles = parse_klines(symbol, &body)?;
        candles.sort_by_key(|c| c.open_time);
        debug!(symbol, %interval, candles = candles.len(), "klines fetched");
        Ok(candles)
    }

    fn get_price(&self, symbol: &str) -> Result<f64, SigtraderError> {
        let body = self.get_with_retry(symbol, TICKER_PATH, &[("symbol", symbol.to_string())])?;
        parse_ticker(symbol, &body)
    }
}
