//! Typed bot settings read from the INI config.

use std::path::PathBuf;

use super::config_validation::{parse_intervals, parse_symbols, validate_bot_config};
use super::error::SigtraderError;
use super::ledger::{DEFAULT_INITIAL_CAPITAL, DEFAULT_RISK_PER_TRADE};
use super::pipeline::{Timeframe, DEFAULT_CANDLE_LIMIT};
use super::scorer::DEFAULT_MIN_SCORE;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";
pub const DEFAULT_SYMBOLS: [&str; 4] = ["BTCUSDT", "LINKUSDT", "HYPEUSDT", "ETHUSDT"];
/// Upper bound for `[exchange] max_retries`.
pub const MAX_RETRIES: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for ExchangeSettings {
    fn default() -> Self {
        ExchangeSettings {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            max_retries: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    pub exchange: ExchangeSettings,
    pub symbols: Vec<String>,
    pub timeframes: Vec<Timeframe>,
    pub candle_limit: usize,
    pub interval_secs: u64,
    pub min_score: f64,
    /// Offline candle directory; when set the exchange is not contacted.
    pub data_dir: Option<PathBuf>,
    pub initial_capital: f64,
    pub risk_per_trade: f64,
    pub trade_log: PathBuf,
    pub export_path: PathBuf,
    pub history_limit: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        BotConfig {
            exchange: ExchangeSettings::default(),
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            timeframes: Timeframe::defaults(),
            candle_limit: DEFAULT_CANDLE_LIMIT,
            interval_secs: 60,
            min_score: DEFAULT_MIN_SCORE,
            data_dir: None,
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            risk_per_trade: DEFAULT_RISK_PER_TRADE,
            trade_log: PathBuf::from("trades_log.json"),
            export_path: PathBuf::from("trades_export.csv"),
            history_limit: 5,
        }
    }
}

fn non_empty(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl BotConfig {
    /// Validate, then overlay every present key onto the defaults.
    ///
    /// Numeric getters are safe to default after validation: any present
    /// value has already been checked to parse.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, SigtraderError> {
        validate_bot_config(config)?;
        let defaults = BotConfig::default();

        let symbols = match config.get_string("scanner", "symbols") {
            Some(raw) => parse_symbols(&raw)?,
            None => defaults.symbols,
        };
        let timeframes = match config.get_string("scanner", "timeframes") {
            Some(raw) => parse_intervals(&raw)?
                .into_iter()
                .map(Timeframe::new)
                .collect(),
            None => defaults.timeframes,
        };

        Ok(BotConfig {
            exchange: ExchangeSettings {
                base_url: non_empty(config, "exchange", "base_url")
                    .unwrap_or(defaults.exchange.base_url),
                timeout_secs: config.get_int(
                    "exchange",
                    "timeout_secs",
                    defaults.exchange.timeout_secs as i64,
                ) as u64,
                max_retries: config.get_int(
                    "exchange",
                    "max_retries",
                    defaults.exchange.max_retries as i64,
                ) as u32,
            },
            symbols,
            timeframes,
            candle_limit: config.get_int("scanner", "candle_limit", defaults.candle_limit as i64)
                as usize,
            interval_secs: config.get_int("scanner", "interval_secs", defaults.interval_secs as i64)
                as u64,
            min_score: config.get_double("scanner", "min_score", defaults.min_score),
            data_dir: non_empty(config, "scanner", "data_dir").map(PathBuf::from),
            initial_capital: config.get_double(
                "portfolio",
                "initial_capital",
                defaults.initial_capital,
            ),
            risk_per_trade: config.get_double(
                "portfolio",
                "risk_per_trade",
                defaults.risk_per_trade,
            ),
            trade_log: non_empty(config, "portfolio", "trade_log")
                .map(PathBuf::from)
                .unwrap_or(defaults.trade_log),
            export_path: non_empty(config, "portfolio", "export_path")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_path),
            history_limit: config.get_int(
                "portfolio",
                "history_limit",
                defaults.history_limit as i64,
            ) as usize,
        })
    }
}
