//! Configuration validation.
//!
//! Checks every bot setting before anything touches the network or the trade
//! log. Absent keys are fine (defaults apply); present keys must parse and be
//! in range.

use crate::domain::config::MAX_RETRIES;
use crate::domain::error::SigtraderError;
use crate::domain::interval::Interval;
use crate::ports::config_port::ConfigPort;
use std::collections::HashSet;
use std::ops::RangeInclusive;

pub fn validate_bot_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    validate_exchange(config)?;
    validate_scanner(config)?;
    validate_portfolio(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> SigtraderError {
    SigtraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Numeric value of `[section] key`, `None` when absent.
fn read_number(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, SigtraderError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| invalid(section, key, format!("'{}' is not a number", raw.trim()))),
    }
}

fn require_whole(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    min: i64,
) -> Result<(), SigtraderError> {
    require_whole_in(config, section, key, min..=i64::MAX)
}

fn require_whole_in(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    range: RangeInclusive<i64>,
) -> Result<(), SigtraderError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(());
    };
    let reason = if *range.end() == i64::MAX {
        format!("{} must be a whole number >= {}", key, range.start())
    } else {
        format!(
            "{} must be a whole number between {} and {}",
            key,
            range.start(),
            range.end()
        )
    };
    match raw.trim().parse::<i64>() {
        Ok(value) if range.contains(&value) => Ok(()),
        _ => Err(invalid(section, key, reason)),
    }
}

/// Comma-separated symbols, trimmed and upper-cased. Empty tokens and
/// duplicates are rejected.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, SigtraderError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(invalid("scanner", "symbols", "empty token in symbol list"));
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(invalid(
                "scanner",
                "symbols",
                format!("duplicate symbol: {}", symbol),
            ));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

pub fn parse_intervals(input: &str) -> Result<Vec<Interval>, SigtraderError> {
    let mut intervals = Vec::new();
    for token in input.split(',') {
        let interval = token
            .parse::<Interval>()
            .map_err(|reason| invalid("scanner", "timeframes", reason))?;
        if intervals.contains(&interval) {
            return Err(invalid(
                "scanner",
                "timeframes",
                format!("duplicate timeframe: {}", interval),
            ));
        }
        intervals.push(interval);
    }
    Ok(intervals)
}

fn validate_exchange(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    if let Some(url) = config.get_string("exchange", "base_url") {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(invalid(
                "exchange",
                "base_url",
                "base_url must start with http:// or https://",
            ));
        }
    }
    require_whole(config, "exchange", "timeout_secs", 1)?;
    require_whole_in(
        config,
        "exchange",
        "max_retries",
        0..=i64::from(MAX_RETRIES),
    )?;
    Ok(())
}

fn validate_scanner(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    if let Some(symbols) = config.get_string("scanner", "symbols") {
        parse_symbols(&symbols)?;
    }
    if let Some(timeframes) = config.get_string("scanner", "timeframes") {
        parse_intervals(&timeframes)?;
    }
    require_whole(config, "scanner", "candle_limit", 1)?;
    require_whole(config, "scanner", "interval_secs", 1)?;
    if let Some(min_score) = read_number(config, "scanner", "min_score")? {
        if !(0.0..=1.0).contains(&min_score) {
            return Err(invalid(
                "scanner",
                "min_score",
                "min_score must be between 0 and 1",
            ));
        }
    }
    Ok(())
}

fn validate_portfolio(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    if let Some(capital) = read_number(config, "portfolio", "initial_capital")? {
        if !capital.is_finite() || capital <= 0.0 {
            return Err(invalid(
                "portfolio",
                "initial_capital",
                "initial_capital must be positive",
            ));
        }
    }
    if let Some(risk) = read_number(config, "portfolio", "risk_per_trade")? {
        if !(risk > 0.0 && risk <= 1.0) {
            return Err(invalid(
                "portfolio",
                "risk_per_trade",
                "risk_per_trade must be in (0, 1]",
            ));
        }
    }
    require_whole(config, "portfolio", "history_limit", 1)?;
    for key in ["trade_log", "export_path"] {
        if let Some(path) = config.get_string("portfolio", key) {
            if path.trim().is_empty() {
                return Err(invalid("portfolio", key, format!("{} must not be empty", key)));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn assert_invalid(content: &str, expected_key: &str) {
        let err = validate_bot_config(&make_config(content)).unwrap_err();
        match err {
            SigtraderError::ConfigInvalid { key, .. } => assert_eq!(key, expected_key),
            other => panic!("expected ConfigInvalid for {}, got {:?}", expected_key, other),
        }
    }

    #[test]
    fn valid_full_config_passes() {
        let config = make_config(
            r#"
[exchange]
base_url = https://api.binance.com
timeout_secs = 10
max_retries = 2

[scanner]
symbols = BTCUSDT, ethusdt
timeframes = 5m,15m,1h
candle_limit = 150
interval_secs = 60
min_score = 0.7

[portfolio]
initial_capital = 1000
risk_per_trade = 0.005
trade_log = trades_log.json
export_path = trades_export.csv
history_limit = 5
"#,
        );
        assert!(validate_bot_config(&config).is_ok());
    }

    #[test]
    fn empty_config_passes() {
        assert!(validate_bot_config(&make_config("")).is_ok());
    }

    #[test]
    fn base_url_needs_scheme() {
        assert_invalid("[exchange]\nbase_url = api.binance.com\n", "base_url");
    }

    #[test]
    fn timeout_zero_fails() {
        assert_invalid("[exchange]\ntimeout_secs = 0\n", "timeout_secs");
    }

    #[test]
    fn retries_fractional_fails() {
        assert_invalid("[exchange]\nmax_retries = 1.5\n", "max_retries");
    }

    #[test]
    fn retries_above_cap_fail() {
        assert_invalid("[exchange]\nmax_retries = 11\n", "max_retries");
        assert_invalid("[exchange]\nmax_retries = 4294967297\n", "max_retries");
        assert!(validate_bot_config(&make_config("[exchange]\nmax_retries = 10\n")).is_ok());
    }

    #[test]
    fn duplicate_symbol_fails() {
        assert_invalid("[scanner]\nsymbols = BTCUSDT,btcusdt\n", "symbols");
    }

    #[test]
    fn empty_symbol_token_fails() {
        assert_invalid("[scanner]\nsymbols = BTCUSDT,,ETHUSDT\n", "symbols");
    }

    #[test]
    fn unknown_timeframe_fails() {
        assert_invalid("[scanner]\ntimeframes = 5m,7m\n", "timeframes");
    }

    #[test]
    fn candle_limit_zero_fails() {
        assert_invalid("[scanner]\ncandle_limit = 0\n", "candle_limit");
    }

    #[test]
    fn min_score_above_one_fails() {
        assert_invalid("[scanner]\nmin_score = 1.2\n", "min_score");
    }

    #[test]
    fn non_numeric_min_score_fails() {
        assert_invalid("[scanner]\nmin_score = high\n", "min_score");
    }

    #[test]
    fn initial_capital_zero_fails() {
        assert_invalid("[portfolio]\ninitial_capital = 0\n", "initial_capital");
    }

    #[test]
    fn risk_zero_fails() {
        assert_invalid("[portfolio]\nrisk_per_trade = 0\n", "risk_per_trade");
    }

    #[test]
    fn risk_one_is_allowed() {
        assert!(validate_bot_config(&make_config("[portfolio]\nrisk_per_trade = 1\n")).is_ok());
    }

    #[test]
    fn parse_symbols_uppercases() {
        assert_eq!(
            parse_symbols(" btcusdt ,LinkUsdt").unwrap(),
            vec!["BTCUSDT".to_string(), "LINKUSDT".to_string()]
        );
    }

    #[test]
    fn parse_intervals_keeps_order() {
        assert_eq!(
            parse_intervals("1h, 5m").unwrap(),
            vec![Interval::OneHour, Interval::FiveMinutes]
        );
    }
}
