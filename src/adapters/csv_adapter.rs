//! Offline candle provider backed by local CSV files.
//!
//! One file per symbol and interval: `<data_dir>/<SYMBOL>_<interval>.csv` with
//! header `open_time,open,high,low,close,volume`. `open_time` is RFC 3339 or
//! epoch milliseconds.

use crate::domain::candle::Candle;
use crate::domain::error::SigtraderError;
use crate::domain::interval::Interval;
use crate::ports::market_data_port::MarketDataPort;
use chrono::{DateTime, TimeZone, Utc};
use std::fs;
use std::path::PathBuf;

pub struct CsvCandleAdapter {
    base_path: PathBuf,
}

impl CsvCandleAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str, interval: Interval) -> PathBuf {
        self.base_path
            .join(format!("{}_{}.csv", symbol, interval.label()))
    }

    fn read_all(&self, symbol: &str, interval: Interval) -> Result<Vec<Candle>, SigtraderError> {
        let path = self.csv_path(symbol, interval);
        let content = fs::read_to_string(&path).map_err(|e| {
            SigtraderError::provider(symbol, format!("failed to read {}: {}", path.display(), e))
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut candles = Vec::new();

        for (line, result) in rdr.records().enumerate() {
            let row = line + 1;
            let record = result
                .map_err(|e| SigtraderError::provider(symbol, format!("CSV parse error: {}", e)))?;

            let open_time = column(&record, 0, "open_time", symbol, row)?;
            candles.push(Candle {
                open_time: parse_time(open_time).ok_or_else(|| {
                    SigtraderError::provider(symbol, format!("row {}: invalid open_time", row))
                })?,
                open: number(&record, 1, "open", symbol, row)?,
                high: number(&record, 2, "high", symbol, row)?,
                low: number(&record, 3, "low", symbol, row)?,
                close: number(&record, 4, "close", symbol, row)?,
                volume: number(&record, 5, "volume", symbol, row)?,
            });
        }

        candles.sort_by_key(|c| c.open_time);
        Ok(candles)
    }
}

fn column<'r>(
    record: &'r csv::StringRecord,
    idx: usize,
    name: &str,
    symbol: &str,
    row: usize,
) -> Result<&'r str, SigtraderError> {
    record.get(idx).map(str::trim).ok_or_else(|| {
        SigtraderError::provider(symbol, format!("row {}: missing {} column", row, name))
    })
}

fn number(
    record: &csv::StringRecord,
    idx: usize,
    name: &str,
    symbol: &str,
    row: usize,
) -> Result<f64, SigtraderError> {
    column(record, idx, name, symbol, row)?.parse().map_err(|e| {
        SigtraderError::provider(symbol, format!("row {}: invalid {} value: {}", row, name, e))
    })
}

fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(millis) = raw.parse::<i64>() {
        return Utc.timestamp_millis_opt(millis).single();
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

impl MarketDataPort for CsvCandleAdapter {
    fn get_candles(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, SigtraderError> {
        let mut candles = self.read_all(symbol, interval)?;
        let skip = candles.len().saturating_sub(limit);
        Ok(candles.split_off(skip))
    }

    /// Last close of the finest interval that has a file.
    fn get_price(&self, symbol: &str) -> Result<f64, SigtraderError> {
        let interval = Interval::ALL
            .iter()
            .copied()
            .find(|i| self.csv_path(symbol, *i).exists())
            .ok_or_else(|| {
                SigtraderError::provider(
                    symbol,
                    format!("no candle files in {}", self.base_path.display()),
                )
            })?;

        self.read_all(symbol, interval)?
            .last()
            .map(|c| c.close)
            .ok_or_else(|| SigtraderError::provider(symbol, "candle file is empty"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "open_time,open,high,low,close,volume\n\
            2024-01-15T00:10:00Z,101.0,111.0,91.0,106.0,40000\n\
            2024-01-15T00:00:00Z,100.0,110.0,90.0,105.0,50000\n\
            2024-01-15T00:05:00Z,105.0,115.0,100.0,110.0,60000\n";
        fs::write(path.join("BTCUSDT_5m.csv"), csv_content).unwrap();

        let hourly = "open_time,open,high,low,close,volume\n\
            1705276800000,100.0,120.0,95.0,118.0,1000.5\n";
        fs::write(path.join("BTCUSDT_1h.csv"), hourly).unwrap();

        fs::write(
            path.join("ETHUSDT_1h.csv"),
            "open_time,open,high,low,close,volume\n",
        )
        .unwrap();

        (dir, path)
    }

    #[test]
    fn get_candles_sorted_ascending() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvCandleAdapter::new(path);

        let candles = adapter
            .get_candles("BTCUSDT", Interval::FiveMinutes, 150)
            .unwrap();

        assert_eq!(candles.len(), 3);
        assert_eq!(candles[0].close, 105.0);
        assert_eq!(candles[1].close, 110.0);
        assert_eq!(candles[2].close, 106.0);
        assert!(candles.windows(2).all(|w| w[0].open_time < w[1].open_time));
    }

    #[test]
    fn get_candles_keeps_most_recent() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvCandleAdapter::new(path);

        let candles = adapter
            .get_candles("BTCUSDT", Interval::FiveMinutes, 2)
            .unwrap();
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        assert_eq!(closes, vec![110.0, 106.0]);
    }

    #[test]
    fn epoch_millis_times() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvCandleAdapter::new(path);

        let candles = adapter.get_candles("BTCUSDT", Interval::OneHour, 10).unwrap();
        assert_eq!(
            candles[0].open_time,
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
        );
        assert_eq!(candles[0].volume, 1000.5);
    }

    #[test]
    fn missing_file_is_provider_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvCandleAdapter::new(path);

        let err = adapter
            .get_candles("XRPUSDT", Interval::FiveMinutes, 10)
            .unwrap_err();
        assert!(matches!(err, SigtraderError::Provider { ref symbol, .. } if symbol == "XRPUSDT"));
    }

    #[test]
    fn bad_number_is_provider_error() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("BTCUSDT_5m.csv"),
            "open_time,open,high,low,close,volume\n2024-01-15T00:00:00Z,abc,1,1,1,1\n",
        )
        .unwrap();
        let adapter = CsvCandleAdapter::new(dir.path().to_path_buf());

        let err = adapter
            .get_candles("BTCUSDT", Interval::FiveMinutes, 10)
            .unwrap_err();
        assert!(err.to_string().contains("invalid open value"));
    }

    #[test]
    fn price_from_finest_interval() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvCandleAdapter::new(path);
        assert_eq!(adapter.get_price("BTCUSDT").unwrap(), 106.0);
    }

    #[test]
    fn price_from_empty_file_fails() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvCandleAdapter::new(path);
        assert!(adapter.get_price("ETHUSDT").is_err());
        assert!(adapter.get_price("DOGEUSDT").is_err());
    }
}
