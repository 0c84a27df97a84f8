//! OHLCV candle representation.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Column views over a candle slice, in candle order.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
    pub closes: Vec<f64>,
}

impl PriceSeries {
    pub fn from_candles(candles: &[Candle]) -> Self {
        PriceSeries {
            highs: candles.iter().map(|c| c.high).collect(),
            lows: candles.iter().map(|c| c.low).collect(),
            closes: candles.iter().map(|c| c.close).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_candle() -> Candle {
        Candle {
            open_time: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: 50_000.0,
        }
    }

    #[test]
    fn price_series_columns() {
        let mut second = sample_candle();
        second.high = 120.0;
        second.low = 95.0;
        second.close = 118.0;
        let series = PriceSeries::from_candles(&[sample_candle(), second]);

        assert_eq!(series.len(), 2);
        assert_eq!(series.highs, vec![110.0, 120.0]);
        assert_eq!(series.lows, vec![90.0, 95.0]);
        assert_eq!(series.closes, vec![105.0, 118.0]);
    }

    #[test]
    fn price_series_empty() {
        let series = PriceSeries::from_candles(&[]);
        assert!(series.is_empty());
    }
}
